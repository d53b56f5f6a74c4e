//! Command-line interface, built on clap.
//!
//! `handle` processes one dispatch job message; `generate` is the direct
//! command-line mode that prints the hosted URL instead of posting a
//! callback.

use clap::{Parser, Subcommand};

/// dallebot — turn a chat prompt into a publicly hosted generated image.
#[derive(Debug, Parser)]
#[command(name = "dallebot", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process one job message (JSON with prompt, user, response_url).
    Handle {
        /// The job message as a JSON string. Reads stdin when omitted and
        /// --file is not given.
        message: Option<String>,

        /// Path to a file containing the job message.
        #[arg(long)]
        file: Option<String>,
    },

    /// Generate an image from the given prompt and print its hosted URL.
    Generate {
        /// Prompt words, joined with spaces.
        #[arg(required = true)]
        prompt: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_handle_with_inline_message() {
        let cli = Cli::parse_from(["dallebot", "handle", r#"{"prompt":"a cat"}"#]);
        match cli.command {
            Command::Handle { message, file } => {
                assert_eq!(message.unwrap(), r#"{"prompt":"a cat"}"#);
                assert!(file.is_none());
            }
            _ => panic!("expected Handle command"),
        }
    }

    #[test]
    fn cli_parses_handle_with_file() {
        let cli = Cli::parse_from(["dallebot", "handle", "--file", "job.json"]);
        match cli.command {
            Command::Handle { message, file } => {
                assert!(message.is_none());
                assert_eq!(file.unwrap(), "job.json");
            }
            _ => panic!("expected Handle command"),
        }
    }

    #[test]
    fn cli_parses_generate_prompt_words() {
        let cli = Cli::parse_from(["dallebot", "generate", "a", "cat", "wearing", "a", "hat"]);
        match cli.command {
            Command::Generate { prompt } => {
                assert_eq!(prompt.join(" "), "a cat wearing a hat");
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn cli_parses_global_verbose() {
        let cli = Cli::parse_from(["dallebot", "--verbose", "generate", "a", "cat"]);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
