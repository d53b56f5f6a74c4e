//! Terminal output for the command-line path — spinner and colored status.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::handler::JobState;

/// Visual progress indicator while a command-line generation runs.
pub struct JobProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
}

impl JobProgress {
    /// Start the spinner with the prompt being generated.
    pub fn start(prompt: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("{}: {prompt}", JobState::Generating));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    /// Update the spinner to the current state.
    pub fn update_state(&self, state: JobState) {
        self.pb.set_message(format!("{state}"));
    }

    /// Stop the spinner and print the hosted URL in green.
    pub fn finish_success(&self, url: &str) {
        self.pb
            .finish_with_message(format!("{} {url}", self.green.apply_to("✔")));
    }

    /// Stop the spinner and print the failure in red.
    pub fn finish_failure(&self, message: &str) {
        self.pb
            .finish_with_message(format!("{} {message}", self.red.apply_to("✘")));
    }
}
