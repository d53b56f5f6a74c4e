use std::io::Read;

use anyhow::{Context, Result, bail};
use clap::Parser;

use dallebot::cli::{Cli, Command};
use dallebot::config::{BotConfig, StoreBackend, setup_logging};
use dallebot::generator::OpenAiGenerator;
use dallebot::handler::JobHandler;
use dallebot::job::Job;
use dallebot::notify::WebhookNotifier;
use dallebot::store::{ImgurStore, S3Store, Store};
use dallebot::ui::JobProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let config = BotConfig::load().context("failed to load configuration")?;
    config.validate()?;

    let store = match config.store {
        StoreBackend::S3 => Store::S3(
            S3Store::new(
                config.s3.region.clone(),
                config.s3.bucket.clone(),
                config.s3.public_base_url.clone(),
                config.s3.jpeg_quality,
            )
            .await,
        ),
        StoreBackend::Imgur => Store::Imgur(ImgurStore::new(config.imgur.client_id.clone())),
    };
    let generator = OpenAiGenerator::new(
        config.openai_api_key.clone(),
        config.openai_organization.clone(),
    );
    let handler = JobHandler::new(
        generator,
        store,
        WebhookNotifier::new(),
        config.manipulations.clone(),
    )
    .with_image_size(config.image_size.clone())
    .with_moderation(config.moderation_enabled);

    match cli.command {
        Command::Handle { message, file } => {
            let raw = match (message, file) {
                (Some(raw), _) => raw,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {path}"))?,
                (None, None) => {
                    let mut raw = String::new();
                    std::io::stdin().read_to_string(&mut raw)?;
                    raw
                }
            };
            let job = Job::from_json(&raw).context("invalid job message")?;
            handler.handle(&job).await;
        }
        Command::Generate { prompt } => {
            let prompt = prompt.join(" ");
            let progress = JobProgress::start(&prompt);
            match handler.generate_and_host(&prompt).await {
                Ok((source_url, hosted_url)) => {
                    progress.finish_success(&hosted_url);
                    println!("{source_url}");
                    println!("{hosted_url}");
                }
                Err(err) => {
                    progress.finish_failure(&err.to_string());
                    bail!(err);
                }
            }
        }
    }

    Ok(())
}
