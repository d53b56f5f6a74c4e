//! The generation job handler.
//!
//! Owns the end-to-end guarantee for one job: whatever happens between
//! receipt and termination, exactly one delivery result is posted to the
//! job's callback URL (best-effort on the failure path). Failures never
//! propagate past [`JobHandler::handle`].

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::error::BotError;
use crate::generator::{GenerationError, ImageGenerator};
use crate::job::Job;
use crate::manipulate::ManipulationSet;
use crate::notify::{ErrorMessage, Notifier, SuccessMessage};
use crate::store::{ArtifactStore, UploadError};

const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// The states a job walks through.
///
/// The walk is strictly linear on the success path; `Failed` is reachable
/// from every state after `Received`. No state is ever retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Received,
    Transforming,
    Generating,
    Persisting,
    Notifying,
    Done,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Received => write!(f, "RECEIVED"),
            JobState::Transforming => write!(f, "TRANSFORMING"),
            JobState::Generating => write!(f, "GENERATING"),
            JobState::Persisting => write!(f, "PERSISTING"),
            JobState::Notifying => write!(f, "NOTIFYING"),
            JobState::Done => write!(f, "DONE"),
            JobState::Failed => write!(f, "FAILED"),
        }
    }
}

/// Drives one job from receipt to a terminal state.
pub struct JobHandler<G, S, N> {
    generator: G,
    store: S,
    notifier: N,
    manipulations: ManipulationSet,
    image_size: String,
    moderation_enabled: bool,
    http: Client,
}

impl<G, S, N> JobHandler<G, S, N>
where
    G: ImageGenerator,
    S: ArtifactStore,
    N: Notifier,
{
    pub fn new(generator: G, store: S, notifier: N, manipulations: ManipulationSet) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");
        Self {
            generator,
            store,
            notifier,
            manipulations,
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            moderation_enabled: false,
            http,
        }
    }

    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = size.into();
        self
    }

    pub fn with_moderation(mut self, enabled: bool) -> Self {
        self.moderation_enabled = enabled;
        self
    }

    /// Handle one job to a terminal state.
    ///
    /// Never returns an error: every failure is converted into the `{text}`
    /// payload and posted to the callback URL. If that final POST fails too,
    /// the failure is logged and swallowed.
    pub async fn handle(&self, job: &Job) {
        info!(
            "{} job from {}: {:?}",
            JobState::Received,
            job.user,
            job.prompt
        );
        if let Err(err) = self.run(job).await {
            warn!("{} {err}", JobState::Failed);
            let payload = match serde_json::to_value(ErrorMessage::new(err.to_string())) {
                Ok(payload) => payload,
                Err(json_err) => {
                    error!("could not encode failure payload: {json_err}");
                    return;
                }
            };
            if let Err(post_err) = self.notifier.post(job.callback_url(), &payload).await {
                error!("failure notification was not delivered: {post_err}");
            }
        }
    }

    async fn run(&self, job: &Job) -> Result<(), BotError> {
        debug!("{}", JobState::Transforming);
        let effective = {
            let mut rng = rand::rng();
            self.manipulations.apply(&job.user, &job.prompt, &mut rng)?
        };
        if effective != job.prompt {
            debug!("prompt manipulated to {effective:?}");
        }

        if self.moderation_enabled {
            let verdict = self.generator.moderate(&effective).await?;
            if verdict.flagged {
                return Err(GenerationError::Flagged {
                    categories: verdict.flagged_categories(),
                }
                .into());
            }
        }

        let (_, uploaded_url) = self.generate_and_host(&effective).await?;

        info!("{} {uploaded_url}", JobState::Notifying);
        // The reply always quotes the original prompt; the manipulation is
        // invisible to the requester.
        let message = SuccessMessage::in_channel(&job.prompt, &job.user, &uploaded_url);
        self.notifier
            .post(job.callback_url(), &serde_json::to_value(&message)?)
            .await?;
        debug!("{}", JobState::Done);
        Ok(())
    }

    /// Generate an image for `prompt` and re-host it, returning the
    /// time-limited source URL and the stable public URL.
    ///
    /// Also the whole of the command-line path, which skips manipulation,
    /// moderation, and callbacks.
    pub async fn generate_and_host(&self, prompt: &str) -> Result<(String, String), BotError> {
        info!("{} {prompt:?}", JobState::Generating);
        let source_url = self.generator.generate(prompt, &self.image_size).await?;

        info!("{} re-hosting {source_url}", JobState::Persisting);
        let bytes = fetch_artifact(&self.http, &source_url).await?;
        let uploaded_url = self.store.upload(&bytes, prompt).await?;
        Ok((source_url, uploaded_url))
    }
}

/// Download the generated artifact before its source URL expires.
async fn fetch_artifact(http: &Client, url: &str) -> Result<Vec<u8>, UploadError> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(UploadError::Download(format!(
            "status {status} fetching {url}"
        )));
    }
    Ok(response.bytes().await?.to_vec())
}
