//! Submit-and-poll orchestration for video generation jobs.
//!
//! [`VideoGenerator`] drives one submission at a time through the full
//! flow: credential check, optional interactive acquisition, job creation,
//! then a fixed-interval poll loop until the service reports the job done.
//! Remote failures are surfaced immediately; nothing is retried here, the
//! caller decides whether to resubmit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::backend::{Operation, VideoBackend};
use crate::config::PollingConfig;
use crate::credentials::CredentialProvider;
use crate::error::{GenerateError, PollError, SubmissionError};
use crate::request::VideoRequest;

/// Maps a remote failure message to a friendlier user-facing one.
///
/// Returning `None` keeps the service-supplied text. Swap this out when a
/// backend exposes structured error codes instead of prose.
pub type ErrorClassifier = fn(&str) -> Option<String>;

/// Default classifier: the Veo API reports a stale or revoked key as a
/// missing entity, which is meaningless to the user.
pub fn default_classifier(message: &str) -> Option<String> {
    if message.contains("Requested entity was not found") {
        Some("API key invalid or expired. Please try connecting again.".to_string())
    } else {
        None
    }
}

/// Fallback when the service marks a job failed without a message.
const GENERIC_FAILURE: &str = "Video generation failed";

/// Client for one-at-a-time video generation submissions.
pub struct VideoGenerator {
    backend: Arc<dyn VideoBackend>,
    credentials: Arc<dyn CredentialProvider>,
    poll_interval: Duration,
    max_poll_attempts: Option<u32>,
    classify: ErrorClassifier,
    busy: AtomicBool,
}

/// Releases the submission slot when a run finishes, on every exit path.
struct SlotGuard<'a>(&'a AtomicBool);

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl VideoGenerator {
    pub fn new(
        backend: Arc<dyn VideoBackend>,
        credentials: Arc<dyn CredentialProvider>,
        polling: &PollingConfig,
    ) -> Self {
        Self {
            backend,
            credentials,
            poll_interval: Duration::from_secs(polling.interval_seconds),
            max_poll_attempts: polling.max_attempts,
            classify: default_classifier,
            busy: AtomicBool::new(false),
        }
    }

    /// Replace the failure-message classifier.
    pub fn with_classifier(mut self, classify: ErrorClassifier) -> Self {
        self.classify = classify;
        self
    }

    /// Run one generation to completion. See [`Self::generate_with_cancel`].
    pub async fn generate(&self, request: &VideoRequest) -> Result<String, GenerateError> {
        self.generate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Run one generation to completion, returning the authorized URI of
    /// the produced video.
    ///
    /// Only one submission may be in flight per client; overlapping calls
    /// fail fast with [`GenerateError::Busy`]. Cancelling the token while
    /// the loop is waiting aborts with [`GenerateError::Cancelled`].
    pub async fn generate_with_cancel(
        &self,
        request: &VideoRequest,
        cancel: &CancellationToken,
    ) -> Result<String, GenerateError> {
        let _slot = self.claim_slot()?;

        if !self.credentials.has_selected_key().await {
            info!("No API key selected, opening key selector");
            self.credentials.open_key_selector().await?;
            // Proceed without re-checking: if the key has not propagated
            // yet, the submission call reports the failure itself.
        }

        let key = self.credentials.active_key().await.unwrap_or_default();

        info!(
            vibe = ?request.vibe(),
            image_bytes = request.image_bytes().len(),
            "🎬 Submitting video generation job"
        );

        let operation = self
            .backend
            .start_generation(request, &key)
            .await
            .map_err(SubmissionError)?;

        let uri = self.poll(operation, &key, cancel).await?;

        info!("✅ Video ready");
        Ok(resolve_artifact_uri(&uri, &key))
    }

    fn claim_slot(&self) -> Result<SlotGuard<'_>, GenerateError> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| GenerateError::Busy)?;
        Ok(SlotGuard(&self.busy))
    }

    /// Poll the job until the service reports it done.
    ///
    /// Every cycle sleeps first, then queries, so the remote job always
    /// gets at least one interval before the first status check.
    async fn poll(
        &self,
        mut operation: Operation,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GenerateError> {
        let mut attempts = 0u32;

        while !operation.done {
            if let Some(max) = self.max_poll_attempts {
                if attempts >= max {
                    return Err(PollError::Timeout { attempts }.into());
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(job = operation.handle.as_str(), "Polling cancelled");
                    return Err(GenerateError::Cancelled);
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            attempts += 1;
            debug!(job = operation.handle.as_str(), attempt = attempts, "Checking job status");

            operation = self
                .backend
                .fetch_operation(&operation.handle, key)
                .await
                .map_err(PollError::from)?;
        }

        if let Some(remote) = operation.error {
            let message = remote
                .message
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            let message = (self.classify)(&message).unwrap_or(message);
            return Err(PollError::Remote(message).into());
        }

        operation
            .videos
            .into_iter()
            .next()
            .and_then(|v| v.uri)
            .ok_or_else(|| PollError::MissingArtifact.into())
    }
}

/// Append the active key to an artifact locator as a query parameter.
///
/// The artifact store authorizes downloads by key-in-query, so the caller
/// can hand the result straight to a player or downloader. Pure function:
/// same inputs, same output.
pub fn resolve_artifact_uri(uri: &str, key: &str) -> String {
    match Url::parse(uri) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("key", key);
            url.into()
        }
        // Not parseable as an absolute URL; fall back to plain appending.
        Err(_) => {
            let separator = if uri.contains('?') { '&' } else { '?' };
            format!("{uri}{separator}key={key}")
        }
    }
}
