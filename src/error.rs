//! Error taxonomy for the generation client.
//!
//! Each phase of a submission has its own error type so callers can tell a
//! key problem from a rejected request from a failed job. None of these are
//! retried automatically; a failed submission leaves the client ready for
//! the next one.

use thiserror::Error;

/// Errors from checking or acquiring an API key.
///
/// A merely missing key is not an error on its own: the client responds by
/// opening the host's selection flow, and only a failure of that flow is
/// reported here.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The host's key-selection flow was dismissed or failed.
    #[error("API key selection failed or was cancelled")]
    SelectionCancelled,

    /// The host environment does not expose a key-selection flow.
    #[error("API key selection is not available in this environment")]
    SelectorUnavailable,
}

/// Errors from talking to the remote video API.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Video API error {status}: {body}")]
    Api { status: u16, body: String },
}

/// The job-creation call was rejected.
#[derive(Debug, Error)]
#[error("Failed to start video generation: {0}")]
pub struct SubmissionError(#[from] pub BackendError);

/// Errors from polling a submitted job to completion.
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The job finished and the service attached an error object.
    #[error("{0}")]
    Remote(String),

    /// The job finished without producing any video.
    #[error("No video URI returned")]
    MissingArtifact,

    /// The configured polling ceiling was reached before the job finished.
    #[error("Video generation did not complete within {attempts} status checks")]
    Timeout { attempts: u32 },
}

/// Top-level error for a full generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Poll(#[from] PollError),

    /// A generation is already in flight on this client.
    #[error("A video generation is already in progress")]
    Busy,

    /// The caller abandoned the job mid-flight.
    #[error("Video generation cancelled")]
    Cancelled,
}
