//! Reel Animator - image-to-video ad generation client
//!
//! Turns a still product photo into a short vertical video advertisement
//! through a remote generative video service. The library submits one job
//! at a time, polls the long-running operation until it finishes, and
//! returns an authorized URI for the produced video.

pub mod backend;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod request;

// Re-export main types for easy access
pub use crate::backend::{GeminiVeoBackend, JobHandle, Operation, VideoBackend};
pub use crate::client::{default_classifier, resolve_artifact_uri, ErrorClassifier, VideoGenerator};
pub use crate::config::{Config, GenerationConfig, PollingConfig};
pub use crate::credentials::{CredentialProvider, EnvCredentials};
pub use crate::error::{
    BackendError, CredentialError, GenerateError, PollError, SubmissionError,
};
pub use crate::request::{AnimationVibe, VideoRequest};
