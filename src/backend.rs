//! Remote video generation backends.
//!
//! [`VideoBackend`] is the seam between the polling client and a concrete
//! vendor API. [`GeminiVeoBackend`] talks to the Gemini Veo long-running
//! operations endpoints; tests substitute their own implementation.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::BackendError;
use crate::request::VideoRequest;

/// Opaque reference to an in-flight generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Snapshot of a long-running generation job.
#[derive(Debug, Clone)]
pub struct Operation {
    pub handle: JobHandle,
    pub done: bool,
    /// Error object attached by the service, present only when `done`.
    pub error: Option<RemoteError>,
    /// Generated videos, present only when `done` and successful.
    pub videos: Vec<VideoArtifact>,
}

#[derive(Debug, Clone)]
pub struct RemoteError {
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VideoArtifact {
    pub uri: Option<String>,
}

/// A vendor API that generates videos asynchronously.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Start a generation job. The returned operation may already be done.
    async fn start_generation(
        &self,
        request: &VideoRequest,
        key: &str,
    ) -> Result<Operation, BackendError>;

    /// Fetch the current state of a job.
    async fn fetch_operation(
        &self,
        handle: &JobHandle,
        key: &str,
    ) -> Result<Operation, BackendError>;
}

/// Gemini Veo backend over the `predictLongRunning` REST surface.
pub struct GeminiVeoBackend {
    config: GenerationConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateVideoWire<'a> {
    instances: Vec<InstanceWire<'a>>,
    parameters: ParametersWire<'a>,
}

#[derive(Debug, Serialize)]
struct InstanceWire<'a> {
    prompt: String,
    image: ImageWire<'a>,
}

#[derive(Debug, Serialize)]
struct ImageWire<'a> {
    #[serde(rename = "bytesBase64Encoded")]
    bytes_base64_encoded: String,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
}

#[derive(Debug, Serialize)]
struct ParametersWire<'a> {
    #[serde(rename = "sampleCount")]
    sample_count: u32,
    resolution: &'a str,
    #[serde(rename = "aspectRatio")]
    aspect_ratio: &'a str,
}

#[derive(Debug, Deserialize)]
struct OperationWire {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<StatusWire>,
    response: Option<ResponseWire>,
}

#[derive(Debug, Deserialize)]
struct StatusWire {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseWire {
    #[serde(rename = "generateVideoResponse")]
    generate_video_response: Option<GenerateVideoResponseWire>,
}

#[derive(Debug, Deserialize)]
struct GenerateVideoResponseWire {
    #[serde(rename = "generatedSamples", default)]
    generated_samples: Vec<SampleWire>,
}

#[derive(Debug, Deserialize)]
struct SampleWire {
    video: Option<VideoWire>,
}

#[derive(Debug, Deserialize)]
struct VideoWire {
    uri: Option<String>,
}

impl From<OperationWire> for Operation {
    fn from(wire: OperationWire) -> Self {
        let videos = wire
            .response
            .and_then(|r| r.generate_video_response)
            .map(|r| {
                r.generated_samples
                    .into_iter()
                    .map(|s| VideoArtifact {
                        uri: s.video.and_then(|v| v.uri),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Operation {
            handle: JobHandle::new(wire.name),
            done: wire.done,
            error: wire.error.map(|e| RemoteError { message: e.message }),
            videos,
        }
    }
}

impl GeminiVeoBackend {
    pub fn new(config: GenerationConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    async fn read_operation(&self, response: reqwest::Response) -> Result<Operation, BackendError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api { status, body });
        }

        let wire: OperationWire = response.json().await?;
        Ok(wire.into())
    }
}

#[async_trait]
impl VideoBackend for GeminiVeoBackend {
    async fn start_generation(
        &self,
        request: &VideoRequest,
        key: &str,
    ) -> Result<Operation, BackendError> {
        let body = GenerateVideoWire {
            instances: vec![InstanceWire {
                prompt: request.prompt(),
                image: ImageWire {
                    bytes_base64_encoded: BASE64.encode(request.image_bytes()),
                    mime_type: request.mime_type(),
                },
            }],
            parameters: ParametersWire {
                sample_count: self.config.sample_count,
                resolution: &self.config.resolution,
                aspect_ratio: &self.config.aspect_ratio,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:predictLongRunning?key={}",
            self.config.api_base_url, self.config.model, key
        );

        debug!(model = %self.config.model, "Starting video generation");

        let response = self.client.post(&url).json(&body).send().await?;
        self.read_operation(response).await
    }

    async fn fetch_operation(
        &self,
        handle: &JobHandle,
        key: &str,
    ) -> Result<Operation, BackendError> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.config.api_base_url,
            handle.as_str(),
            key
        );

        let response = self.client.get(&url).send().await?;
        self.read_operation(response).await
    }
}
