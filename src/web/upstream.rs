// Relay client for the remote image-processing service.
// One outbound request per inbound request, no retry, no timeout: the first
// failure is terminal for that request (the handler substitutes a fixed-shape
// failure body).

use super::extract_upload::UploadPayload;
use crate::models::UPLOAD_FIELD_NAME;
use std::fmt;

/// Response relayed from the upstream service: the raw status code and the
/// decoded JSON body, passed back to the browser verbatim.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Failure on the relay path.
#[derive(Debug)]
pub enum UpstreamError {
    /// The outbound request could not be sent or completed.
    Transport(reqwest::Error),
    /// The remote responded, but not with JSON.
    InvalidJson(reqwest::Error),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "upstream request failed: {}", err),
            Self::InvalidJson(err) => write!(f, "upstream returned non-JSON body: {}", err),
        }
    }
}

pub struct Upstream {
    client: reqwest::Client,
    base_url: String,
}

impl Upstream {
    /// Creates the relay client for the given base URL, e.g.
    /// "http://31.97.135.175:8989".
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<UpstreamResponse, UpstreamError> {
        self.relay_get("/api/health/").await
    }

    pub async fn info(&self) -> Result<UpstreamResponse, UpstreamError> {
        self.relay_get("/api/info/").await
    }

    /// Forwards the uploaded image as multipart form data under the fixed
    /// field name the service expects.
    pub async fn process_avatar(
        &self,
        upload: UploadPayload,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let mut part = reqwest::multipart::Part::bytes(upload.data);
        if let Some(file_name) = upload.file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = &upload.content_type {
            part = part.mime_str(content_type).map_err(UpstreamError::Transport)?;
        }
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let response = self
            .client
            .post(format!("{}/api/process-avatar/", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        Self::read_json(response).await
    }

    async fn relay_get(&self, path: &str) -> Result<UpstreamResponse, UpstreamError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<UpstreamResponse, UpstreamError> {
        let status = response.status().as_u16();
        let body = response.json().await.map_err(UpstreamError::InvalidJson)?;
        Ok(UpstreamResponse { status, body })
    }
}
