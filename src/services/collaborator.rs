use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::Settings;
use crate::models::email::{
    EmailFields, ExtractRequest, ExtractResponse, ExtractedData, FileHandle, ParsedEmail,
    UploadResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Collaborator returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(error: reqwest::Error) -> Self {
        CollaboratorError::Transport(error.to_string())
    }
}

/// The service that turns raw email bytes into normalized fields.
#[async_trait]
pub trait ParsingCollaborator: Send + Sync {
    async fn parse(&self, file: &FileHandle) -> Result<ParsedEmail, CollaboratorError>;
}

/// The service that applies a prompt to an email and returns structured data.
#[async_trait]
pub trait ExtractionCollaborator: Send + Sync {
    async fn extract(&self, prompt: &str, email: &EmailFields) -> Result<ExtractedData, CollaboratorError>;
}

/// Reaches both collaborators over HTTP.
#[derive(Clone)]
pub struct HttpCollaborator {
    client: reqwest::Client,
    upload_url: Url,
    extract_url: Url,
}

impl HttpCollaborator {
    /// `parser_base` and `extractor_base` must end with `/`; see
    /// [`crate::config::parse_base_url`].
    pub fn new(
        parser_base: &Url,
        extractor_base: &Url,
        timeout: Option<Duration>,
    ) -> Result<Self, CollaboratorError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let upload_url = parser_base
            .join("upload")
            .map_err(|e| CollaboratorError::Transport(format!("Bad parser URL: {}", e)))?;
        let extract_url = extractor_base
            .join("extract")
            .map_err(|e| CollaboratorError::Transport(format!("Bad extractor URL: {}", e)))?;
        Ok(HttpCollaborator {
            client,
            upload_url,
            extract_url,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CollaboratorError> {
        Self::new(
            &settings.parser_url,
            &settings.extractor_url,
            settings.collaborator_timeout,
        )
    }
}

#[async_trait]
impl ParsingCollaborator for HttpCollaborator {
    async fn parse(&self, file: &FileHandle) -> Result<ParsedEmail, CollaboratorError> {
        info!("Sending {} ({} bytes) to {}", file.name, file.bytes.len(), self.upload_url);
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = read_json(response).await?;
        Ok(ParsedEmail::from(body))
    }
}

#[async_trait]
impl ExtractionCollaborator for HttpCollaborator {
    async fn extract(&self, prompt: &str, email: &EmailFields) -> Result<ExtractedData, CollaboratorError> {
        info!("Requesting extraction from {}", self.extract_url);
        debug!("Extraction input:\n{}", email);

        let response = self
            .client
            .post(self.extract_url.clone())
            .json(&ExtractRequest::new(prompt, email))
            .send()
            .await?;

        let body: ExtractResponse = read_json(response).await?;
        Ok(body.extracted_data.unwrap_or_default())
    }
}

/// Reads the whole body, then decodes it. Non-success statuses are transport
/// failures regardless of what the body contains.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CollaboratorError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = error_message(&bytes);
        error!("Collaborator request failed with {}: {}", status, message);
        return Err(CollaboratorError::Status { status, message });
    }

    debug!("Collaborator responded with {} bytes", bytes.len());
    serde_json::from_slice(&bytes).map_err(|e| {
        error!("Failed to decode collaborator response: {}", e);
        CollaboratorError::InvalidResponse(e.to_string())
    })
}

/// Prefers the `{"error": "..."}` message the collaborators send on failure.
fn error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "no response body".to_string()
    } else {
        text.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_error_field() {
        assert_eq!(error_message(br#"{"error": "parse failed"}"#), "parse failed");
    }

    #[test]
    fn test_error_message_falls_back_to_text() {
        assert_eq!(error_message(b"Internal Server Error\n"), "Internal Server Error");
        assert_eq!(error_message(b""), "no response body");
        assert_eq!(error_message(br#"{"detail": 1}"#), r#"{"detail": 1}"#);
    }

    #[test]
    fn test_endpoints_join_base_path() {
        let base = Url::parse("http://localhost:5000/svc/").unwrap();
        let collaborator = HttpCollaborator::new(&base, &base, None).unwrap();
        assert_eq!(collaborator.upload_url.as_str(), "http://localhost:5000/svc/upload");
        assert_eq!(collaborator.extract_url.as_str(), "http://localhost:5000/svc/extract");
    }
}
