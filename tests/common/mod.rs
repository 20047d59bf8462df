#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use eml_extract::models::email::{EmailFields, ExtractedData, FileHandle, ParsedEmail};
use eml_extract::services::collaborator::{
    CollaboratorError, ExtractionCollaborator, ParsingCollaborator,
};

mock! {
    pub Parser {}

    #[async_trait]
    impl ParsingCollaborator for Parser {
        async fn parse(&self, file: &FileHandle) -> Result<ParsedEmail, CollaboratorError>;
    }
}

mock! {
    pub Extractor {}

    #[async_trait]
    impl ExtractionCollaborator for Extractor {
        async fn extract(&self, prompt: &str, email: &EmailFields) -> Result<ExtractedData, CollaboratorError>;
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The parse result used throughout: Scenario A's email.
pub fn scenario_email() -> ParsedEmail {
    ParsedEmail {
        html: "<p>hi</p>".to_string(),
        text: "hi".to_string(),
        from: "a@x.com".to_string(),
        to: "b@x.com".to_string(),
        date: "2024-01-01".to_string(),
    }
}

pub fn eml_file() -> FileHandle {
    FileHandle::new(
        "invoice.eml",
        b"From: a@x.com\r\nTo: b@x.com\r\nDate: 2024-01-01\r\n\r\nhi\r\n".to_vec(),
    )
}

pub fn object(value: Value) -> ExtractedData {
    value.as_object().cloned().expect("test value must be a JSON object")
}

pub fn server_error() -> CollaboratorError {
    CollaboratorError::Status {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        message: "parse failed".to_string(),
    }
}
