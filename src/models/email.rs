use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured result of an extraction: arbitrary JSON keyed by field name.
pub type ExtractedData = Map<String, Value>;

/// A selected email file: its display name and raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        FileHandle {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Body returned by the parsing collaborator.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub html: Option<String>,
    pub text: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
}

/// Parse result with every field normalized to a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedEmail {
    pub html: String,
    pub text: String,
    pub from: String,
    pub to: String,
    pub date: String,
}

impl From<UploadResponse> for ParsedEmail {
    fn from(response: UploadResponse) -> Self {
        ParsedEmail {
            html: response.html.unwrap_or_default(),
            text: response.text.unwrap_or_default(),
            from: response.from.unwrap_or_default(),
            to: response.to.unwrap_or_default(),
            date: response.date.unwrap_or_default(),
        }
    }
}

/// A completed upload: the parse result plus the name of the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedEmail {
    pub file_name: String,
    pub email: ParsedEmail,
}

/// The email fields an extraction reads from the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailFields {
    pub text: String,
    pub from: String,
    pub to: String,
    pub date: String,
}

impl fmt::Display for EmailFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Email:")?;
        writeln!(f, "  From: {}", self.from)?;
        writeln!(f, "  To: {}", self.to)?;
        writeln!(f, "  Date: {}", self.date)?;
        write!(f, "  Body: {} chars", self.text.chars().count())
    }
}

/// Body sent to the extraction collaborator. Field order is part of the wire
/// contract: identical inputs must serialize to identical bytes.
#[derive(Debug, Serialize, PartialEq)]
pub struct ExtractRequest<'a> {
    pub prompt: &'a str,
    pub email_text: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    pub date: &'a str,
}

impl<'a> ExtractRequest<'a> {
    pub fn new(prompt: &'a str, email: &'a EmailFields) -> Self {
        ExtractRequest {
            prompt,
            email_text: &email.text,
            from: &email.from,
            to: &email.to,
            date: &email.date,
        }
    }
}

/// Body returned by the extraction collaborator.
#[derive(Debug, Deserialize)]
pub struct ExtractResponse {
    pub extracted_data: Option<ExtractedData>,
}
