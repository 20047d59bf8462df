use serde::Serialize;
use crate::models::email::{EmailFields, ExtractedData, UploadedEmail};

/// Progress of one track (upload or extraction).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum TrackState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

/// Everything one user session knows: the last parsed email, the prompt being
/// edited, and the last extraction result.
///
/// The upload track owns the email fields, the extraction track owns
/// `extracted_data`. Neither track touches the other's fields, so a new upload
/// leaves a previous extraction result in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub selected_file_name: String,
    pub rendered_html: String,
    pub plain_text: String,
    pub from_address: String,
    pub to_address: String,
    pub received_date: String,
    pub prompt: String,
    pub extracted_data: ExtractedData,
    pub upload_track: TrackState,
    pub extraction_track: TrackState,
    /// Bumped by `reset`; completions started under an older generation are dropped.
    #[serde(skip)]
    pub generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every field and starts a new generation.
    pub fn reset(&mut self) {
        *self = SessionState {
            generation: self.generation + 1,
            ..Self::default()
        };
    }

    pub fn begin_upload(&mut self) {
        self.upload_track = TrackState::InFlight;
    }

    /// Writes every upload-owned field at once.
    pub fn apply_upload(&mut self, uploaded: UploadedEmail) {
        let UploadedEmail { file_name, email } = uploaded;
        self.selected_file_name = file_name;
        self.rendered_html = email.html;
        self.plain_text = email.text;
        self.from_address = email.from;
        self.to_address = email.to;
        self.received_date = email.date;
        self.upload_track = TrackState::Succeeded;
    }

    pub fn fail_upload(&mut self, message: impl Into<String>) {
        self.upload_track = TrackState::Failed(message.into());
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Snapshot of the fields an extraction sends, taken at call time.
    pub fn email_fields(&self) -> EmailFields {
        EmailFields {
            text: self.plain_text.clone(),
            from: self.from_address.clone(),
            to: self.to_address.clone(),
            date: self.received_date.clone(),
        }
    }

    pub fn begin_extraction(&mut self) {
        self.extraction_track = TrackState::InFlight;
    }

    /// Replaces the previous result wholesale; keys are never merged.
    pub fn apply_extraction(&mut self, data: ExtractedData) {
        self.extracted_data = data;
        self.extraction_track = TrackState::Succeeded;
    }

    pub fn fail_extraction(&mut self, message: impl Into<String>) {
        self.extraction_track = TrackState::Failed(message.into());
    }

    /// The extraction panel: the result as indented JSON.
    pub fn extracted_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.extracted_data).unwrap_or_else(|_| "{}".to_string())
    }

    /// The preview panel: the rendered body, or a placeholder before any upload.
    pub fn preview_html(&self) -> &str {
        if self.rendered_html.is_empty() {
            "<i>No email preview yet.</i>"
        } else {
            &self.rendered_html
        }
    }
}
