use log::{debug, error, info};
use std::sync::Arc;

use crate::models::email::{EmailFields, ExtractedData};
use crate::models::session_state::SessionState;
use crate::services::collaborator::{CollaboratorError, ExtractionCollaborator};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Extraction failed: {0}")]
    TransportFailure(String),

    #[error("Extraction failed: invalid response ({0})")]
    InvalidResponse(String),
}

impl From<CollaboratorError> for ExtractError {
    fn from(error: CollaboratorError) -> Self {
        match error {
            CollaboratorError::InvalidResponse(reason) => ExtractError::InvalidResponse(reason),
            e => ExtractError::TransportFailure(e.to_string()),
        }
    }
}

/// Sends the prompt and the current email fields to the extraction
/// collaborator. It does not check that an upload happened: an empty body is
/// still a valid request.
#[derive(Clone)]
pub struct ExtractionCoordinator {
    extractor: Arc<dyn ExtractionCollaborator>,
}

impl ExtractionCoordinator {
    pub fn new(extractor: Arc<dyn ExtractionCollaborator>) -> Self {
        ExtractionCoordinator { extractor }
    }

    pub async fn extract(&self, prompt: &str, email: &EmailFields) -> Result<ExtractedData, ExtractError> {
        info!("Starting extraction");
        debug!("Prompt preview: {}", prompt.chars().take(500).collect::<String>());

        match self.extractor.extract(prompt, email).await {
            Ok(data) => {
                info!("Extraction complete: {} field(s)", data.len());
                Ok(data)
            }
            Err(e) => {
                error!("Extraction failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Runs the extraction track against a state owned by the caller, using
    /// the prompt and email fields it holds right now.
    pub async fn extract_into(&self, state: &mut SessionState) -> Result<(), ExtractError> {
        let prompt = state.prompt.clone();
        let email = state.email_fields();
        state.begin_extraction();
        match self.extract(&prompt, &email).await {
            Ok(data) => {
                state.apply_extraction(data);
                Ok(())
            }
            Err(e) => {
                state.fail_extraction(e.to_string());
                Err(e)
            }
        }
    }
}
