use log::{error, info};
use std::sync::Arc;

use crate::models::email::{FileHandle, UploadedEmail};
use crate::models::session_state::SessionState;
use crate::services::collaborator::{CollaboratorError, ParsingCollaborator};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to parse email: {0}")]
    TransportFailure(String),

    #[error("Failed to parse email: invalid response ({0})")]
    InvalidResponse(String),
}

impl From<CollaboratorError> for UploadError {
    fn from(error: CollaboratorError) -> Self {
        match error {
            CollaboratorError::InvalidResponse(reason) => UploadError::InvalidResponse(reason),
            e => UploadError::TransportFailure(e.to_string()),
        }
    }
}

/// Sends a selected file to the parsing collaborator.
#[derive(Clone)]
pub struct UploadCoordinator {
    parser: Arc<dyn ParsingCollaborator>,
}

impl UploadCoordinator {
    pub fn new(parser: Arc<dyn ParsingCollaborator>) -> Self {
        UploadCoordinator { parser }
    }

    /// Returns `Ok(None)` without contacting the collaborator when no file was
    /// selected.
    pub async fn upload(&self, file: Option<FileHandle>) -> Result<Option<UploadedEmail>, UploadError> {
        let Some(file) = file else {
            info!("No file selected; skipping upload");
            return Ok(None);
        };

        info!("Uploading {}", file.name);
        match self.parser.parse(&file).await {
            Ok(email) => {
                info!("Email parsed successfully: {}", file.name);
                Ok(Some(UploadedEmail {
                    file_name: file.name,
                    email,
                }))
            }
            Err(e) => {
                error!("Upload of {} failed: {}", file.name, e);
                Err(e.into())
            }
        }
    }

    /// Runs the upload track against a state owned by the caller.
    pub async fn upload_into(
        &self,
        state: &mut SessionState,
        file: Option<FileHandle>,
    ) -> Result<(), UploadError> {
        if file.is_none() {
            return Ok(());
        }
        state.begin_upload();
        match self.upload(file).await {
            Ok(Some(uploaded)) => {
                state.apply_upload(uploaded);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                state.fail_upload(e.to_string());
                Err(e)
            }
        }
    }
}
