use std::sync::Arc;
use crate::global_session_manager::GlobalSessionManager;
use crate::services::collaborator::{ExtractionCollaborator, ParsingCollaborator};
use crate::services::extraction_service::ExtractionCoordinator;
use crate::services::upload_service::UploadCoordinator;

#[derive(Clone)]
pub struct AppState {
    pub uploads: UploadCoordinator,
    pub extractions: ExtractionCoordinator,
    pub session_manager: GlobalSessionManager,
}

impl AppState {
    pub fn new(
        parser: Arc<dyn ParsingCollaborator>,
        extractor: Arc<dyn ExtractionCollaborator>,
    ) -> Self {
        AppState {
            uploads: UploadCoordinator::new(parser),
            extractions: ExtractionCoordinator::new(extractor),
            session_manager: GlobalSessionManager::new(),
        }
    }
}
