pub mod collaborator;
pub mod extraction_service;
pub mod upload_service;
