use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;
use crate::handlers::session_handler::{require_session, session_not_initialized, superseded};
use crate::models::email::FileHandle;
use crate::routes::app_state::AppState;

const DEFAULT_FILE_NAME: &str = "email.eml";

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

/// An empty body means no file was selected.
pub fn file_from_request(filename: Option<String>, body: web::Bytes) -> Option<FileHandle> {
    if body.is_empty() {
        return None;
    }
    let name = filename
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
    Some(FileHandle::new(name, body.to_vec()))
}

pub async fn handle_upload(
    data: web::Data<AppState>,
    session: Session,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> HttpResponse {
    let id = match require_session(&data, &session, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let Some(file) = file_from_request(query.into_inner().filename, body) else {
        info!("Upload for session {} carried no file", id);
        return match data.session_manager.get(&id) {
            Some(state) => HttpResponse::Ok().json(json!({ "uploaded": false, "state": state })),
            None => session_not_initialized(),
        };
    };

    debug!("Session {} uploading {} ({} bytes)", id, file.name, file.bytes.len());
    let Some(generation) = data.session_manager.update(&id, |state| {
        state.begin_upload();
        state.generation
    }) else {
        return session_not_initialized();
    };

    // The session lock is not held while the collaborator works.
    let outcome = data.uploads.upload(Some(file)).await;

    let applied = data.session_manager.update(&id, |state| {
        if state.generation != generation {
            return None;
        }
        match &outcome {
            Ok(Some(uploaded)) => state.apply_upload(uploaded.clone()),
            Ok(None) => {}
            Err(e) => state.fail_upload(e.to_string()),
        }
        Some(state.clone())
    });

    match (applied, outcome) {
        (Some(Some(state)), Ok(_)) => HttpResponse::Ok().json(json!({
            "uploaded": true,
            "message": "Email parsed successfully",
            "state": state,
        })),
        (Some(Some(state)), Err(e)) => HttpResponse::BadGateway().json(json!({
            "error": e.to_string(),
            "state": state,
        })),
        (Some(None), _) => {
            info!("Dropping upload result for session {}: session was reset", id);
            superseded("upload")
        }
        (None, _) => {
            warn!("Session {} was removed while its upload was in flight", id);
            session_not_initialized()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_no_file() {
        assert!(file_from_request(Some("a.eml".to_string()), web::Bytes::new()).is_none());
    }

    #[test]
    fn test_missing_name_gets_default() {
        let file = file_from_request(Some("  ".to_string()), web::Bytes::from_static(b"x")).unwrap();
        assert_eq!(file.name, DEFAULT_FILE_NAME);
        let file = file_from_request(None, web::Bytes::from_static(b"x")).unwrap();
        assert_eq!(file.name, DEFAULT_FILE_NAME);
        let file = file_from_request(Some("a.eml".to_string()), web::Bytes::from_static(b"x")).unwrap();
        assert_eq!(file.name, "a.eml");
        assert_eq!(file.bytes, b"x");
    }
}
