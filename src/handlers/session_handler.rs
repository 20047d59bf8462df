use actix_session::{Session, SessionInsertError};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use crate::models::session_state::SessionState;
use crate::routes::app_state::AppState;

/// Header consulted when the cookie session carries no id.
pub const SESSION_HEADER: &str = "X-Session-Id";

/// Returns the caller's live session if it has one, otherwise starts a new one.
pub async fn initialize_session(
    data: web::Data<AppState>,
    session: Session,
    req: HttpRequest,
) -> Result<serde_json::Value, SessionInsertError> {
    if let Some(id) = session_id(&session, &req) {
        if data.session_manager.contains(&id) {
            info!("Reusing user session: {}", id);
            return Ok(json!({ "initialized": true, "session_id": id }));
        }
        info!("Replacing unknown session id {}", id);
    }

    let session_id = Uuid::new_v4().to_string();
    session.insert("session_id", session_id.clone())?;
    info!("Stored session_id {} in cookie", session_id);

    data.session_manager.insert(session_id.clone(), SessionState::new());
    info!("Initialized user session: {}", session_id);

    Ok(json!({ "initialized": true, "session_id": session_id }))
}

/// Reads the session id from the cookie, falling back to the request header.
pub fn session_id(session: &Session, req: &HttpRequest) -> Option<String> {
    match session.get::<String>("session_id") {
        Ok(Some(id)) => return Some(id),
        Ok(None) => {}
        Err(e) => warn!("Unreadable session cookie: {:?}", e),
    }
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Resolves the caller's session, or the error response to send back.
pub fn require_session(
    data: &AppState,
    session: &Session,
    req: &HttpRequest,
) -> Result<String, HttpResponse> {
    match session_id(session, req) {
        Some(id) if data.session_manager.contains(&id) => Ok(id),
        Some(id) => {
            error!("Session \"{}\" not found!", id);
            Err(session_not_initialized())
        }
        None => {
            warn!("Request without a session id");
            Err(session_not_initialized())
        }
    }
}

pub fn session_not_initialized() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": "Session not initialized" }))
}

pub async fn get_state(data: web::Data<AppState>, session: Session, req: HttpRequest) -> HttpResponse {
    let id = match require_session(&data, &session, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match data.session_manager.get(&id) {
        Some(state) => HttpResponse::Ok().json(state),
        None => session_not_initialized(),
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptBody {
    pub prompt: String,
}

pub async fn set_prompt(
    data: web::Data<AppState>,
    session: Session,
    req: HttpRequest,
    body: web::Json<PromptBody>,
) -> HttpResponse {
    let id = match require_session(&data, &session, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let prompt = body.into_inner().prompt;
    match data.session_manager.update(&id, |state| {
        state.set_prompt(prompt);
        state.clone()
    }) {
        Some(state) => HttpResponse::Ok().json(state),
        None => session_not_initialized(),
    }
}

pub async fn preview(data: web::Data<AppState>, session: Session, req: HttpRequest) -> HttpResponse {
    let id = match require_session(&data, &session, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match data.session_manager.get(&id) {
        Some(state) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            // Email markup is untrusted; keep it off the app's origin.
            .insert_header(("Content-Security-Policy", "sandbox"))
            .body(state.preview_html().to_string()),
        None => session_not_initialized(),
    }
}

pub async fn extracted(data: web::Data<AppState>, session: Session, req: HttpRequest) -> HttpResponse {
    let id = match require_session(&data, &session, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match data.session_manager.get(&id) {
        Some(state) => HttpResponse::Ok()
            .content_type("application/json")
            .body(state.extracted_pretty()),
        None => session_not_initialized(),
    }
}

/// Starts the session over with a fresh state. Tracks still in flight for the
/// old generation are dropped when they complete.
pub async fn reset(data: web::Data<AppState>, session: Session, req: HttpRequest) -> HttpResponse {
    let id = match require_session(&data, &session, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match data.session_manager.update(&id, |state| {
        state.reset();
        state.clone()
    }) {
        Some(state) => {
            info!("Reset session {}", id);
            HttpResponse::Ok().json(state)
        }
        None => session_not_initialized(),
    }
}

/// Response for a track whose session was reset while it was in flight.
pub fn superseded(track: &str) -> HttpResponse {
    HttpResponse::Conflict().json(json!({
        "error": format!("Session was reset while the {} was in flight", track)
    }))
}
