use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use crate::handlers::session_handler::{require_session, session_not_initialized, superseded};
use crate::routes::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ExtractBody {
    pub prompt: Option<String>,
}

/// An empty body means "use the stored prompt"; anything else must be valid JSON.
pub fn parse_extract_body(body: &[u8]) -> Result<ExtractBody, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ExtractBody::default());
    }
    serde_json::from_slice(body)
}

pub async fn handle_extract(
    data: web::Data<AppState>,
    session: Session,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let id = match require_session(&data, &session, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let new_prompt = match parse_extract_body(&body) {
        Ok(parsed) => parsed.prompt,
        Err(e) => {
            warn!("Malformed extract body for session {}: {}", id, e);
            return HttpResponse::BadRequest().json(json!({ "error": format!("Malformed request body: {}", e) }));
        }
    };

    // Inputs are read from the session at call time.
    let Some((prompt, email, generation)) = data.session_manager.update(&id, |state| {
        if let Some(prompt) = new_prompt {
            state.set_prompt(prompt);
        }
        state.begin_extraction();
        (state.prompt.clone(), state.email_fields(), state.generation)
    }) else {
        return session_not_initialized();
    };

    info!("Session {} extracting with a {} char prompt", id, prompt.chars().count());
    let outcome = data.extractions.extract(&prompt, &email).await;

    let applied = data.session_manager.update(&id, |state| {
        if state.generation != generation {
            return None;
        }
        let result = match outcome {
            Ok(extracted) => {
                state.apply_extraction(extracted);
                Ok(())
            }
            Err(e) => {
                state.fail_extraction(e.to_string());
                Err(e)
            }
        };
        Some((state.clone(), result))
    });

    match applied {
        Some(Some((state, Ok(())))) => HttpResponse::Ok().json(json!({
            "extracted_data": state.extracted_data,
            "state": state,
        })),
        Some(Some((state, Err(e)))) => HttpResponse::BadGateway().json(json!({
            "error": e.to_string(),
            "state": state,
        })),
        Some(None) => {
            info!("Dropping extraction result for session {}: session was reset", id);
            superseded("extraction")
        }
        None => {
            warn!("Session {} was removed while its extraction was in flight", id);
            session_not_initialized()
        }
    }
}
