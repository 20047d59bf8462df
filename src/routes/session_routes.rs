use actix_web::{get, post, put, web, HttpRequest, HttpResponse, Responder};
use crate::routes::app_state::AppState;
use crate::handlers::session_handler::{self, PromptBody};
use actix_session::Session;
use serde_json::json;
use log::error;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(init_session)
        .service(state)
        .service(prompt)
        .service(preview)
        .service(extracted)
        .service(reset);
}

#[get("/api/session")]
async fn init_session(data: web::Data<AppState>, session: Session, req: HttpRequest) -> impl Responder {
    match session_handler::initialize_session(data, session, req).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(e) => {
            error!("Error initializing session: {:?}", e);
            HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
        }
    }
}

#[get("/api/state")]
async fn state(data: web::Data<AppState>, session: Session, req: HttpRequest) -> impl Responder {
    session_handler::get_state(data, session, req).await
}

#[put("/api/prompt")]
async fn prompt(
    data: web::Data<AppState>,
    session: Session,
    req: HttpRequest,
    body: web::Json<PromptBody>,
) -> impl Responder {
    session_handler::set_prompt(data, session, req, body).await
}

#[get("/api/preview")]
async fn preview(data: web::Data<AppState>, session: Session, req: HttpRequest) -> impl Responder {
    session_handler::preview(data, session, req).await
}

#[get("/api/extracted")]
async fn extracted(data: web::Data<AppState>, session: Session, req: HttpRequest) -> impl Responder {
    session_handler::extracted(data, session, req).await
}

#[post("/api/reset")]
async fn reset(data: web::Data<AppState>, session: Session, req: HttpRequest) -> impl Responder {
    session_handler::reset(data, session, req).await
}
