use actix_web::{post, web, HttpRequest, Responder};
use actix_session::Session;
use crate::handlers::extract_handler;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(extract);
}

#[post("/api/extract")]
async fn extract(
    data: web::Data<AppState>,
    session: Session,
    req: HttpRequest,
    body: web::Bytes,
) -> impl Responder {
    extract_handler::handle_extract(data, session, req, body).await
}
