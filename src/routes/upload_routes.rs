use actix_web::{post, web, HttpRequest, Responder};
use actix_session::Session;
use crate::handlers::upload_handler::{self, UploadQuery};
use crate::routes::app_state::AppState;

/// Raw `.eml` uploads can be far larger than actix's default payload limit.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .service(upload);
}

#[post("/api/upload")]
async fn upload(
    data: web::Data<AppState>,
    session: Session,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    upload_handler::handle_upload(data, session, req, query, body).await
}
