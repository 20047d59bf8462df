use actix_files::Files;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use eml_extract::config::{self, Settings};
use eml_extract::routes::app_state::AppState;
use eml_extract::routes::{extract_routes, session_routes, upload_routes};
use eml_extract::services::collaborator::HttpCollaborator;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    config::init_logging();

    let settings = Settings::from_env()?;
    log::info!("Parsing collaborator: {}", settings.parser_url);
    log::info!("Extraction collaborator: {}", settings.extractor_url);

    let collaborator = Arc::new(
        HttpCollaborator::from_settings(&settings).context("failed to build HTTP client")?,
    );
    let app_state = AppState::new(collaborator.clone(), collaborator);
    let session_key = Key::generate();
    let static_dir = settings.static_dir.clone();

    log::info!("Starting server on http://{}:{}", settings.bind_host, settings.bind_port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(web::Data::new(app_state.clone()))
            .configure(session_routes::init_routes)
            .configure(upload_routes::init_routes)
            .configure(extract_routes::init_routes)
            // Serve the UI (including index.html) from the static directory.
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((settings.bind_host.as_str(), settings.bind_port))
    .with_context(|| format!("failed to bind {}:{}", settings.bind_host, settings.bind_port))?
    .run()
    .await?;

    Ok(())
}
