pub mod app_state;
pub mod extract_routes;
pub mod session_routes;
pub mod upload_routes;
