pub mod extract_handler;
pub mod session_handler;
pub mod upload_handler;
