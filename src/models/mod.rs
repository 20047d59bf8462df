pub mod email;
pub mod session_state;
