pub mod auth;
pub mod error;
pub mod extract;
pub mod http;
pub mod subsystems;
