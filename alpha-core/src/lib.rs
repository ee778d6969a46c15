pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod linker;
pub mod models;
pub mod protection;
pub mod security;
pub mod validation;

pub use config::AlphaConfig;
pub use error::{AlphaError, Result};
pub use history::{merge_history, HistoryEntry, HISTORY_LIMIT};
pub use linker::resolve_meal_link;
pub use protection::{calculate_protection_status, ProtectionState, ProtectionStatus};
