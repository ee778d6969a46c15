//! Waitlist subsystem — marketing signups appended to a local CSV file

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use alpha_core::validation::normalize_email;
use alpha_core::{AlphaError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::join_error;

/// Serializes appends so the header row is written exactly once.
static WAITLIST_LOCK: Mutex<()> = Mutex::new(());

#[derive(Debug, Serialize)]
struct WaitlistRow<'a> {
    email: &'a str,
    joined_at: String,
}

/// Append one signup row, writing the header when the file is new or empty.
pub fn append_signup(path: &Path, email: &str, joined_at: DateTime<Utc>) -> Result<()> {
    let _guard = WAITLIST_LOCK
        .lock()
        .map_err(|_| AlphaError::Other("waitlist lock poisoned".to_string()))?;

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let is_empty = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_empty)
        .from_writer(file);
    writer.serialize(WaitlistRow {
        email,
        joined_at: joined_at.to_rfc3339(),
    })?;
    writer.flush()?;
    Ok(())
}

pub async fn join_waitlist(csv_path: &str, email: &str, now: DateTime<Utc>) -> Result<String> {
    let email = normalize_email(email)?;
    let path = PathBuf::from(csv_path);

    let row_email = email.clone();
    tokio::task::spawn_blocking(move || append_signup(&path, &row_email, now))
        .await
        .map_err(join_error)??;

    tracing::info!(csv = csv_path, "Waitlist signup recorded");
    Ok(email)
}
