//! Protection status derived from the most recent dose.
//!
//! Minutes since the dose fall into three bands:
//!
//! ```text
//!   [0, 30)    DISSOLVING   remaining = 30 - elapsed
//!   [30, 180]  PROTECTED    remaining = 180 - elapsed
//!   (180, ∞)   VULNERABLE   remaining = 0
//! ```
//!
//! With no dose on record the state is IDLE.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Minutes after a dose before protection starts.
pub const DISSOLVE_MINUTES: f64 = 30.0;

/// Minutes after a dose at which protection ends (inclusive).
pub const WINDOW_MINUTES: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProtectionState {
    Idle,
    Dissolving,
    Protected,
    Vulnerable,
}

impl ProtectionState {
    pub fn message(&self) -> &'static str {
        match self {
            ProtectionState::Idle => "No dose taken today.",
            ProtectionState::Dissolving => "Wait... Dose is absorbing.",
            ProtectionState::Protected => "Safe to eat!",
            ProtectionState::Vulnerable => "Window closed. Take next dose.",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ProtectionState::Idle => "#94a3b8",
            ProtectionState::Dissolving => "#f59e0b",
            ProtectionState::Protected => "#10b981",
            ProtectionState::Vulnerable => "#0ea5e9",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtectionStatus {
    pub status: ProtectionState,
    pub message: &'static str,
    pub color: &'static str,
    /// Minutes until the next state change (0 when none is pending)
    pub remaining: f64,
}

impl ProtectionStatus {
    fn new(status: ProtectionState, remaining: f64) -> Self {
        Self {
            status,
            message: status.message(),
            color: status.color(),
            remaining,
        }
    }

    pub fn idle() -> Self {
        Self::new(ProtectionState::Idle, 0.0)
    }
}

/// Status for a user whose latest dose was at `last_dose` (None: never dosed).
pub fn calculate_protection_status(
    last_dose: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ProtectionStatus {
    let last_dose = match last_dose {
        Some(ts) => ts,
        None => return ProtectionStatus::idle(),
    };

    let mut elapsed = (now - last_dose).num_milliseconds() as f64 / 60_000.0;
    if elapsed < 0.0 {
        // Future-dated dose means clock skew; treat it as just taken.
        tracing::warn!(
            last_dose = %last_dose,
            now = %now,
            "Dose timestamp is in the future, clamping elapsed time to zero"
        );
        elapsed = 0.0;
    }

    classify_elapsed(elapsed)
}

/// Bucket a non-negative number of minutes since the last dose.
pub fn classify_elapsed(elapsed_minutes: f64) -> ProtectionStatus {
    if elapsed_minutes < DISSOLVE_MINUTES {
        ProtectionStatus::new(
            ProtectionState::Dissolving,
            DISSOLVE_MINUTES - elapsed_minutes,
        )
    } else if elapsed_minutes <= WINDOW_MINUTES {
        ProtectionStatus::new(
            ProtectionState::Protected,
            WINDOW_MINUTES - elapsed_minutes,
        )
    } else {
        ProtectionStatus::new(ProtectionState::Vulnerable, 0.0)
    }
}
