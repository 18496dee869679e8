//! Error types for night planning.
//!
//! All failures are explicit results. A missing critical crossing is fatal for
//! the run; advisory conditions (such as a short secondary window) are carried
//! on the [`crate::models::ObservationPlan`] as warnings instead.

use crate::models::EventKind;

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    /// A crossing the window derivation cannot proceed without was not found
    /// in the sampled horizon.
    #[error("required {body} {kind} event not found in the sampled horizon")]
    MissingEvent { body: String, kind: EventKind },

    /// Configuration rejected before any sampling begins.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ScheduleError {
    /// Shorthand for a fatal missing-event error.
    pub fn missing_event(body: impl Into<String>, kind: EventKind) -> Self {
        ScheduleError::MissingEvent {
            body: body.into(),
            kind,
        }
    }
}
