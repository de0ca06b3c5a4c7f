//! Error types for the fallible edges of the crate
//!
//! The simulation itself never fails: every tick recovers locally. Only
//! loading balance data and the host-side record store can return errors.

/// Tuning load/validation errors
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("Tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tuning value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("Invalid tuning range: {min_field} ({min}) > {max_field} ({max})")]
    InvalidRange {
        min_field: &'static str,
        min: f32,
        max_field: &'static str,
        max: f32,
    },
}

/// Record store errors
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error("Record store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Player name must not be empty")]
    EmptyName,

    #[error("Score must be positive")]
    ZeroScore,
}
