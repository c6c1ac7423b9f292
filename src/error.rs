use thiserror::Error;

// ---------------------------------------------------------------------------
// Query errors – caller-correctable input problems
// ---------------------------------------------------------------------------

/// Malformed query input. A valid query with no matches is never an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Site identifier outside the fixed known-site set.
    #[error("unknown launch site selector '{0}'")]
    InvalidSelector(String),

    /// Payload interval with `min > max`, a negative bound or a non-finite bound.
    #[error("invalid payload range [{min_kg}, {max_kg}] kg")]
    InvalidRange { min_kg: f64, max_kg: f64 },
}

// ---------------------------------------------------------------------------
// Dataset errors – schema contract violations at load time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("record {row}: payload mass {value} kg is negative or not finite")]
    InvalidPayload { row: usize, value: f64 },
}
