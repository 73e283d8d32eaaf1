//! Error types for the composition core.

use thiserror::Error;

/// Result type for composition operations.
pub type CoreResult<T> = Result<T, ScoreError>;

/// Errors raised while validating a score, before any scheduling
/// arithmetic runs.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    /// The melody has no notes; bar duration would be zero.
    #[error("melody is empty")]
    EmptyMelody,

    /// The variation has no notes; the final part could not cycle it.
    #[error("variation is empty")]
    EmptyVariation,

    /// Tempo must be a positive, finite number of beats per minute.
    #[error("invalid tempo: {tempo} (must be positive and finite)")]
    InvalidTempo {
        /// The rejected tempo.
        tempo: f64,
    },

    /// Bars per part must be at least 1.
    #[error("bars per part must be at least 1")]
    InvalidBarsPerPart,

    /// A melody or variation note is absent from the note table.
    #[error("unknown note '{name}'")]
    UnknownNote {
        /// The unresolvable note name.
        name: String,
    },
}
