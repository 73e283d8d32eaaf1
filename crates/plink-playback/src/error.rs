//! Error types for the playback crate.

use plink_core::ScoreError;
use thiserror::Error;

/// Errors from resolving an instrument identifier to a wave table.
#[derive(Debug, Error)]
pub enum InstrumentError {
    /// Transport or JSON-decode failure.
    #[error("instrument fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status; `body` carries the
    /// raw response text.
    #[error("instrument fetch returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

/// Errors surfaced to the caller of `play`.
///
/// Score problems are synchronous and precede any scheduling; instrument
/// problems arrive asynchronously and mean the sink was never touched.
#[derive(Debug, Error)]
pub enum PlayError {
    /// The score failed validation.
    #[error(transparent)]
    Score(#[from] ScoreError),

    /// Instrument resolution failed.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),
}

/// Errors from writing a rendered piece to disk.
#[derive(Debug, Error)]
pub enum RenderError {
    /// WAV encoding or I/O failure.
    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),
}
