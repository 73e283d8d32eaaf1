//! Plink playback.
//!
//! The side-effecting half of plink: everything between a computed
//! schedule and audible output.
//!
//! - [`instrument`] - wave-table resolution over HTTP with a
//!   cache-on-first-load store
//! - [`sink`] - the trait boundary an audio destination must satisfy
//! - [`driver`] - applies a schedule to a sink; the async [`play()`]
//!   facade ties validation, scheduling, and resolution together
//! - [`render`] - an offline sink that renders the piece to a WAV file
//!
//! Scheduling itself lives in `plink-core` and is pure; this crate owns
//! the two suspension-prone concerns (the network and the sink) and
//! keeps their failures typed and propagated.

pub mod driver;
pub mod error;
pub mod instrument;
pub mod render;
pub mod sink;

// Re-export main types at crate root
pub use driver::{play, run};
pub use error::{InstrumentError, PlayError, RenderError};
pub use instrument::{InstrumentStore, WaveTable};
pub use render::{WavSink, SAMPLE_RATE};
pub use sink::{AudioSink, EnvelopeHandle, VoiceHandle};
