//! Plink composition core.
//!
//! This crate is the pure half of plink: it turns a [`Score`] into the
//! complete, deterministic timeline of frequency and envelope commands
//! for a short three-part piece with two voices (treble, bass). Nothing
//! here touches an audio device, the network, or a clock; playback lives
//! in `plink-playback`.
//!
//! # Overview
//!
//! - [`note`] - the fixed note-name → frequency table
//! - [`generate`] - uniform random melody sampling (plain and seeded)
//! - [`score`] - the score configuration and its validation
//! - [`schedule`] - the composition scheduler (the heart of the system)
//!
//! # Determinism
//!
//! Given a materialized score, [`schedule()`] is a pure function: the
//! same score always yields an identical [`Schedule`]. Randomness exists
//! only in melody generation, and even that is reproducible through
//! [`generate_seeded()`].
//!
//! # Example
//!
//! ```
//! use plink_core::{schedule, NoteTable, Score};
//!
//! let score = Score::default();
//! let timeline = schedule(&score, &NoteTable)?;
//! assert_eq!(timeline.total_duration, timeline.part_duration * 3.0);
//! # Ok::<(), plink_core::ScoreError>(())
//! ```

pub mod error;
pub mod generate;
pub mod note;
pub mod schedule;
pub mod score;

// Re-export main types at crate root
pub use error::{CoreResult, ScoreError};
pub use generate::{generate, generate_seeded, DEFAULT_LENGTH};
pub use note::NoteTable;
pub use schedule::{schedule, Command, Event, Schedule, Voice};
pub use score::Score;
