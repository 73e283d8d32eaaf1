//! Command implementations.

pub mod generate;
pub mod render;
pub mod schedule;

use plink_core::{generate_seeded, NoteTable, Score};

use crate::ScoreArgs;

/// Builds a score from the shared CLI options.
///
/// A seed makes omitted melody/variation reproducible; melody and
/// variation draw from adjacent seeds so they differ.
pub fn build_score(args: &ScoreArgs) -> Score {
    let table = NoteTable;
    let sequence = |explicit: &Option<Vec<String>>, offset: u32| match explicit {
        Some(notes) => notes.clone(),
        None => match args.seed {
            Some(seed) => generate_seeded(&table, plink_core::DEFAULT_LENGTH, seed.wrapping_add(offset)),
            None => plink_core::generate(&table, plink_core::DEFAULT_LENGTH),
        },
    };

    Score {
        bars_per_part: args.bars_per_part,
        tempo: args.tempo,
        melody: sequence(&args.melody, 0),
        variation: sequence(&args.variation, 1),
        instrument: args.instrument.clone(),
    }
}
