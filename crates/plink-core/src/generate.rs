//! Random melody generation.
//!
//! Each note is drawn independently and uniformly, with replacement, from
//! the note table. There is no state between calls; two generated
//! melodies are unrelated unless they share a seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::note::NoteTable;

/// Default melody length.
pub const DEFAULT_LENGTH: usize = 15;

/// Generates `length` note names by uniform sampling from the table.
///
/// `length == 0` yields an empty sequence. Uses the thread RNG; for
/// reproducible output use [`generate_seeded`].
pub fn generate(table: &NoteTable, length: usize) -> Vec<String> {
    generate_with(table, length, &mut rand::thread_rng())
}

/// Generates a reproducible melody from a 32-bit seed.
///
/// The seed is expanded to 64 bits by duplicating it in both halves, as
/// PCG32's state initialization expects.
pub fn generate_seeded(table: &NoteTable, length: usize, seed: u32) -> Vec<String> {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    let mut rng = Pcg32::seed_from_u64(seed64);
    generate_with(table, length, &mut rng)
}

fn generate_with<R: Rng>(table: &NoteTable, length: usize, rng: &mut R) -> Vec<String> {
    let names: Vec<&str> = table.names().collect();
    (0..length)
        .map(|_| {
            // The table is non-empty by construction.
            (*names.choose(rng).unwrap_or(&names[0])).to_string()
        })
        .collect()
}
