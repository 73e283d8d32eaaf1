//! Generate command implementation.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use plink_core::{generate, generate_seeded, NoteTable};

/// Samples `length` notes and prints them space-separated.
pub fn run(length: usize, seed: Option<u32>) -> Result<ExitCode> {
    let table = NoteTable;
    let melody = match seed {
        Some(seed) => generate_seeded(&table, length, seed),
        None => generate(&table, length),
    };

    println!("{}", melody.join(" "));
    if let Some(seed) = seed {
        eprintln!("{} seed {}", "note:".cyan(), seed);
    }
    Ok(ExitCode::SUCCESS)
}
