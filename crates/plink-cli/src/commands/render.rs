//! Render command implementation.
//!
//! Composes a piece, resolves its instrument (from an instrument server
//! or the built-in wave table), and renders it offline to a WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use plink_core::NoteTable;
use plink_playback::{play, InstrumentStore, WavSink, WaveTable};

use super::build_score;
use crate::ScoreArgs;

/// Runs the full compose → resolve → render pipeline.
pub fn run(
    args: &ScoreArgs,
    output: &str,
    base_url: Option<&str>,
    sample_rate: u32,
) -> Result<ExitCode> {
    let score = build_score(args);

    let store = match base_url {
        Some(url) => InstrumentStore::new(url),
        None => {
            // No server configured: serve the built-in timbre under
            // whatever identifier the score asks for.
            let store = InstrumentStore::new("http://localhost:0");
            store.insert(score.instrument.clone(), WaveTable::piano());
            store
        }
    };

    let mut sink = WavSink::new(sample_rate);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let timeline = runtime
        .block_on(play(&score, &NoteTable, &store, &mut sink))
        .context("playback failed")?;

    sink.finish(output)
        .with_context(|| format!("failed to write {output}"))?;

    println!(
        "{} {} ({:.3} s, {} events)",
        "wrote".green().bold(),
        output,
        timeline.total_duration,
        timeline.events.len()
    );
    Ok(ExitCode::SUCCESS)
}
