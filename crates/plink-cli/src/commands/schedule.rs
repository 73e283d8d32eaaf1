//! Schedule command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use plink_core::{schedule, NoteTable};

use super::build_score;
use crate::ScoreArgs;

/// Computes the timeline and prints a summary or the full JSON.
pub fn run(args: &ScoreArgs, json: bool) -> Result<ExitCode> {
    let score = build_score(args);
    let timeline = schedule(&score, &NoteTable).context("invalid score")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "schedule".bold());
    println!("  melody     {}", score.melody.join(" "));
    println!("  variation  {}", score.variation.join(" "));
    println!(
        "  tempo      {} bpm ({:.4} s per quaver)",
        score.tempo, timeline.quaver_duration
    );
    println!(
        "  structure  3 parts x {} bars ({:.3} s per part)",
        score.bars_per_part, timeline.part_duration
    );
    println!(
        "  total      {:.3} s, {} events",
        timeline.total_duration,
        timeline.events.len()
    );
    Ok(ExitCode::SUCCESS)
}
