//! Plink CLI - compose, inspect, and render generative pieces.
//!
//! `generate` prints a freshly sampled note sequence, `schedule` shows
//! the computed timeline for a score, and `render` writes the piece to a
//! WAV file.

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

mod commands;

/// Plink - procedural two-voice composition
#[derive(Parser)]
#[command(name = "plink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Score options shared by the schedule and render commands.
#[derive(Args)]
struct ScoreArgs {
    /// Bars in each of the three parts
    #[arg(long, default_value_t = 4)]
    bars_per_part: u32,

    /// Tempo in beats per minute
    #[arg(long, default_value_t = 90.0)]
    tempo: f64,

    /// Instrument identifier
    #[arg(long, default_value = "piano")]
    instrument: String,

    /// Comma-separated melody notes (default: randomly generated)
    #[arg(long, value_delimiter = ',')]
    melody: Option<Vec<String>>,

    /// Comma-separated variation notes (default: randomly generated)
    #[arg(long, value_delimiter = ',')]
    variation: Option<Vec<String>>,

    /// Seed for reproducible melody/variation generation
    #[arg(long)]
    seed: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a random note sequence from the note table
    Generate {
        /// Number of notes to sample
        #[arg(short, long, default_value_t = 15)]
        length: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u32>,
    },

    /// Compute and display the timeline for a score
    Schedule {
        #[command(flatten)]
        score: ScoreArgs,

        /// Print the full schedule as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Compose a piece and render it to a WAV file
    Render {
        #[command(flatten)]
        score: ScoreArgs,

        /// Output WAV path
        #[arg(short, long, default_value = "piece.wav")]
        output: String,

        /// Instrument server base URL (default: built-in wave table)
        #[arg(long)]
        base_url: Option<String>,

        /// Output sample rate in Hz
        #[arg(long, default_value_t = plink_playback::SAMPLE_RATE)]
        sample_rate: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { length, seed } => commands::generate::run(length, seed),
        Commands::Schedule { score, json } => commands::schedule::run(&score, json),
        Commands::Render {
            score,
            output,
            base_url,
            sample_rate,
        } => commands::render::run(&score, &output, base_url.as_deref(), sample_rate),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            use colored::Colorize;
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
