//! The composition scheduler.
//!
//! Turns a validated [`Score`] into the complete, deterministic timeline
//! of frequency and envelope commands for one playback of the piece.
//!
//! # Structure of a piece
//!
//! The piece is three parts of `bars_per_part` bars each; one bar is one
//! full traversal of the melody. The treble voice plays the melody in
//! every slot of every bar. The bass voice is silent in part 1, doubles
//! the melody an octave down in part 2, and plays the variation an octave
//! down in part 3. The variation index rides the global slot counter
//! rather than resetting at bar boundaries, so its cycle drifts freely
//! against the melody's.
//!
//! # Envelope
//!
//! Every slot gets the same percussive pluck shape on the shared gain
//! controller, expressed as fractions of the quaver: attack 0.05,
//! decay 0.8, sustain 0, release 0.05. The shape is a fixed articulation
//! policy, independent of pitch, voice, and instrument.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::note::NoteTable;
use crate::score::Score;

/// Attack duration as a fraction of the quaver.
const ATTACK: f64 = 0.05;
/// Decay time-constant as a fraction of the quaver.
const DECAY: f64 = 0.8;
/// Sustain level the decay approaches.
const SUSTAIN: f64 = 0.0;
/// Release duration as a fraction of the quaver.
const RELEASE: f64 = 0.05;

/// The two simultaneous voices of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voice {
    /// The melodic line, present in every part.
    Treble,
    /// The octave-down line, absent from part 1.
    Bass,
}

/// One scheduled change, to be applied at [`Event::time`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Set a voice's oscillator frequency.
    SetFrequency {
        /// Target voice.
        voice: Voice,
        /// Frequency in Hz.
        hz: f64,
    },
    /// Set the shared gain immediately.
    SetGain {
        /// Gain level, 0..=1.
        level: f64,
    },
    /// Ramp the shared gain linearly, reaching `level` at the event time.
    RampGainTo {
        /// Gain level reached at the event time.
        level: f64,
    },
    /// Decay the shared gain exponentially toward `target`, starting at
    /// the event time.
    DecayGainTo {
        /// Level the decay approaches asymptotically.
        target: f64,
        /// Time constant of the approach, seconds.
        time_constant: f64,
    },
    /// Cancel every gain change scheduled after the event time.
    CancelPending,
}

/// A command with its absolute start time in seconds from playback start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Seconds from playback start.
    pub time: f64,
    /// The change to apply.
    #[serde(flatten)]
    pub command: Command,
}

/// The derived, read-only output of the scheduler.
///
/// Events are ordered by slot and, within a slot, in emission order:
/// frequencies first, then the envelope shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Duration of one note slot, seconds.
    pub quaver_duration: f64,
    /// Duration of one structural part, seconds.
    pub part_duration: f64,
    /// Duration of the whole piece (three parts), seconds.
    pub total_duration: f64,
    /// Every scheduled command, in order.
    pub events: Vec<Event>,
}

/// Computes the full timeline for a score.
///
/// Validates the score first and fails fast on any precondition
/// violation; on success the result is a pure function of the score, so
/// scheduling the same score twice yields identical output.
pub fn schedule(score: &Score, table: &NoteTable) -> CoreResult<Schedule> {
    score.validate(table)?;

    let quaver = 60.0 / (score.tempo * 4.0);
    let bar_duration = quaver * score.melody.len() as f64;
    let part_duration = bar_duration * score.bars_per_part as f64;
    let total_bars = score.bars_per_part as usize * 3;
    let last_part_start = total_bars - score.bars_per_part as usize;

    // Validated above, so every lookup succeeds.
    let melody_hz: Vec<f64> = score
        .melody
        .iter()
        .map(|n| table.frequency(n).unwrap_or_default())
        .collect();
    let variation_hz: Vec<f64> = score
        .variation
        .iter()
        .map(|n| table.frequency(n).unwrap_or_default())
        .collect();

    let slots = total_bars * melody_hz.len();
    let mut events = Vec::with_capacity(slots * 7);

    for i in 0..slots {
        let start = i as f64 * quaver;
        let bar = i / melody_hz.len();
        let hz = melody_hz[i % melody_hz.len()];

        events.push(Event {
            time: start,
            command: Command::SetFrequency {
                voice: Voice::Treble,
                hz,
            },
        });

        if bar >= last_part_start {
            // Final part: the variation, an octave down, cycling on the
            // global slot counter.
            events.push(Event {
                time: start,
                command: Command::SetFrequency {
                    voice: Voice::Bass,
                    hz: variation_hz[i % variation_hz.len()] / 2.0,
                },
            });
        } else if bar >= score.bars_per_part as usize {
            // Middle part: the melody doubled an octave down.
            events.push(Event {
                time: start,
                command: Command::SetFrequency {
                    voice: Voice::Bass,
                    hz: hz / 2.0,
                },
            });
        }

        push_envelope(&mut events, start, quaver);
    }

    Ok(Schedule {
        quaver_duration: quaver,
        part_duration,
        total_duration: part_duration * 3.0,
        events,
    })
}

/// Emits the fixed pluck shape for one slot on the shared gain.
fn push_envelope(events: &mut Vec<Event>, start: f64, quaver: f64) {
    let attack_time = start + quaver * ATTACK;
    let release_time = start + quaver - quaver * RELEASE;

    events.push(Event {
        time: start,
        command: Command::SetGain { level: 0.0 },
    });
    events.push(Event {
        time: attack_time,
        command: Command::RampGainTo { level: 1.0 },
    });
    events.push(Event {
        time: attack_time,
        command: Command::DecayGainTo {
            target: SUSTAIN,
            time_constant: quaver * DECAY,
        },
    });
    events.push(Event {
        time: release_time,
        command: Command::CancelPending,
    });
    events.push(Event {
        time: release_time,
        command: Command::DecayGainTo {
            target: 0.0,
            time_constant: quaver * RELEASE,
        },
    });
}

impl Schedule {
    /// Scheduled treble frequencies in slot order.
    pub fn treble_frequencies(&self) -> Vec<f64> {
        self.frequencies(Voice::Treble)
    }

    /// Scheduled bass frequencies in slot order (silent slots absent).
    pub fn bass_frequencies(&self) -> Vec<f64> {
        self.frequencies(Voice::Bass)
    }

    fn frequencies(&self, voice: Voice) -> Vec<f64> {
        self.events
            .iter()
            .filter_map(|e| match e.command {
                Command::SetFrequency { voice: v, hz } if v == voice => Some(hz),
                _ => None,
            })
            .collect()
    }
}
