//! Score configuration.
//!
//! A `Score` bundles everything the scheduler needs: the melody, the
//! alternate bass line for the final part, tempo, structure, and the
//! instrument identifier. It is immutable once scheduling begins.

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ScoreError};
use crate::generate::{generate, DEFAULT_LENGTH};
use crate::note::NoteTable;

fn default_bars_per_part() -> u32 {
    4
}

fn default_tempo() -> f64 {
    90.0
}

fn default_instrument() -> String {
    "piano".to_string()
}

fn default_sequence() -> Vec<String> {
    generate(&NoteTable, DEFAULT_LENGTH)
}

/// Configuration for one piece.
///
/// Deserializes from JSON with every field optional; omitted melody or
/// variation fields default to a freshly generated 15-note sequence, so
/// two deserializations of `{}` describe different pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Score {
    /// Bars in each of the three structural parts.
    #[serde(default = "default_bars_per_part")]
    pub bars_per_part: u32,
    /// Tempo in beats per minute; one melody note occupies a quarter of
    /// a beat (a quaver slot of `60 / (tempo * 4)` seconds).
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// The melodic line, repeated cyclically; one traversal is one bar.
    #[serde(default = "default_sequence")]
    pub melody: Vec<String>,
    /// Alternate bass line, heard only in the final part.
    #[serde(default = "default_sequence")]
    pub variation: Vec<String>,
    /// Instrument identifier resolved by the instrument store.
    #[serde(default = "default_instrument")]
    pub instrument: String,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            bars_per_part: default_bars_per_part(),
            tempo: default_tempo(),
            melody: default_sequence(),
            variation: default_sequence(),
            instrument: default_instrument(),
        }
    }
}

impl Score {
    /// Checks every precondition the scheduler relies on.
    ///
    /// Fails fast so that no NaN or infinity can ever enter a schedule:
    /// empty sequences would divide by zero in the duration derivation,
    /// and an unknown note would have no frequency to emit.
    pub fn validate(&self, table: &NoteTable) -> CoreResult<()> {
        if self.melody.is_empty() {
            return Err(ScoreError::EmptyMelody);
        }
        if self.variation.is_empty() {
            return Err(ScoreError::EmptyVariation);
        }
        if !(self.tempo.is_finite() && self.tempo > 0.0) {
            return Err(ScoreError::InvalidTempo { tempo: self.tempo });
        }
        if self.bars_per_part == 0 {
            return Err(ScoreError::InvalidBarsPerPart);
        }
        for name in self.melody.iter().chain(self.variation.iter()) {
            if !table.contains(name) {
                return Err(ScoreError::UnknownNote { name: name.clone() });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn notes(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let score = Score::default();
        assert_eq!(score.bars_per_part, 4);
        assert_eq!(score.tempo, 90.0);
        assert_eq!(score.melody.len(), 15);
        assert_eq!(score.variation.len(), 15);
        assert_eq!(score.instrument, "piano");
        assert_eq!(score.validate(&NoteTable), Ok(()));
    }

    #[test]
    fn empty_json_deserializes_with_defaults() {
        let score: Score = serde_json::from_str("{}").unwrap();
        assert_eq!(score.bars_per_part, 4);
        assert_eq!(score.melody.len(), 15);
        assert_eq!(score.validate(&NoteTable), Ok(()));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result: Result<Score, _> = serde_json::from_str(r#"{"bpm": 120}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validation_failures() {
        let base = Score {
            melody: notes(&["c4"]),
            variation: notes(&["d4"]),
            ..Score::default()
        };

        let empty_melody = Score {
            melody: vec![],
            ..base.clone()
        };
        assert_eq!(empty_melody.validate(&NoteTable), Err(ScoreError::EmptyMelody));

        let empty_variation = Score {
            variation: vec![],
            ..base.clone()
        };
        assert_eq!(
            empty_variation.validate(&NoteTable),
            Err(ScoreError::EmptyVariation)
        );

        let zero_tempo = Score {
            tempo: 0.0,
            ..base.clone()
        };
        assert_eq!(
            zero_tempo.validate(&NoteTable),
            Err(ScoreError::InvalidTempo { tempo: 0.0 })
        );

        let nan_tempo = Score {
            tempo: f64::NAN,
            ..base.clone()
        };
        assert!(matches!(
            nan_tempo.validate(&NoteTable),
            Err(ScoreError::InvalidTempo { .. })
        ));

        let zero_bars = Score {
            bars_per_part: 0,
            ..base.clone()
        };
        assert_eq!(
            zero_bars.validate(&NoteTable),
            Err(ScoreError::InvalidBarsPerPart)
        );

        let bad_note = Score {
            variation: notes(&["d4", "x9"]),
            ..base
        };
        assert_eq!(
            bad_note.validate(&NoteTable),
            Err(ScoreError::UnknownNote {
                name: "x9".to_string()
            })
        );
    }
}
