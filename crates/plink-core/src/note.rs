//! The note table: the fixed pitch vocabulary of the treble voice.
//!
//! Names map to frequencies in Hz, equal temperament with A4 = 440.0,
//! rounded to one decimal. The bass voice uses the same table one octave
//! down (half frequency); that halving lives in the scheduler, not here.

/// Ordered (name, frequency) pairs covering the natural notes C4..C6.
///
/// The order is fixed so that uniform sampling over indices is
/// well-defined and reproducible under a seeded generator.
static NOTES: [(&str, f64); 15] = [
    ("c4", 261.6),
    ("d4", 293.7),
    ("e4", 329.6),
    ("f4", 349.2),
    ("g4", 392.0),
    ("a4", 440.0),
    ("b4", 493.9),
    ("c5", 523.3),
    ("d5", 587.3),
    ("e5", 659.3),
    ("f5", 698.5),
    ("g5", 784.0),
    ("a5", 880.0),
    ("b5", 987.8),
    ("c6", 1046.5),
];

/// The fixed note-name → frequency table.
///
/// A zero-sized handle over the built-in table; passing it explicitly
/// keeps the scheduler free of hidden globals.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteTable;

impl NoteTable {
    /// Looks up the frequency in Hz for a note name.
    pub fn frequency(&self, name: &str) -> Option<f64> {
        NOTES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, freq)| *freq)
    }

    /// Returns true if the name is part of the pitch vocabulary.
    pub fn contains(&self, name: &str) -> bool {
        self.frequency(name).is_some()
    }

    /// The ordered note names available for sampling.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        NOTES.iter().map(|(n, _)| *n)
    }

    /// Number of notes in the table.
    pub fn len(&self) -> usize {
        NOTES.len()
    }

    /// The table is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_frequencies() {
        let table = NoteTable;
        assert_eq!(table.frequency("c4"), Some(261.6));
        assert_eq!(table.frequency("a4"), Some(440.0));
        assert_eq!(table.frequency("c6"), Some(1046.5));
    }

    #[test]
    fn unknown_name_is_none() {
        let table = NoteTable;
        assert_eq!(table.frequency("h4"), None);
        assert_eq!(table.frequency("C4"), None);
        assert!(!table.contains(""));
    }

    #[test]
    fn names_are_ordered_and_resolvable() {
        let table = NoteTable;
        let names: Vec<_> = table.names().collect();
        assert_eq!(names.len(), table.len());
        assert_eq!(names[0], "c4");
        assert!(names.iter().all(|n| table.contains(n)));
    }

    #[test]
    fn frequencies_strictly_ascend() {
        let table = NoteTable;
        let freqs: Vec<f64> = table.names().map(|n| table.frequency(n).unwrap()).collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }
}
