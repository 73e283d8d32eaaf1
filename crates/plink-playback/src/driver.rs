//! The playback driver.
//!
//! Applies a computed [`Schedule`] to an [`AudioSink`]: two voices with
//! the same timbre, one shared envelope, treble transport from zero, bass
//! transport only from the second part (part 1 is silent for bass, so its
//! oscillator is not even running yet).

use plink_core::{schedule, Command, NoteTable, Schedule, Score, Voice};

use crate::error::PlayError;
use crate::instrument::{InstrumentStore, WaveTable};
use crate::sink::{AudioSink, EnvelopeHandle, VoiceHandle};

/// Applies every scheduled command to the sink.
///
/// Infallible once the schedule and instrument exist; the sink absorbs
/// the commands and produces output on its own time.
pub fn run<S: AudioSink>(timeline: &Schedule, instrument: &WaveTable, sink: &mut S) {
    let mut treble = sink.voice();
    let mut bass = sink.voice();
    let mut envelope = sink.envelope();

    // Same timbre on both voices.
    treble.set_wave_table(instrument);
    bass.set_wave_table(instrument);

    for event in &timeline.events {
        match event.command {
            Command::SetFrequency { voice, hz } => match voice {
                Voice::Treble => treble.set_frequency_at(event.time, hz),
                Voice::Bass => bass.set_frequency_at(event.time, hz),
            },
            Command::SetGain { level } => envelope.set_gain_at(event.time, level),
            Command::RampGainTo { level } => envelope.ramp_gain_to(event.time, level),
            Command::DecayGainTo {
                target,
                time_constant,
            } => envelope.decay_gain_to(event.time, target, time_constant),
            Command::CancelPending => envelope.cancel_after(event.time),
        }
    }

    treble.start_at(0.0);
    bass.start_at(timeline.part_duration);
    treble.stop_at(timeline.total_duration);
    bass.stop_at(timeline.total_duration);
}

/// Composes and plays a score end to end.
///
/// Scheduling is synchronous and fails fast on a bad score; instrument
/// resolution is the only suspension point, and its failure is returned
/// rather than swallowed (the sink is never touched in that case). On
/// success the applied schedule is handed back for inspection.
pub async fn play<S: AudioSink>(
    score: &Score,
    table: &NoteTable,
    store: &InstrumentStore,
    sink: &mut S,
) -> Result<Schedule, PlayError> {
    let timeline = schedule(score, table)?;
    let instrument = store.resolve(&score.instrument).await?;
    run(&timeline, &instrument, sink);
    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;

    /// What happened to one recorded voice.
    #[derive(Debug, Default, Clone, PartialEq)]
    struct VoiceLog {
        wave_tables: usize,
        frequencies: Vec<(f64, f64)>,
        started_at: Option<f64>,
        stopped_at: Option<f64>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum GainCall {
        Set(f64, f64),
        Ramp(f64, f64),
        Decay(f64, f64, f64),
        Cancel(f64),
    }

    #[derive(Debug, Default)]
    struct SinkLog {
        voices: Vec<VoiceLog>,
        envelopes: usize,
        gain_calls: Vec<GainCall>,
    }

    /// Records every call instead of making sound.
    #[derive(Debug, Default)]
    struct RecordingSink {
        log: Arc<Mutex<SinkLog>>,
    }

    struct RecordingVoice {
        index: usize,
        log: Arc<Mutex<SinkLog>>,
    }

    struct RecordingEnvelope {
        log: Arc<Mutex<SinkLog>>,
    }

    impl VoiceHandle for RecordingVoice {
        fn set_wave_table(&mut self, _table: &WaveTable) {
            self.log.lock().unwrap().voices[self.index].wave_tables += 1;
        }
        fn set_frequency_at(&mut self, time: f64, hz: f64) {
            self.log.lock().unwrap().voices[self.index]
                .frequencies
                .push((time, hz));
        }
        fn start_at(&mut self, time: f64) {
            self.log.lock().unwrap().voices[self.index].started_at = Some(time);
        }
        fn stop_at(&mut self, time: f64) {
            self.log.lock().unwrap().voices[self.index].stopped_at = Some(time);
        }
    }

    impl EnvelopeHandle for RecordingEnvelope {
        fn set_gain_at(&mut self, time: f64, level: f64) {
            self.log.lock().unwrap().gain_calls.push(GainCall::Set(time, level));
        }
        fn ramp_gain_to(&mut self, time: f64, level: f64) {
            self.log.lock().unwrap().gain_calls.push(GainCall::Ramp(time, level));
        }
        fn decay_gain_to(&mut self, time: f64, target: f64, time_constant: f64) {
            self.log
                .lock()
                .unwrap()
                .gain_calls
                .push(GainCall::Decay(time, target, time_constant));
        }
        fn cancel_after(&mut self, time: f64) {
            self.log.lock().unwrap().gain_calls.push(GainCall::Cancel(time));
        }
    }

    impl AudioSink for RecordingSink {
        type Voice = RecordingVoice;
        type Envelope = RecordingEnvelope;

        fn voice(&mut self) -> RecordingVoice {
            let mut log = self.log.lock().unwrap();
            log.voices.push(VoiceLog::default());
            RecordingVoice {
                index: log.voices.len() - 1,
                log: Arc::clone(&self.log),
            }
        }

        fn envelope(&mut self) -> RecordingEnvelope {
            self.log.lock().unwrap().envelopes += 1;
            RecordingEnvelope {
                log: Arc::clone(&self.log),
            }
        }
    }

    fn example_score() -> Score {
        Score {
            bars_per_part: 1,
            tempo: 60.0,
            melody: vec!["c4".into(), "e4".into(), "g4".into()],
            variation: vec!["d4".into(), "f4".into()],
            instrument: "piano".into(),
        }
    }

    #[test]
    fn run_binds_timbre_and_transport() {
        let timeline = schedule(&example_score(), &NoteTable).unwrap();
        let mut sink = RecordingSink::default();
        run(&timeline, &WaveTable::piano(), &mut sink);

        let log = sink.log.lock().unwrap();
        assert_eq!(log.voices.len(), 2);
        assert_eq!(log.envelopes, 1);

        let treble = &log.voices[0];
        let bass = &log.voices[1];
        assert_eq!(treble.wave_tables, 1);
        assert_eq!(bass.wave_tables, 1);

        // Treble runs the whole piece; bass transport waits out part 1.
        assert_eq!(treble.started_at, Some(0.0));
        assert_eq!(bass.started_at, Some(0.75));
        assert_eq!(treble.stopped_at, Some(2.25));
        assert_eq!(bass.stopped_at, Some(2.25));

        // 9 slots of treble, 6 of bass (parts 2 and 3).
        assert_eq!(treble.frequencies.len(), 9);
        assert_eq!(bass.frequencies.len(), 6);
        assert_eq!(treble.frequencies[0], (0.0, 261.6));
        assert_eq!(bass.frequencies[0], (0.75, 130.8));
    }

    #[test]
    fn run_forwards_the_envelope_to_one_controller() {
        let timeline = schedule(&example_score(), &NoteTable).unwrap();
        let mut sink = RecordingSink::default();
        run(&timeline, &WaveTable::piano(), &mut sink);

        let log = sink.log.lock().unwrap();
        // 5 gain calls per slot, 9 slots.
        assert_eq!(log.gain_calls.len(), 45);
        assert_eq!(log.gain_calls[0], GainCall::Set(0.0, 0.0));
        assert_eq!(log.gain_calls[1], GainCall::Ramp(0.25 * 0.05, 1.0));
        assert_eq!(log.gain_calls[4], GainCall::Decay(0.25 - 0.25 * 0.05, 0.0, 0.25 * 0.05));
    }

    #[tokio::test]
    async fn play_fails_fast_on_a_bad_score() {
        let score = Score {
            melody: vec![],
            ..example_score()
        };
        let store = InstrumentStore::new("http://127.0.0.1:9");
        let mut sink = RecordingSink::default();

        let err = play(&score, &NoteTable, &store, &mut sink).await.unwrap_err();
        assert!(matches!(err, PlayError::Score(_)));
        // The sink was never touched.
        assert_eq!(sink.log.lock().unwrap().voices.len(), 0);
    }

    #[tokio::test]
    async fn play_propagates_instrument_failure_without_touching_the_sink() {
        // Port 9 (discard) refuses connections; resolution fails.
        let store = InstrumentStore::new("http://127.0.0.1:9");
        let mut sink = RecordingSink::default();

        let err = play(&example_score(), &NoteTable, &store, &mut sink)
            .await
            .unwrap_err();
        assert!(matches!(err, PlayError::Instrument(_)));
        assert_eq!(sink.log.lock().unwrap().voices.len(), 0);
    }

    #[tokio::test]
    async fn play_with_a_seeded_store_applies_the_schedule() {
        let store = InstrumentStore::new("http://127.0.0.1:9");
        store.insert("piano", WaveTable::piano());
        let mut sink = RecordingSink::default();

        let timeline = play(&example_score(), &NoteTable, &store, &mut sink)
            .await
            .unwrap();
        assert_eq!(timeline.part_duration, 0.75);
        assert_eq!(sink.log.lock().unwrap().voices.len(), 2);
    }
}
