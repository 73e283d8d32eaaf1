//! Offline rendering to WAV.
//!
//! [`WavSink`] implements [`AudioSink`] by recording every scheduled
//! command and synthesizing the whole piece into PCM in one pass, so the
//! CLI can produce an audible artifact without a live audio device.
//! Voices are rendered additively from the wave table's partials with a
//! continuous phase accumulator, so frequency changes never click; the
//! shared gain automation is evaluated sample-accurately from the
//! recorded set/ramp/decay/cancel commands.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::RenderError;
use crate::instrument::WaveTable;
use crate::sink::{AudioSink, EnvelopeHandle, VoiceHandle};

/// Default output sample rate.
pub const SAMPLE_RATE: u32 = 44_100;

/// Headroom below full scale after normalization.
const PEAK: f64 = 0.95;

#[derive(Debug, Default)]
struct VoiceState {
    partials: Vec<f64>,
    frequencies: Vec<(f64, f64)>,
    start: Option<f64>,
    stop: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GainChange {
    Set { level: f64 },
    Ramp { level: f64 },
    Decay { target: f64, time_constant: f64 },
}

#[derive(Debug, Default)]
struct RenderState {
    voices: Vec<VoiceState>,
    gain_changes: Vec<(f64, GainChange)>,
}

/// An [`AudioSink`] that renders to PCM instead of a device.
#[derive(Debug)]
pub struct WavSink {
    sample_rate: u32,
    state: Arc<Mutex<RenderState>>,
}

/// Voice handle minted by [`WavSink`].
pub struct RenderVoice {
    index: usize,
    state: Arc<Mutex<RenderState>>,
}

/// Envelope handle minted by [`WavSink`].
pub struct RenderEnvelope {
    state: Arc<Mutex<RenderState>>,
}

fn lock(state: &Arc<Mutex<RenderState>>) -> MutexGuard<'_, RenderState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl VoiceHandle for RenderVoice {
    fn set_wave_table(&mut self, table: &WaveTable) {
        lock(&self.state).voices[self.index].partials = table.partial_amplitudes();
    }

    fn set_frequency_at(&mut self, time: f64, hz: f64) {
        lock(&self.state).voices[self.index].frequencies.push((time, hz));
    }

    fn start_at(&mut self, time: f64) {
        lock(&self.state).voices[self.index].start = Some(time);
    }

    fn stop_at(&mut self, time: f64) {
        lock(&self.state).voices[self.index].stop = Some(time);
    }
}

impl EnvelopeHandle for RenderEnvelope {
    fn set_gain_at(&mut self, time: f64, level: f64) {
        lock(&self.state)
            .gain_changes
            .push((time, GainChange::Set { level }));
    }

    fn ramp_gain_to(&mut self, time: f64, level: f64) {
        lock(&self.state)
            .gain_changes
            .push((time, GainChange::Ramp { level }));
    }

    fn decay_gain_to(&mut self, time: f64, target: f64, time_constant: f64) {
        lock(&self.state)
            .gain_changes
            .push((time, GainChange::Decay { target, time_constant }));
    }

    fn cancel_after(&mut self, time: f64) {
        // Registration-order semantics: only changes scheduled so far,
        // at or after the cancellation point, are dropped.
        lock(&self.state).gain_changes.retain(|(t, _)| *t < time);
    }
}

impl AudioSink for WavSink {
    type Voice = RenderVoice;
    type Envelope = RenderEnvelope;

    fn voice(&mut self) -> RenderVoice {
        let mut state = lock(&self.state);
        state.voices.push(VoiceState::default());
        RenderVoice {
            index: state.voices.len() - 1,
            state: Arc::clone(&self.state),
        }
    }

    fn envelope(&mut self) -> RenderEnvelope {
        RenderEnvelope {
            state: Arc::clone(&self.state),
        }
    }
}

/// One span of the gain curve, valid from `from` until the next segment.
#[derive(Debug, Clone, Copy)]
enum Segment {
    Hold {
        from: f64,
        level: f64,
    },
    Ramp {
        t0: f64,
        v0: f64,
        t1: f64,
        v1: f64,
    },
    Decay {
        t0: f64,
        v0: f64,
        target: f64,
        time_constant: f64,
    },
}

impl Segment {
    fn start(&self) -> f64 {
        match *self {
            Segment::Hold { from, .. } => from,
            Segment::Ramp { t0, .. } => t0,
            Segment::Decay { t0, .. } => t0,
        }
    }

    fn value_at(&self, t: f64) -> f64 {
        match *self {
            Segment::Hold { level, .. } => level,
            Segment::Ramp { t0, v0, t1, v1 } => {
                if t1 <= t0 || t >= t1 {
                    v1
                } else {
                    v0 + (v1 - v0) * (t - t0) / (t1 - t0)
                }
            }
            Segment::Decay {
                t0,
                v0,
                target,
                time_constant,
            } => {
                if time_constant <= 0.0 {
                    target
                } else {
                    target + (v0 - target) * (-(t - t0) / time_constant).exp()
                }
            }
        }
    }
}

/// Turns the recorded gain changes into ordered closed-form segments.
fn build_segments(changes: &[(f64, GainChange)]) -> Vec<Segment> {
    let mut sorted: Vec<(f64, GainChange)> = changes.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut segments = vec![Segment::Hold { from: 0.0, level: 0.0 }];
    let mut prev_time = 0.0;
    for &(time, change) in &sorted {
        let last = segments[segments.len() - 1];
        match change {
            GainChange::Set { level } => {
                segments.push(Segment::Hold { from: time, level });
            }
            GainChange::Ramp { level } => {
                // Ramps run from the previous change, not from the ramp's
                // own timestamp.
                segments.push(Segment::Ramp {
                    t0: prev_time,
                    v0: last.value_at(prev_time),
                    t1: time,
                    v1: level,
                });
            }
            GainChange::Decay { target, time_constant } => {
                segments.push(Segment::Decay {
                    t0: time,
                    v0: last.value_at(time),
                    target,
                    time_constant,
                });
            }
        }
        prev_time = time;
    }
    segments
}

impl WavSink {
    /// Creates a sink rendering at the given sample rate.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            state: Arc::new(Mutex::new(RenderState::default())),
        }
    }

    /// Synthesizes the recorded piece into mono samples in -1..=1.
    ///
    /// Returns an empty buffer when nothing was scheduled. Both voices
    /// are shaped by the one shared gain curve, then mixed and
    /// peak-normalized.
    pub fn render(&self) -> Vec<f64> {
        let state = lock(&self.state);
        let end = state
            .voices
            .iter()
            .filter_map(|v| v.stop)
            .fold(0.0_f64, f64::max);
        let total_samples = (end * self.sample_rate as f64).ceil() as usize;
        if total_samples == 0 {
            return Vec::new();
        }

        let segments = build_segments(&state.gain_changes);
        let dt = 1.0 / self.sample_rate as f64;
        let mut mix = vec![0.0_f64; total_samples];

        // Shared gain curve, one walk for both voices.
        let mut gain = vec![0.0_f64; total_samples];
        let mut seg_idx = 0;
        for (i, g) in gain.iter_mut().enumerate() {
            let t = i as f64 * dt;
            while seg_idx + 1 < segments.len() && segments[seg_idx + 1].start() <= t {
                seg_idx += 1;
            }
            *g = segments[seg_idx].value_at(t);
        }

        for voice in &state.voices {
            let Some(start) = voice.start else { continue };
            let stop = voice.stop.unwrap_or(end);
            if voice.partials.is_empty() {
                continue;
            }
            let mut frequencies: Vec<(f64, f64)> = voice.frequencies.clone();
            frequencies.sort_by(|a, b| a.0.total_cmp(&b.0));

            let norm: f64 = voice.partials.iter().sum::<f64>().max(1.0);
            let mut freq_idx = 0;
            let mut hz = 0.0;
            let mut phase = 0.0_f64;

            for (i, out) in mix.iter_mut().enumerate() {
                let t = i as f64 * dt;
                if t < start || t >= stop {
                    continue;
                }
                while freq_idx < frequencies.len() && frequencies[freq_idx].0 <= t {
                    hz = frequencies[freq_idx].1;
                    freq_idx += 1;
                }
                if hz <= 0.0 {
                    continue;
                }
                phase += std::f64::consts::TAU * hz * dt;
                let sample: f64 = voice
                    .partials
                    .iter()
                    .enumerate()
                    .map(|(k, a)| a * (phase * (k + 1) as f64).sin())
                    .sum();
                *out += sample / norm * gain[i];
            }
        }

        let peak = mix.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        if peak > 0.0 {
            let scale = PEAK / peak;
            for s in &mut mix {
                *s *= scale;
            }
        }
        mix
    }

    /// Renders and writes a 16-bit mono WAV file.
    pub fn finish(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let samples = self.render();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * i16::MAX as f64) as i16)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

impl Default for WavSink {
    fn default() -> Self {
        Self::new(SAMPLE_RATE)
    }
}
