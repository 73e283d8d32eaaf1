//! The audio-sink boundary.
//!
//! The actual audio device is an external collaborator; these traits are
//! the whole contract the playback driver needs from it. Times are
//! seconds relative to playback start.

use crate::instrument::WaveTable;

/// An oscillator-like voice obtained from a sink.
pub trait VoiceHandle {
    /// Binds the voice's periodic waveform to a wave table.
    fn set_wave_table(&mut self, table: &WaveTable);

    /// Schedules a frequency change.
    fn set_frequency_at(&mut self, time: f64, hz: f64);

    /// Schedules the voice's transport to start.
    fn start_at(&mut self, time: f64);

    /// Schedules the voice's transport to stop.
    fn stop_at(&mut self, time: f64);
}

/// The shared gain controller both voices are routed through.
pub trait EnvelopeHandle {
    /// Schedules an immediate gain change.
    fn set_gain_at(&mut self, time: f64, level: f64);

    /// Schedules a linear ramp reaching `level` at `time`.
    fn ramp_gain_to(&mut self, time: f64, level: f64);

    /// Schedules an exponential approach toward `target` starting at
    /// `time` with the given time constant.
    fn decay_gain_to(&mut self, time: f64, target: f64, time_constant: f64);

    /// Cancels every gain change already scheduled at or after `time`.
    fn cancel_after(&mut self, time: f64);
}

/// A destination that can mint voices and one shared envelope routed to
/// its output.
pub trait AudioSink {
    /// Voice handle type.
    type Voice: VoiceHandle;
    /// Envelope handle type.
    type Envelope: EnvelopeHandle;

    /// Creates a new independently controllable voice.
    fn voice(&mut self) -> Self::Voice;

    /// Creates the shared gain/envelope controller.
    fn envelope(&mut self) -> Self::Envelope;
}
