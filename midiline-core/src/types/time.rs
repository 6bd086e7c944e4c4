//! Tick and second units for MIDI file timing
//!
//! Ticks are the authoritative time unit of a MIDI file: integer pulses whose
//! length depends on the file's PPQ resolution and the tempo in effect.
//! Seconds are always derived from ticks through a tempo map.

/// Tick offset from the start of a track
pub type Ticks = u64;

/// Wall-clock time in seconds
pub type Seconds = f64;

/// Default resolution (pulses per quarter note) for new headers
pub const DEFAULT_PPQ: u16 = 480;

/// Tempo assumed before the first tempo event, per the MIDI file format
pub const DEFAULT_BPM: f64 = 120.0;

/// Slowest tempo a Set Tempo meta event can encode (0xFFFFFF µs per beat)
pub const MIN_BPM: f64 = 60_000_000.0 / 16_777_215.0;

/// Length of one quarter-note beat at `bpm`
#[inline]
pub fn seconds_per_beat(bpm: f64) -> Seconds {
    60.0 / bpm
}

/// Convert a tick count to (fractional) beats
#[inline]
pub fn ticks_to_beats(ticks: Ticks, ppq: u16) -> f64 {
    ticks as f64 / ppq as f64
}

/// Convert beats back to the nearest tick, clamping below zero
pub fn beats_to_ticks(beats: f64, ppq: u16) -> Ticks {
    let ticks = (beats * ppq as f64).round();
    if ticks <= 0.0 {
        0
    } else {
        ticks as Ticks
    }
}
