// midiline-core/src/types/mod.rs

pub mod header;
pub mod pitchbend;
pub mod time;

pub use header::{Header, HeaderConfig, TempoConfig, TempoEvent, TickConversion};
pub use pitchbend::{
    pitchbend_float_to_midi, pitchbend_midi_to_float, try_pitchbend_midi_to_float,
    PitchbendChange, PitchbendChangeEvent, PitchbendChangeJson, TimedPitchbend, PITCHBEND_CENTER,
    PITCHBEND_MAX,
};
pub use time::{Seconds, Ticks, DEFAULT_BPM, DEFAULT_PPQ};
