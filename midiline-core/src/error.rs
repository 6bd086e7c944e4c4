use thiserror::Error;

use crate::types::Ticks;

pub type Result<T> = core::result::Result<T, MidiError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MidiError {
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid tempo {bpm} BPM at tick {ticks}")]
    InvalidTempo { ticks: Ticks, bpm: f64 },

    #[error("MIDI data byte out of range: {0} (expected 0-127)")]
    DataByteOutOfRange(u8),
}
