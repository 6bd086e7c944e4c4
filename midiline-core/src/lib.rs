//! # Midiline Core
//!
//! WASM-compatible timing types for MIDI file data models.
//! Provides pitch-bend events, the tick/second conversion seam they are timed
//! through, and a tempo-map header implementing it.
//!
//! ## Features
//!
//! - **serde**: Enable JSON serialization of events and header configuration
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//!
//! ## Example
//!
//! ```
//! use midiline_core::types::{Header, PitchbendChange, PitchbendChangeEvent};
//!
//! let header = Header::default();
//! let mut bend = PitchbendChange::new(PitchbendChangeEvent::new(960, 0.5));
//! assert_eq!(bend.time_seconds(&header), 1.0);
//!
//! bend.set_time_seconds(&header, 0.25);
//! assert_eq!(bend.ticks, 240);
//! ```

pub mod error;
pub mod types;
pub mod wasm;

pub use error::{MidiError, Result};

// Re-export commonly used types
pub use types::{
    pitchbend_midi_to_float, Header, PitchbendChange, PitchbendChangeEvent, PitchbendChangeJson,
    TickConversion,
};

pub use wasm::timed_pitchbends;
