//! # Midiline
//!
//! Midiline times MIDI pitch-bend events against a tempo map. It reads a JSON
//! document describing a file header (PPQ resolution and tempo changes) and a
//! list of raw pitch-bend events, validates each event, and produces
//! `{ ticks, time, value }` records with the time in seconds.
//!
//! ## Modules
//!
//! - `config`: Command line and environment configuration of the binary.
//! - `document`: Input document format, per-event validation and conversion.
//!
//! The data model itself lives in `midiline-core`.

pub mod config;
pub mod document;

// Re-export commonly used types and functions for convenience
pub use crate::config::{MalformedPolicy, RunConfig};
pub use crate::document::{convert, Conversion, Document};
pub use midiline_core::types::{Header, PitchbendChange, PitchbendChangeEvent, TickConversion};
