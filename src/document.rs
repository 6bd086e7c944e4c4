//! Input documents: a header description plus raw pitch-bend events
//!
//! Events are validated one by one so a single bad entry can be skipped
//! without losing the rest of the document.

use crate::config::MalformedPolicy;
use anyhow::Context;
use midiline_core::types::{
    try_pitchbend_midi_to_float, Header, HeaderConfig, PitchbendChange, PitchbendChangeEvent,
    PitchbendChangeJson, Ticks,
};
use midiline_core::{MidiError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub header: HeaderConfig,
    /// Kept untyped until conversion, see [`parse_event`]
    #[serde(default)]
    pub pitchbends: Vec<serde_json::Value>,
}

impl Document {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Invalid input document")
    }
}

/// A pitch-bend entry as written in a document
///
/// The bend is either an already normalized `value` or the two MIDI data
/// bytes `msb` and `lsb`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPitchbend {
    pub absolute_time: Option<Ticks>,
    pub value: Option<f64>,
    pub msb: Option<u8>,
    pub lsb: Option<u8>,
}

impl RawPitchbend {
    pub fn into_event(self) -> Result<PitchbendChangeEvent> {
        let absolute_time = self
            .absolute_time
            .ok_or_else(|| MidiError::MalformedEvent("missing absoluteTime".to_string()))?;

        let value = match (self.value, self.msb, self.lsb) {
            (Some(value), None, None) => value,
            (None, Some(msb), Some(lsb)) => try_pitchbend_midi_to_float(msb, lsb)?,
            (None, None, None) => {
                return Err(MidiError::MalformedEvent("missing value".to_string()));
            }
            (Some(_), _, _) => {
                return Err(MidiError::MalformedEvent(
                    "value and msb/lsb are mutually exclusive".to_string(),
                ));
            }
            (None, _, _) => {
                return Err(MidiError::MalformedEvent(
                    "msb and lsb must be given together".to_string(),
                ));
            }
        };

        Ok(PitchbendChangeEvent::new(absolute_time, value))
    }
}

/// Validate one raw document entry
pub fn parse_event(raw: &serde_json::Value) -> Result<PitchbendChange> {
    let raw = RawPitchbend::deserialize(raw)
        .map_err(|e| MidiError::MalformedEvent(e.to_string()))?;
    PitchbendChange::try_new(raw.into_event()?)
}

/// Result of converting a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub ppq: u16,
    pub pitchbends: Vec<PitchbendChangeJson>,
    /// Number of malformed events dropped under [`MalformedPolicy::Skip`]
    #[serde(skip)]
    pub skipped: usize,
}

/// Build the header and time every pitch-bend event of `document`
pub fn convert(document: &Document, policy: MalformedPolicy) -> Result<Conversion> {
    let header = Header::from_config(&document.header)?;

    let mut pitchbends = Vec::with_capacity(document.pitchbends.len());
    let mut skipped = 0;
    for (index, raw) in document.pitchbends.iter().enumerate() {
        match parse_event(raw) {
            Ok(event) => pitchbends.push(event.to_json(&header)),
            Err(e) => match policy {
                MalformedPolicy::Fail => {
                    return Err(MidiError::MalformedEvent(format!(
                        "pitchbends[{}]: {}",
                        index, e
                    )));
                }
                MalformedPolicy::Skip => {
                    log::warn!(
                        "Skipping pitchbends[{}] (policy: {}): {}",
                        index,
                        policy.name(),
                        e
                    );
                    skipped += 1;
                }
            },
        }
    }

    log::debug!(
        "Converted {} pitch bend(s), skipped {}",
        pitchbends.len(),
        skipped
    );

    Ok(Conversion {
        ppq: header.ppq(),
        pitchbends,
        skipped,
    })
}
