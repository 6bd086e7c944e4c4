//! Tempo map and tick/second conversion
//!
//! A [`Header`] carries the timing information of a MIDI file: its PPQ
//! resolution and the list of tempo changes. Events only ever store ticks and
//! reach wall-clock time through the [`TickConversion`] trait, so a header can
//! be swapped for any other timing source (a fixed-rate clock, a test stub).

use crate::error::{MidiError, Result};
use crate::types::time::{
    beats_to_ticks, seconds_per_beat, ticks_to_beats, Seconds, Ticks, DEFAULT_BPM, DEFAULT_PPQ,
    MIN_BPM,
};

/// Conversion between tick time and seconds
///
/// Implementations should be deterministic for a given tempo configuration
/// and, ideally, inverse of each other up to tick rounding.
pub trait TickConversion {
    fn ticks_to_seconds(&self, ticks: Ticks) -> Seconds;
    fn seconds_to_ticks(&self, seconds: Seconds) -> Ticks;
}

impl<T: TickConversion + ?Sized> TickConversion for &T {
    fn ticks_to_seconds(&self, ticks: Ticks) -> Seconds {
        (**self).ticks_to_seconds(ticks)
    }

    fn seconds_to_ticks(&self, seconds: Seconds) -> Ticks {
        (**self).seconds_to_ticks(seconds)
    }
}

/// A tempo change
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoEvent {
    /// Position of the change in ticks
    pub ticks: Ticks,
    /// Tempo in quarter-note beats per minute
    pub bpm: f64,
    /// Position of the change in seconds (derived from the earlier tempo changes)
    pub time: Seconds,
}

/// Declarative description of a header, as found in input documents
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeaderConfig {
    pub ppq: u16,
    pub tempos: Vec<TempoConfig>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            ppq: DEFAULT_PPQ,
            tempos: Vec::new(),
        }
    }
}

/// A tempo entry of a [`HeaderConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoConfig {
    pub ticks: Ticks,
    pub bpm: f64,
}

/// Timing header of a MIDI file
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    ppq: u16,
    /// Sorted by ticks, `time` kept in sync by `update`
    tempos: Vec<TempoEvent>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            ppq: DEFAULT_PPQ,
            tempos: Vec::new(),
        }
    }
}

impl Header {
    /// Create a header with no tempo events (120 BPM throughout)
    pub fn new(ppq: u16) -> Result<Self> {
        if ppq == 0 {
            return Err(MidiError::InvalidHeader(
                "PPQ must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            ppq,
            tempos: Vec::new(),
        })
    }

    /// Build a header from its declarative description
    pub fn from_config(config: &HeaderConfig) -> Result<Self> {
        let mut header = Self::new(config.ppq)?;
        for tempo in &config.tempos {
            header.insert_tempo(tempo.ticks, tempo.bpm)?;
        }
        header.update();
        Ok(header)
    }

    /// Pulses per quarter note
    pub fn ppq(&self) -> u16 {
        self.ppq
    }

    /// Tempo events, sorted by ticks
    pub fn tempos(&self) -> &[TempoEvent] {
        &self.tempos
    }

    /// Set the tempo starting at `ticks`, replacing any change already there
    pub fn set_tempo(&mut self, ticks: Ticks, bpm: f64) -> Result<()> {
        self.insert_tempo(ticks, bpm)?;
        self.update();
        Ok(())
    }

    /// Remove the tempo change at `ticks`, if any
    pub fn remove_tempo(&mut self, ticks: Ticks) -> bool {
        let before = self.tempos.len();
        self.tempos.retain(|e| e.ticks != ticks);
        let removed = self.tempos.len() != before;
        if removed {
            self.update();
        }
        removed
    }

    fn insert_tempo(&mut self, ticks: Ticks, bpm: f64) -> Result<()> {
        // Below MIN_BPM a beat can outlast what f64 seconds hold for large ticks
        if !bpm.is_finite() || bpm < MIN_BPM {
            return Err(MidiError::InvalidTempo { ticks, bpm });
        }

        if let Some(event) = self.tempos.iter_mut().find(|e| e.ticks == ticks) {
            event.bpm = bpm;
        } else {
            self.tempos.push(TempoEvent {
                ticks,
                bpm,
                time: 0.0,
            });
        }
        Ok(())
    }

    /// Sort the tempo events and recompute their positions in seconds
    ///
    /// The segment before the first tempo event plays at the default 120 BPM.
    fn update(&mut self) {
        self.tempos.sort_by_key(|e| e.ticks);

        let mut current_time = 0.0;
        let mut last_ticks = 0;
        let mut last_bpm = DEFAULT_BPM;
        for event in self.tempos.iter_mut() {
            let beats = ticks_to_beats(event.ticks - last_ticks, self.ppq);
            event.time = current_time + seconds_per_beat(last_bpm) * beats;

            current_time = event.time;
            last_ticks = event.ticks;
            last_bpm = event.bpm;
        }

        log::debug!(
            "Header timeline rebuilt: {} tempo event(s) at {} PPQ",
            self.tempos.len(),
            self.ppq
        );
    }

    /// Last tempo change at or before `ticks`
    fn tempo_at_ticks(&self, ticks: Ticks) -> Option<&TempoEvent> {
        let idx = self.tempos.partition_point(|e| e.ticks <= ticks);
        idx.checked_sub(1).map(|i| &self.tempos[i])
    }

    /// Last tempo change at or before `seconds`
    fn tempo_at_seconds(&self, seconds: Seconds) -> Option<&TempoEvent> {
        let idx = self.tempos.partition_point(|e| e.time <= seconds);
        idx.checked_sub(1).map(|i| &self.tempos[i])
    }

    /// Tempo in effect at `ticks`
    pub fn bpm_at(&self, ticks: Ticks) -> f64 {
        self.tempo_at_ticks(ticks)
            .map(|e| e.bpm)
            .unwrap_or(DEFAULT_BPM)
    }
}

impl TickConversion for Header {
    fn ticks_to_seconds(&self, ticks: Ticks) -> Seconds {
        match self.tempo_at_ticks(ticks) {
            Some(tempo) => {
                let elapsed_beats = ticks_to_beats(ticks - tempo.ticks, self.ppq);
                tempo.time + seconds_per_beat(tempo.bpm) * elapsed_beats
            }
            None => seconds_per_beat(DEFAULT_BPM) * ticks_to_beats(ticks, self.ppq),
        }
    }

    fn seconds_to_ticks(&self, seconds: Seconds) -> Ticks {
        match self.tempo_at_seconds(seconds) {
            Some(tempo) => {
                let elapsed_beats = (seconds - tempo.time) / seconds_per_beat(tempo.bpm);
                beats_to_ticks(
                    ticks_to_beats(tempo.ticks, self.ppq) + elapsed_beats,
                    self.ppq,
                )
            }
            None => beats_to_ticks(seconds / seconds_per_beat(DEFAULT_BPM), self.ppq),
        }
    }
}
