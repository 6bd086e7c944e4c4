//! Pitch-bend events
//!
//! A pitch bend arrives on the wire as a 14-bit value split into two 7-bit
//! data bytes. Here it is stored normalized to `[-2, 2]` (center 0.0) next to
//! its tick position. Time in seconds is never stored: it is derived from the
//! ticks through whatever [`TickConversion`] the caller hands in, so tempo map
//! edits show up on the next read.

use crate::error::{MidiError, Result};
use crate::types::header::TickConversion;
use crate::types::time::{Seconds, Ticks};

/// Largest 14-bit pitch-bend value
pub const PITCHBEND_MAX: u16 = 16383;

/// 14-bit value of a centered (no bend) wheel
pub const PITCHBEND_CENTER: u16 = 8192;

/// Convert a 14-bit pitch bend (`msb`, `lsb`) to a float in `[-2, 2]`
///
/// Data bytes are not range checked; bytes above 127 give values outside
/// `[-2, 2]`. Use [`try_pitchbend_midi_to_float`] to reject them.
#[inline]
pub fn pitchbend_midi_to_float(msb: u8, lsb: u8) -> f64 {
    let combined = msb as f64 * 128.0 + lsb as f64;
    combined / PITCHBEND_MAX as f64 * 4.0 - 2.0
}

/// Strict [`pitchbend_midi_to_float`]: both bytes must be 7-bit
pub fn try_pitchbend_midi_to_float(msb: u8, lsb: u8) -> Result<f64> {
    for byte in [msb, lsb] {
        if byte > 0x7f {
            return Err(MidiError::DataByteOutOfRange(byte));
        }
    }
    Ok(pitchbend_midi_to_float(msb, lsb))
}

/// Convert a float in `[-2, 2]` back to the nearest 14-bit (`msb`, `lsb`) pair
///
/// Values outside the range saturate at 0 or 16383.
pub fn pitchbend_float_to_midi(value: f64) -> (u8, u8) {
    let scaled = ((value + 2.0) / 4.0 * PITCHBEND_MAX as f64).round();
    let combined = if scaled.is_nan() {
        PITCHBEND_CENTER
    } else {
        scaled.clamp(0.0, PITCHBEND_MAX as f64) as u16
    };
    ((combined >> 7) as u8, (combined & 0x7f) as u8)
}

/// Raw parsed pitch-bend event, as delivered by a MIDI file reader
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PitchbendChangeEvent {
    /// Tick position from the start of the track
    pub absolute_time: Ticks,
    /// Already normalized bend value
    pub value: f64,
}

impl PitchbendChangeEvent {
    pub fn new(absolute_time: Ticks, value: f64) -> Self {
        Self {
            absolute_time,
            value,
        }
    }
}

/// A pitch-bend change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchbendChange {
    /// Bend amount, nominally in `[-2, 2]`
    pub value: f64,
    /// Tick time of the event
    pub ticks: Ticks,
}

impl PitchbendChange {
    pub fn new(event: PitchbendChangeEvent) -> Self {
        Self {
            ticks: event.absolute_time,
            value: event.value,
        }
    }

    /// Like [`PitchbendChange::new`], but rejects a NaN or infinite value
    pub fn try_new(event: PitchbendChangeEvent) -> Result<Self> {
        if !event.value.is_finite() {
            return Err(MidiError::MalformedEvent(format!(
                "pitch bend value at tick {} is not a finite number",
                event.absolute_time
            )));
        }
        Ok(Self::new(event))
    }

    /// Build from the two data bytes of a pitch-bend message
    pub fn from_midi(ticks: Ticks, msb: u8, lsb: u8) -> Self {
        Self {
            ticks,
            value: pitchbend_midi_to_float(msb, lsb),
        }
    }

    /// The value as 14-bit (`msb`, `lsb`) data bytes
    pub fn to_midi(&self) -> (u8, u8) {
        pitchbend_float_to_midi(self.value)
    }

    /// The time of the event in seconds
    pub fn time_seconds<H: TickConversion + ?Sized>(&self, header: &H) -> Seconds {
        header.ticks_to_seconds(self.ticks)
    }

    /// Move the event to `seconds`; ticks become whatever `header` maps it to
    pub fn set_time_seconds<H: TickConversion + ?Sized>(&mut self, header: &H, seconds: Seconds) {
        self.ticks = header.seconds_to_ticks(seconds);
    }

    pub fn to_json<H: TickConversion + ?Sized>(&self, header: &H) -> PitchbendChangeJson {
        PitchbendChangeJson {
            ticks: self.ticks,
            time: self.time_seconds(header),
            value: self.value,
        }
    }

    /// Pair the event with a header for serialization
    pub fn with_header<'a, H: TickConversion + ?Sized>(
        &'a self,
        header: &'a H,
    ) -> TimedPitchbend<'a, H> {
        TimedPitchbend {
            event: self,
            header,
        }
    }
}

impl From<PitchbendChangeEvent> for PitchbendChange {
    fn from(event: PitchbendChangeEvent) -> Self {
        Self::new(event)
    }
}

/// Serialized form of a [`PitchbendChange`]
///
/// Field order is part of the format: `ticks`, `time`, `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchbendChangeJson {
    pub ticks: Ticks,
    pub time: Seconds,
    pub value: f64,
}

impl From<PitchbendChangeJson> for PitchbendChange {
    /// `time` is dropped; ticks stay authoritative
    fn from(json: PitchbendChangeJson) -> Self {
        Self {
            ticks: json.ticks,
            value: json.value,
        }
    }
}

/// A pitch-bend change borrowed together with the header that times it
pub struct TimedPitchbend<'a, H: ?Sized> {
    event: &'a PitchbendChange,
    header: &'a H,
}

impl<H: TickConversion + ?Sized> TimedPitchbend<'_, H> {
    pub fn time(&self) -> Seconds {
        self.event.time_seconds(self.header)
    }

    pub fn to_json(&self) -> PitchbendChangeJson {
        self.event.to_json(self.header)
    }
}

#[cfg(feature = "serde")]
impl<H: TickConversion + ?Sized> serde::Serialize for TimedPitchbend<'_, H> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> core::result::Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.to_json(), serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::header::Header;
    use std::cell::Cell;

    /// Exact linear mapping at a fixed tick rate
    struct LinearHeader {
        ticks_per_second: Cell<f64>,
    }

    impl LinearHeader {
        fn new(ticks_per_second: f64) -> Self {
            Self {
                ticks_per_second: Cell::new(ticks_per_second),
            }
        }
    }

    impl TickConversion for LinearHeader {
        fn ticks_to_seconds(&self, ticks: Ticks) -> Seconds {
            ticks as f64 / self.ticks_per_second.get()
        }

        fn seconds_to_ticks(&self, seconds: Seconds) -> Ticks {
            (seconds * self.ticks_per_second.get()).round() as Ticks
        }
    }

    /// Always answers the same tick, to observe what gets stored
    struct FixedTicks(Ticks);

    impl TickConversion for FixedTicks {
        fn ticks_to_seconds(&self, _ticks: Ticks) -> Seconds {
            0.0
        }

        fn seconds_to_ticks(&self, _seconds: Seconds) -> Ticks {
            self.0
        }
    }

    #[test]
    fn test_midi_to_float_extremes() {
        assert_eq!(pitchbend_midi_to_float(0, 0), -2.0);
        assert_eq!(pitchbend_midi_to_float(127, 127), 2.0);
    }

    #[test]
    fn test_midi_to_float_center() {
        let center = pitchbend_midi_to_float(64, 0);
        assert!(center.abs() < 0.001);
        assert!((center - (8192.0 / 16383.0 * 4.0 - 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_midi_to_float_monotonic() {
        let mut last = f64::NEG_INFINITY;
        for msb in 0..=127u8 {
            for lsb in 0..=127u8 {
                let value = pitchbend_midi_to_float(msb, lsb);
                assert!(value >= last, "not monotonic at ({}, {})", msb, lsb);
                last = value;
            }
        }
    }

    #[test]
    fn test_midi_to_float_is_permissive() {
        // 255 * 128 + 0 is past the 14-bit range, still computed
        assert!(pitchbend_midi_to_float(255, 0) > 2.0);
    }

    #[test]
    fn test_strict_conversion() {
        assert_eq!(try_pitchbend_midi_to_float(127, 127), Ok(2.0));
        assert_eq!(
            try_pitchbend_midi_to_float(64, 128),
            Err(MidiError::DataByteOutOfRange(128))
        );
        assert_eq!(
            try_pitchbend_midi_to_float(200, 0),
            Err(MidiError::DataByteOutOfRange(200))
        );
    }

    #[test]
    fn test_float_to_midi() {
        assert_eq!(pitchbend_float_to_midi(-2.0), (0, 0));
        assert_eq!(pitchbend_float_to_midi(2.0), (127, 127));
        assert_eq!(pitchbend_float_to_midi(0.0), (64, 0));
        assert_eq!(pitchbend_float_to_midi(9.0), (127, 127));
        assert_eq!(pitchbend_float_to_midi(-9.0), (0, 0));
        assert_eq!(pitchbend_float_to_midi(f64::NAN), (64, 0));
    }

    #[test]
    fn test_float_to_midi_inverts_every_value() {
        for msb in (0..=127u8).step_by(7) {
            for lsb in 0..=127u8 {
                let value = pitchbend_midi_to_float(msb, lsb);
                assert_eq!(pitchbend_float_to_midi(value), (msb, lsb));
            }
        }
    }

    #[test]
    fn test_construction_from_event() {
        let event = PitchbendChange::new(PitchbendChangeEvent::new(960, 0.5));
        assert_eq!(event.ticks, 960);
        assert_eq!(event.value, 0.5);
    }

    #[test]
    fn test_new_does_not_validate() {
        let event = PitchbendChange::new(PitchbendChangeEvent::new(0, f64::NAN));
        assert!(event.value.is_nan());
        // Out-of-range values are kept as is
        let event = PitchbendChange::new(PitchbendChangeEvent::new(0, 7.5));
        assert_eq!(event.value, 7.5);
    }

    #[test]
    fn test_try_new_rejects_non_finite() {
        let result = PitchbendChange::try_new(PitchbendChangeEvent::new(12, f64::INFINITY));
        assert!(matches!(result, Err(MidiError::MalformedEvent(_))));
        assert!(PitchbendChange::try_new(PitchbendChangeEvent::new(12, 1.0)).is_ok());
    }

    #[test]
    fn test_from_midi() {
        let event = PitchbendChange::from_midi(48, 127, 127);
        assert_eq!(event.ticks, 48);
        assert_eq!(event.value, 2.0);
        assert_eq!(event.to_midi(), (127, 127));
    }

    #[test]
    fn test_example_scenario() {
        let header = LinearHeader::new(480.0);
        let mut event = PitchbendChange::new(PitchbendChangeEvent::new(960, 0.5));

        assert_eq!(event.ticks, 960);
        assert_eq!(event.time_seconds(&header), 2.0);
        assert_eq!(event.value, 0.5);
        assert_eq!(
            event.to_json(&header),
            PitchbendChangeJson {
                ticks: 960,
                time: 2.0,
                value: 0.5,
            }
        );

        event.set_time_seconds(&header, 1.5);
        assert_eq!(event.ticks, 720);
    }

    #[test]
    fn test_time_round_trip_with_exact_header() {
        let header = LinearHeader::new(480.0);
        for ticks in [0, 1, 480, 720, 96_000] {
            let original = PitchbendChange::new(PitchbendChangeEvent::new(ticks, 0.0));
            let time = original.time_seconds(&header);

            let mut copy = PitchbendChange::new(PitchbendChangeEvent::new(0, 0.0));
            copy.set_time_seconds(&header, time);
            assert_eq!(copy.ticks, ticks);
        }
    }

    #[test]
    fn test_set_time_stores_header_ticks_unchanged() {
        let mut event = PitchbendChange::new(PitchbendChangeEvent::new(10, 0.0));
        event.set_time_seconds(&FixedTicks(12_345), 99.9);
        assert_eq!(event.ticks, 12_345);
    }

    #[test]
    fn test_time_is_not_cached() {
        let header = LinearHeader::new(480.0);
        let event = PitchbendChange::new(PitchbendChangeEvent::new(960, 0.0));
        assert_eq!(event.time_seconds(&header), 2.0);

        header.ticks_per_second.set(960.0);
        assert_eq!(event.time_seconds(&header), 1.0);
    }

    #[test]
    fn test_time_follows_tempo_map_edits() {
        let mut header = Header::default();
        let event = PitchbendChange::from_midi(960, 64, 0);
        assert!((event.time_seconds(&header) - 1.0).abs() < 1e-9);

        header.set_tempo(0, 60.0).unwrap();
        assert!((event.time_seconds(&header) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_instances_sharing_header_are_independent() {
        let header = LinearHeader::new(480.0);
        let mut a = PitchbendChange::new(PitchbendChangeEvent::new(480, 0.25));
        let b = PitchbendChange::new(PitchbendChangeEvent::new(480, -0.25));
        assert_eq!(a.time_seconds(&header), b.time_seconds(&header));

        a.ticks = 4800;
        assert_eq!(a.time_seconds(&header), 10.0);
        assert_eq!(b.time_seconds(&header), 1.0);
    }

    #[test]
    fn test_to_json_matches_instance() {
        let header = Header::default();
        let event = PitchbendChange::new(PitchbendChangeEvent::new(1440, -1.25));
        let json = event.to_json(&header);

        assert_eq!(json.ticks, event.ticks);
        assert_eq!(json.time, event.time_seconds(&header));
        assert_eq!(json.value, event.value);
        assert_eq!(json, event.to_json(&header));
    }

    #[test]
    fn test_json_back_to_event_keeps_ticks() {
        let json = PitchbendChangeJson {
            ticks: 240,
            time: 1000.0,
            value: 1.0,
        };
        let event = PitchbendChange::from(json);
        assert_eq!(event.ticks, 240);
        assert_eq!(event.value, 1.0);
    }

    #[test]
    fn test_timed_view() {
        let header = LinearHeader::new(100.0);
        let event = PitchbendChange::new(PitchbendChangeEvent::new(250, 0.0));
        let timed = event.with_header(&header);
        assert_eq!(timed.time(), 2.5);
        assert_eq!(timed.to_json().ticks, 250);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialized_key_order() {
        let header = LinearHeader::new(480.0);
        let event = PitchbendChange::new(PitchbendChangeEvent::new(960, 0.5));

        let json = serde_json::to_string(&event.with_header(&header)).unwrap();
        assert_eq!(json, r#"{"ticks":960,"time":2.0,"value":0.5}"#);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_event_deserializes_from_camel_case() {
        let event: PitchbendChangeEvent =
            serde_json::from_str(r#"{"absoluteTime": 960, "value": 0.5}"#).unwrap();
        assert_eq!(event, PitchbendChangeEvent::new(960, 0.5));
    }
}
