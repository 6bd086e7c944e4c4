//! WASM bindings for midiline-core
//!
//! Exposes pitch-bend conversion and header-timed serialization to JavaScript.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

use crate::error::Result;
use crate::types::{
    Header, HeaderConfig, PitchbendChange, PitchbendChangeEvent, PitchbendChangeJson,
};

/// Time a batch of raw events against a header description
///
/// Shared by the JS bindings; usable natively as well.
pub fn timed_pitchbends(
    config: &HeaderConfig,
    events: &[PitchbendChangeEvent],
) -> Result<Vec<PitchbendChangeJson>> {
    let header = Header::from_config(config)?;
    events
        .iter()
        .map(|event| Ok(PitchbendChange::try_new(*event)?.to_json(&header)))
        .collect()
}

// ============================================================================
// WASM Bindings
// ============================================================================

#[cfg(feature = "wasm")]
fn to_js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = pitchbendToFloat)]
pub fn pitchbend_to_float(msb: u8, lsb: u8) -> f64 {
    crate::types::pitchbend_midi_to_float(msb, lsb)
}

#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = pitchbendFromFloat)]
pub fn pitchbend_from_float(value: f64) -> Vec<u8> {
    let (msb, lsb) = crate::types::pitchbend_float_to_midi(value);
    vec![msb, lsb]
}

/// `header`: `{ ppq, tempos: [{ ticks, bpm }] }`, `events`: `[{ absoluteTime, value }]`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = pitchbendChangesToJson)]
pub fn pitchbend_changes_to_json(
    header: JsValue,
    events: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    let config: HeaderConfig =
        serde_wasm_bindgen::from_value(header).map_err(|e| to_js_error(e.to_string()))?;
    let events: Vec<PitchbendChangeEvent> =
        serde_wasm_bindgen::from_value(events).map_err(|e| to_js_error(e.to_string()))?;

    let timed = timed_pitchbends(&config, &events).map_err(|e| to_js_error(e.to_string()))?;
    serde_wasm_bindgen::to_value(&timed).map_err(|e| to_js_error(e.to_string()))
}

/// Same as `pitchbendChangesToJson`, but takes and returns JSON text
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = pitchbendChangesToJsonString)]
pub fn pitchbend_changes_to_json_string(
    header: &str,
    events: &str,
) -> std::result::Result<String, JsValue> {
    let config: HeaderConfig =
        serde_json::from_str(header).map_err(|e| to_js_error(e.to_string()))?;
    let events: Vec<PitchbendChangeEvent> =
        serde_json::from_str(events).map_err(|e| to_js_error(e.to_string()))?;

    let timed = timed_pitchbends(&config, &events).map_err(|e| to_js_error(e.to_string()))?;
    serde_json::to_string(&timed).map_err(|e| to_js_error(e.to_string()))
}
