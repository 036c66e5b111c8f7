//! WebAssembly FFI bindings for the Crux Core
//!
//! Web shells drive the core through these functions; native mobile shells
//! link the same bridge through the generated foreign types.

use lazy_static::lazy_static;
use wasm_bindgen::{prelude::wasm_bindgen, JsError};

use crux_core::{
    bridge::{Bridge, EffectId},
    Core,
};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

/// Set up console logging when the module loads
#[wasm_bindgen(start)]
pub fn init_wasm() {
    // A second init only happens on hot reload; the first logger stays active.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Process a serialized `Event`, returning the serialized effect requests
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let mut effects = Vec::new();
    CORE.update(event_bytes, &mut effects)
        .map_err(|e| JsError::new(&format!("failed to process event: {e}")))?;
    Ok(effects)
}

/// Serialized `ViewModel` for the current state
#[wasm_bindgen]
pub fn view() -> Result<Vec<u8>, JsError> {
    let mut view = Vec::new();
    CORE.view(&mut view)
        .map_err(|e| JsError::new(&format!("failed to serialize view model: {e}")))?;
    Ok(view)
}

/// Resolve effect `id` with a serialized `RtdbOutput`.
///
/// Subscriptions are resolved once per delivered value with the same id.
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let mut effects = Vec::new();
    CORE.resolve(EffectId(id), response_bytes, &mut effects)
        .map_err(|e| JsError::new(&format!("failed to resolve effect {id}: {e}")))?;
    Ok(effects)
}
