//! WebAssembly bindings for TubeFilter
//!
//! The page script owns interception (fetch/XHR hooks, global data slot
//! traps) and navigation; this module owns the engine. Payloads cross the
//! boundary as JSON text, effects come back as a plain result object with
//! `payload`, `redirect` and `censorTitle` fields.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use tf_core::{Engine, FilterOutcome, PageContext};

thread_local! {
    // Engine holds a JS interpreter context and is single-threaded;
    // wasm runs on the page's one thread.
    static ENGINE: RefCell<Option<Engine>> = RefCell::new(None);
}

/// Forwards engine log records to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let msg = JsValue::from_str(&format!("[tubefilter] {}", record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

fn outcome_object(outcome: &FilterOutcome, payload: Option<String>) -> JsValue {
    let result = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &result,
        &"redirect".into(),
        &match &outcome.redirect {
            Some(target) => JsValue::from_str(target),
            None => JsValue::NULL,
        },
    );
    let _ = js_sys::Reflect::set(
        &result,
        &"censorTitle".into(),
        &JsValue::from(outcome.censor_title),
    );
    if let Some(payload) = payload {
        let _ = js_sys::Reflect::set(&result, &"payload".into(), &JsValue::from_str(&payload));
    }
    result.into()
}

/// Create the engine for the current page. Safe to call again on
/// navigation; the settings snapshot is kept.
#[wasm_bindgen]
pub fn init(pathname: &str, search: &str, is_mobile: bool) {
    // Errs when already set; only the first call installs it.
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Warn));

    let page = PageContext::new(pathname, search, is_mobile);
    ENGINE.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            Some(engine) => engine.set_page(page),
            None => *slot = Some(Engine::new(page)),
        }
    });
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    ENGINE.with(|cell| cell.borrow().is_some())
}

/// Install a new settings blob. Returns a result object whose `redirect`
/// field, when set, asks the page script to navigate away immediately.
#[wasm_bindgen]
pub fn update_settings(blob: &str) -> Result<JsValue, JsValue> {
    ENGINE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let engine = slot
            .as_mut()
            .ok_or_else(|| JsValue::from_str("init() must be called first"))?;
        let outcome = engine
            .update_settings_json(blob)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse settings: {e}")))?;
        Ok(outcome_object(&outcome, None))
    })
}

/// Filter one payload. `routing_key` is the endpoint pathname or global
/// slot name the page script intercepted. The result object carries the
/// filtered payload as JSON text plus any navigation/UI effects.
#[wasm_bindgen]
pub fn filter_payload(routing_key: &str, payload_json: &str) -> Result<JsValue, JsValue> {
    ENGINE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let engine = slot
            .as_mut()
            .ok_or_else(|| JsValue::from_str("init() must be called first"))?;

        let mut payload: serde_json::Value = serde_json::from_str(payload_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse payload: {e}")))?;

        let outcome = engine.filter_payload(routing_key, &mut payload);
        Ok(outcome_object(&outcome, Some(payload.to_string())))
    })
}

/// Whether a whole-page block is pending resolution.
#[wasm_bindgen]
pub fn current_block() -> bool {
    ENGINE.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(Engine::current_block)
            .unwrap_or(false)
    })
}
