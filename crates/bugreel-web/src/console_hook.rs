#![forbid(unsafe_code)]

//! Console interception for the page lifetime.
//!
//! Each of the five console functions is replaced by a wrapper built from a
//! tiny JS factory: the wrapper coerces the call's arguments to text,
//! hands the joined message to a Rust capture closure, and then forwards
//! the *original* arguments to the saved console function so host-page
//! behavior is unaffected. Coercion and capture are wrapped in `try` so the
//! hook can never throw into the page; a value whose `toString` throws
//! degrades to its default object tag. Installation is one-shot and
//! irreversible for the page's lifetime — there is no restore path.
//!
//! The engine-level decoration (`bugreel_core::CaptureSink`) models this
//! same record-then-forward seam for sinks that take preformatted text;
//! here the forwarding has to happen on the JS side to preserve the
//! original argument objects.

use std::cell::RefCell;
use std::rc::Rc;

use bugreel_core::{ConsoleBuffer, LogEntry, LogLevel};
use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::clock::now_iso;

/// Factory producing the wrapper for one console function. `capture`
/// receives the space-joined text coercion of the call's arguments.
const WRAP_FACTORY: &str = r#"
return function () {
    var parts = [];
    for (var i = 0; i < arguments.length; i++) {
        try { parts.push(String(arguments[i])); }
        catch (e) { parts.push(Object.prototype.toString.call(arguments[i])); }
    }
    try { capture(parts.join(" ")); } catch (e) {}
    return original.apply(this, arguments);
};
"#;

/// Replace the five console functions with recording wrappers that append
/// into `buffer` and forward unchanged.
pub fn install(buffer: Rc<RefCell<ConsoleBuffer>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let console = Reflect::get(window.as_ref(), &JsValue::from_str("console"))?;

    for level in LogLevel::ALL {
        let original = Reflect::get(&console, &JsValue::from_str(level.as_str()))?;
        let Ok(original) = original.dyn_into::<Function>() else {
            // An exotic host without this method; skip it rather than fail.
            continue;
        };

        let sink = Rc::clone(&buffer);
        let capture = Closure::<dyn FnMut(String)>::new(move |message: String| {
            // Interception must never throw; a log fired while the buffer
            // is being read is dropped rather than allowed to panic.
            if let Ok(mut buffer) = sink.try_borrow_mut() {
                buffer.push(LogEntry {
                    level,
                    message,
                    timestamp: now_iso(),
                });
            }
        });

        let factory = Function::new_with_args("capture, original", WRAP_FACTORY);
        let wrapped = factory.call2(
            &JsValue::NULL,
            capture.as_ref().unchecked_ref::<Function>(),
            &original,
        )?;
        Reflect::set(&console, &JsValue::from_str(level.as_str()), &wrapped)?;

        // The wrapper lives for the page's lifetime.
        capture.forget();
    }
    Ok(())
}
