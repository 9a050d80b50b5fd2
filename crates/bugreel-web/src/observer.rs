#![forbid(unsafe_code)]

//! Resource-timing observation.
//!
//! Subscribes a `PerformanceObserver` to `resource` entries and mirrors
//! each one into the shared network buffer in arrival order. Where the
//! capability is missing the whole component is a silent no-op.

use std::cell::RefCell;
use std::rc::Rc;

use bugreel_core::{NetworkBuffer, NetworkEntry};
use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    PerformanceObserver, PerformanceObserverEntryList, PerformanceObserverInit,
    PerformanceResourceTiming,
};

use crate::clock::now_iso;

/// Start observing `resource` timing entries into `buffer`. Returns `Ok`
/// even where the capability is unavailable.
pub fn install(buffer: Rc<RefCell<NetworkBuffer>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let supported = Reflect::has(window.as_ref(), &JsValue::from_str("PerformanceObserver"))
        .unwrap_or(false);
    if !supported {
        tracing::debug!("PerformanceObserver unavailable; network capture disabled");
        return Ok(());
    }

    let callback = Closure::<dyn FnMut(PerformanceObserverEntryList, PerformanceObserver)>::new(
        move |list: PerformanceObserverEntryList, _observer: PerformanceObserver| {
            let mut buffer = buffer.borrow_mut();
            for entry in list.get_entries().iter() {
                let Ok(timing) = entry.dyn_into::<PerformanceResourceTiming>() else {
                    continue;
                };
                buffer.push(NetworkEntry {
                    name: timing.name(),
                    initiator_type: timing.initiator_type(),
                    duration: timing.duration(),
                    timestamp: now_iso(),
                });
            }
        },
    );

    let observer = PerformanceObserver::new(callback.as_ref().unchecked_ref())?;
    let options = PerformanceObserverInit::new();
    options.set_entry_types(&Array::of1(&JsValue::from_str("resource")));
    observer.observe(&options);

    // Observation runs for the page's lifetime.
    callback.forget();
    Ok(())
}
