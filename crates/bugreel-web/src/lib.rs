#![forbid(unsafe_code)]

//! `bugreel-web` is the browser surface of the BugReel bug-report widget.
//!
//! The crate compiles to `wasm32-unknown-unknown` and self-initializes when
//! the emitted module is loaded on a host page:
//!
//! ```html
//! <script type="module">
//!   import init from "./bugreel_web.js";
//!   init();
//! </script>
//! ```
//!
//! An optional `window.BUGREEL_CONFIG` object (or JSON string) overrides the
//! defaults; see `bugreel_core::WidgetConfig` for the fields.
//!
//! Everything with observable semantics lives in `bugreel-core`; this crate
//! only executes the engine's commands against the DOM and feeds browser
//! events back in. The modules below are compiled for wasm32 only — the
//! pure parts (stylesheet text, class-name registry, the API surface
//! constants) build and test on the native target.

/// Version tag of the JS-facing surface.
pub const BUGREEL_JS_API_VERSION: &str = "bugreel-js-v1";

/// Names the host can rely on finding on the loaded module.
pub const BUGREEL_JS_PUBLIC_METHODS: [&str; 2] = ["apiVersion", "apiSurface"];

pub mod styles;

#[cfg(target_arch = "wasm32")]
mod clock;
#[cfg(target_arch = "wasm32")]
mod console_hook;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod observer;
#[cfg(target_arch = "wasm32")]
mod recorder;
#[cfg(target_arch = "wasm32")]
mod submit;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{api_surface, api_version};
