#![forbid(unsafe_code)]

//! Widget runtime: wires DOM events into the engine and executes the
//! engine's commands.
//!
//! The module self-initializes when the wasm module loads (deferred to
//! `DOMContentLoaded` while the document is still loading). From then on
//! everything is a loop of `dispatch`: feed one `WidgetEvent` into the
//! model under a short borrow, then execute the returned commands with the
//! borrow released, so async continuations (permission prompt, encoder
//! finalize, fetch) can re-enter safely.

use std::cell::RefCell;
use std::rc::Rc;

use bugreel_core::submission::{PageContext, build_report_body};
use bugreel_core::widget::{WidgetCmd, WidgetEvent};
use bugreel_core::{ConsoleBuffer, NetworkBuffer, SubmitOutcome, WidgetConfig, WidgetModel};
use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Blob, Document, DocumentReadyState, Window};

use crate::clock::now_iso;
use crate::dom::{self, Ui};
use crate::recorder::{self, CaptureSession};
use crate::{console_hook, observer, submit};

/// JS-facing: the API surface version tag.
#[wasm_bindgen(js_name = apiVersion)]
pub fn api_version() -> String {
    crate::BUGREEL_JS_API_VERSION.to_owned()
}

/// JS-facing: the exported method names.
#[wasm_bindgen(js_name = apiSurface)]
pub fn api_surface() -> Array {
    crate::BUGREEL_JS_PUBLIC_METHODS
        .iter()
        .map(|name| JsValue::from_str(name))
        .collect()
}

struct Inner {
    model: WidgetModel,
    ui: Ui,
    console: Rc<RefCell<ConsoleBuffer>>,
    network: Rc<RefCell<NetworkBuffer>>,
    session: Option<CaptureSession>,
    artifact: Option<Blob>,
}

type Shared = Rc<RefCell<Inner>>;

#[wasm_bindgen(start)]
pub fn start() {
    if let Err(err) = boot() {
        web_sys::console::error_2(&JsValue::from_str("BugReel failed to initialize:"), &err);
    }
}

fn boot() -> Result<(), JsValue> {
    let document = document()?;
    if document.ready_state() == DocumentReadyState::Loading {
        let on_ready = Closure::<dyn FnMut()>::new(|| {
            if let Err(err) = init_widget() {
                web_sys::console::error_2(
                    &JsValue::from_str("BugReel failed to initialize:"),
                    &err,
                );
            }
        });
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        )?;
        on_ready.forget();
        Ok(())
    } else {
        init_widget()
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn init_widget() -> Result<(), JsValue> {
    let window = window()?;
    let document = document()?;
    let config = read_config(&window);
    tracing::debug!(ingest_url = %config.ingest_url, "initializing widget");

    dom::inject_styles(&document)?;
    let ui = dom::build_ui(&document)?;

    // Both capture feeds start buffering immediately and run for the
    // page's entire lifetime.
    let console = Rc::new(RefCell::new(ConsoleBuffer::new(config.console_capacity)));
    let network = Rc::new(RefCell::new(NetworkBuffer::new(config.network_capacity)));
    console_hook::install(Rc::clone(&console))?;
    observer::install(Rc::clone(&network))?;

    let model = WidgetModel::new(config);
    let init_cmds = model.init_cmds();
    let mime = model.config().video_mime_type.clone();

    let inner: Shared = Rc::new(RefCell::new(Inner {
        model,
        ui,
        console,
        network,
        session: None,
        artifact: None,
    }));

    for cmd in init_cmds {
        execute(&inner, cmd);
    }
    wire_ui_events(&inner)?;
    probe_encoder(&inner, mime);
    Ok(())
}

fn read_config(window: &Window) -> WidgetConfig {
    let raw = Reflect::get(window.as_ref(), &JsValue::from_str("BUGREEL_CONFIG"))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null());
    let Some(raw) = raw else {
        return WidgetConfig::default();
    };
    let json = raw.as_string().or_else(|| {
        js_sys::JSON::stringify(&raw)
            .ok()
            .map(String::from)
    });
    match json.as_deref().map(WidgetConfig::from_json) {
        Some(Ok(config)) => config,
        _ => {
            tracing::warn!("BUGREEL_CONFIG rejected; falling back to defaults");
            WidgetConfig::default()
        }
    }
}

/// Probe the encoder capability off the init path so the ready event
/// always lands after the initial UI state is applied.
fn probe_encoder(inner: &Shared, mime: String) {
    let inner = Rc::clone(inner);
    spawn_local(async move {
        if recorder::encoder_supported(&mime) {
            dispatch(&inner, WidgetEvent::EncoderReady);
        } else {
            tracing::warn!(%mime, "platform encoder unavailable");
            web_sys::console::warn_1(&JsValue::from_str(
                "BugReel: screen recording is unavailable in this browser.",
            ));
            dispatch(&inner, WidgetEvent::EncoderFailed);
        }
    });
}

fn wire_ui_events(inner: &Shared) -> Result<(), JsValue> {
    let ui_targets = {
        let inner_ref = inner.borrow();
        (
            inner_ref.ui.trigger.clone(),
            inner_ref.ui.close_btn.clone(),
            inner_ref.ui.record_btn.clone(),
            inner_ref.ui.submit_btn.clone(),
            inner_ref.ui.description.clone(),
            inner_ref.ui.email.clone(),
        )
    };
    let (trigger, close_btn, record_btn, submit_btn, description, email) = ui_targets;

    on_click(inner, &trigger, || WidgetEvent::TriggerClicked)?;
    on_click(inner, &close_btn, || WidgetEvent::CloseClicked)?;
    on_click(inner, &record_btn, || WidgetEvent::RecordClicked)?;
    on_click(inner, &submit_btn, || WidgetEvent::SubmitClicked)?;

    {
        let inner = Rc::clone(inner);
        let field = description.clone();
        let on_input = Closure::<dyn FnMut()>::new(move || {
            dispatch(&inner, WidgetEvent::DescriptionChanged(field.value()));
        });
        description
            .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
    }
    {
        let inner = Rc::clone(inner);
        let field = email.clone();
        let on_input = Closure::<dyn FnMut()>::new(move || {
            dispatch(&inner, WidgetEvent::EmailChanged(field.value()));
        });
        email.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
    }
    Ok(())
}

fn on_click(
    inner: &Shared,
    target: &web_sys::HtmlButtonElement,
    event: impl Fn() -> WidgetEvent + 'static,
) -> Result<(), JsValue> {
    let inner = Rc::clone(inner);
    let on_click = Closure::<dyn FnMut()>::new(move || dispatch(&inner, event()));
    target.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

/// Feed one event into the model, then execute the resulting commands.
fn dispatch(inner: &Shared, event: WidgetEvent) {
    let cmds = inner.borrow_mut().model.update(event);
    for cmd in cmds {
        execute(inner, cmd);
    }
}

fn execute(inner: &Shared, cmd: WidgetCmd) {
    match cmd {
        WidgetCmd::RequestCapture => request_capture(inner),
        WidgetCmd::BeginEncoding => {
            let inner_ref = inner.borrow();
            if let Some(session) = &inner_ref.session {
                if let Err(err) = session.begin() {
                    tracing::warn!(?err, "encoder start failed");
                }
            }
        }
        WidgetCmd::FinalizeRecording => finalize_recording(inner),
        WidgetCmd::ReleaseCapture => {
            if let Some(session) = inner.borrow_mut().session.take() {
                session.release();
            }
        }
        WidgetCmd::SubmitReport => submit_report(inner),
        WidgetCmd::SetModalVisible(visible) => inner.borrow().ui.set_modal_visible(visible),
        WidgetCmd::SetRecordingBorder(visible) => {
            inner.borrow().ui.set_recording_border(visible);
        }
        WidgetCmd::SetStatus { text, tone } => inner.borrow().ui.set_status(&text, tone),
        WidgetCmd::SetSubmitEnabled(enabled) => inner.borrow().ui.set_submit_enabled(enabled),
        WidgetCmd::SetSubmitBusy(busy) => inner.borrow().ui.set_submit_busy(busy),
        WidgetCmd::SetRecordControl { enabled, recording } => {
            inner.borrow().ui.set_record_control(enabled, recording);
        }
        WidgetCmd::ClearForm => {
            let mut inner_mut = inner.borrow_mut();
            inner_mut.artifact = None;
            inner_mut.ui.clear_form();
        }
        WidgetCmd::ScheduleClose { delay_ms } => schedule_close(inner, delay_ms),
    }
}

fn request_capture(inner: &Shared) {
    let mime = inner.borrow().model.config().video_mime_type.clone();
    let inner = Rc::clone(inner);
    spawn_local(async move {
        match recorder::acquire(&mime).await {
            Ok(session) => {
                inner.borrow_mut().session = Some(session);
                dispatch(&inner, WidgetEvent::CaptureAcquired);
            }
            Err(err) => {
                tracing::debug!(?err, "screen capture not acquired");
                dispatch(&inner, WidgetEvent::CaptureFailed);
            }
        }
    });
}

fn finalize_recording(inner: &Shared) {
    let callback_inner = Rc::clone(inner);
    let inner_ref = inner.borrow();
    let Some(session) = &inner_ref.session else {
        return;
    };
    let result = session.finalize(move |blob| {
        let bytes = blob.size() as u64;
        callback_inner.borrow_mut().artifact = Some(blob);
        dispatch(&callback_inner, WidgetEvent::RecordingFinalized { bytes });
    });
    if let Err(err) = result {
        tracing::warn!(?err, "encoder stop failed");
    }
}

fn submit_report(inner: &Shared) {
    let prepared = {
        let inner_ref = inner.borrow();
        let video = inner_ref.artifact.clone();
        let body = build_report_body(
            inner_ref.model.draft(),
            &inner_ref.console.borrow().snapshot(),
            &inner_ref.network.borrow().snapshot(),
            &page_context(),
            &now_iso(),
        );
        (inner_ref.model.config().ingest_url.clone(), body, video)
    };
    let (url, body, video) = prepared;

    let inner = Rc::clone(inner);
    spawn_local(async move {
        let outcome = match (body, video) {
            (Ok(body), Some(video)) => submit::post_report(&url, &body, &video).await,
            (Err(err), _) => SubmitOutcome::Failed {
                reason: err.to_string(),
            },
            (_, None) => SubmitOutcome::Failed {
                reason: "recorded artifact is missing".to_owned(),
            },
        };
        if let SubmitOutcome::Failed { reason } = &outcome {
            tracing::warn!(%reason, "report submission failed");
        }
        dispatch(&inner, WidgetEvent::SubmitFinished(outcome));
    });
}

fn schedule_close(inner: &Shared, delay_ms: u32) {
    let Ok(window) = window() else {
        return;
    };
    let inner = Rc::clone(inner);
    let on_elapsed = Closure::<dyn FnMut()>::new(move || {
        dispatch(&inner, WidgetEvent::CloseDelayElapsed);
    });
    let scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        on_elapsed.as_ref().unchecked_ref(),
        delay_ms as i32,
    );
    if let Err(err) = scheduled {
        tracing::warn!(?err, "close timer rejected");
    }
    on_elapsed.forget();
}

fn page_context() -> PageContext {
    let (url, user_agent, screen_resolution) = match window() {
        Ok(window) => {
            let url = window.location().href().unwrap_or_default();
            let user_agent = window.navigator().user_agent().unwrap_or_default();
            let screen_resolution = window
                .screen()
                .ok()
                .and_then(|screen| {
                    let width = screen.width().ok()?;
                    let height = screen.height().ok()?;
                    Some(format!("{width}x{height}"))
                })
                .unwrap_or_default();
            (url, user_agent, screen_resolution)
        }
        Err(_) => Default::default(),
    };
    PageContext {
        url,
        user_agent,
        screen_resolution,
    }
}
