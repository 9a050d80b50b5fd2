#![forbid(unsafe_code)]

//! Screen capture and encoding via the platform `MediaRecorder`.
//!
//! The encoder is an injected capability with an explicit ready state: at
//! init the platform is probed for `video/webm` support and the engine is
//! told `EncoderReady`/`EncoderFailed`; until then the record control
//! stays disabled. One [`CaptureSession`] pairs the display-capture stream
//! with its recorder and exists only between start and stop; releasing it
//! stops every track so the browser's capture indicator disappears.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobEvent, BlobPropertyBag, DisplayMediaStreamConstraints, MediaRecorder,
    MediaRecorderOptions, MediaStream, MediaStreamTrack,
};

/// The stream + encoder pair alive between start and stop.
pub struct CaptureSession {
    stream: MediaStream,
    recorder: MediaRecorder,
    chunks: Rc<RefCell<Vec<Blob>>>,
    mime_type: String,
}

/// True when the platform encoder can produce the requested container.
pub fn encoder_supported(mime_type: &str) -> bool {
    MediaRecorder::is_type_supported(mime_type)
}

/// Prompt for a display-capture stream (with audio) and attach an encoder.
/// Resolves to the session, or the acquisition error (permission denial
/// included).
pub async fn acquire(mime_type: &str) -> Result<CaptureSession, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let media_devices = window.navigator().media_devices()?;

    let constraints = DisplayMediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    constraints.set_audio(&JsValue::TRUE);

    let promise = media_devices.get_display_media_with_constraints(&constraints)?;
    let stream: MediaStream = JsFuture::from(promise).await?.dyn_into()?;

    let options = MediaRecorderOptions::new();
    options.set_mime_type(mime_type);
    let recorder = match MediaRecorder::new_with_media_stream_and_media_recorder_options(
        &stream, &options,
    ) {
        Ok(recorder) => recorder,
        Err(err) => {
            // Encoder refused the stream; drop the capture before failing
            // so the browser indicator does not linger.
            stop_tracks(&stream);
            return Err(err);
        }
    };

    Ok(CaptureSession {
        stream,
        recorder,
        chunks: Rc::new(RefCell::new(Vec::new())),
        mime_type: mime_type.to_owned(),
    })
}

impl CaptureSession {
    /// Begin encoding: buffer every data chunk until finalize.
    pub fn begin(&self) -> Result<(), JsValue> {
        let chunks = Rc::clone(&self.chunks);
        let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |event: BlobEvent| {
            if let Some(chunk) = event.data() {
                chunks.borrow_mut().push(chunk);
            }
        });
        self.recorder
            .set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        on_data.forget();
        self.recorder.start()
    }

    /// Stop the encoder; `on_artifact` receives the assembled blob once the
    /// final chunk has been flushed.
    pub fn finalize(&self, on_artifact: impl FnOnce(Blob) + 'static) -> Result<(), JsValue> {
        let chunks = Rc::clone(&self.chunks);
        let mime_type = self.mime_type.clone();
        let on_artifact = RefCell::new(Some(on_artifact));
        let on_stop = Closure::<dyn FnMut()>::new(move || {
            let parts = Array::new();
            for chunk in chunks.borrow().iter() {
                parts.push(chunk.as_ref());
            }
            let bag = BlobPropertyBag::new();
            bag.set_type(&mime_type);
            match Blob::new_with_blob_sequence_and_options(parts.as_ref(), &bag) {
                Ok(blob) => {
                    if let Some(callback) = on_artifact.borrow_mut().take() {
                        callback(blob);
                    }
                }
                Err(err) => tracing::warn!(?err, "artifact assembly failed"),
            }
        });
        self.recorder
            .set_onstop(Some(on_stop.as_ref().unchecked_ref()));
        on_stop.forget();
        self.recorder.stop()
    }

    /// Stop every track of the captured stream.
    pub fn release(&self) {
        stop_tracks(&self.stream);
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        track.unchecked_into::<MediaStreamTrack>().stop();
    }
}
