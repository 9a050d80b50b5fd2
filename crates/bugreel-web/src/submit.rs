#![forbid(unsafe_code)]

//! Multipart submission to the ingestion endpoint.
//!
//! One POST per submission; no custom headers — the form encoding sets the
//! content type and boundary. Every failure (non-success status, transport
//! exception, form assembly error) collapses into [`SubmitOutcome::Failed`]
//! for the engine to resolve against its success-reporting policy.

use bugreel_core::SubmitOutcome;
use bugreel_core::submission::{
    FIELD_CONSOLE_LOGS, FIELD_DESCRIPTION, FIELD_EMAIL, FIELD_METADATA, FIELD_VIDEO, ReportBody,
    VIDEO_FILENAME,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FormData, RequestInit, Response};

fn describe(err: &JsValue) -> String {
    err.as_string()
        .unwrap_or_else(|| format!("{err:?}"))
}

/// POST the report to `ingest_url`. Never throws; all failure modes are
/// folded into the returned outcome.
pub async fn post_report(ingest_url: &str, body: &ReportBody, video: &Blob) -> SubmitOutcome {
    match try_post(ingest_url, body, video).await {
        Ok(outcome) => outcome,
        Err(err) => SubmitOutcome::Failed {
            reason: describe(&err),
        },
    }
}

async fn try_post(
    ingest_url: &str,
    body: &ReportBody,
    video: &Blob,
) -> Result<SubmitOutcome, JsValue> {
    let form = FormData::new()?;
    form.append_with_str(FIELD_DESCRIPTION, &body.description)?;
    if let Some(email) = &body.email {
        form.append_with_str(FIELD_EMAIL, email)?;
    }
    form.append_with_blob_and_filename(FIELD_VIDEO, video, VIDEO_FILENAME)?;
    form.append_with_str(FIELD_CONSOLE_LOGS, &body.console_logs_json)?;
    form.append_with_str(FIELD_METADATA, &body.metadata_json)?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(form.as_ref());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str_and_init(ingest_url, &init))
        .await?
        .dyn_into()?;

    if response.ok() {
        Ok(SubmitOutcome::Delivered)
    } else {
        Ok(SubmitOutcome::Failed {
            reason: format!("server responded with status {}", response.status()),
        })
    }
}
