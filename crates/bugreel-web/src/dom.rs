#![forbid(unsafe_code)]

//! DOM construction and presentation updates.
//!
//! The modal markup mirrors the stylesheet's class scheme; interactive
//! elements carry stable ids so they can be looked up after the innerHTML
//! pass. All state changes flow through [`Ui`] methods driven by the
//! engine's commands — nothing here decides behavior.

use bugreel_core::widget::StatusTone;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlStyleElement,
    HtmlTextAreaElement,
};

use crate::styles;

const LABEL_START: &str = "Start Recording";
const LABEL_STOP: &str = "Stop Recording";
const LABEL_SUBMIT: &str = "Submit Report";
const LABEL_SUBMITTING: &str = "Submitting...";

/// Handles to the widget's interactive elements.
pub struct Ui {
    pub overlay: HtmlElement,
    pub border: HtmlElement,
    pub trigger: HtmlButtonElement,
    pub close_btn: HtmlButtonElement,
    pub record_btn: HtmlButtonElement,
    pub submit_btn: HtmlButtonElement,
    pub description: HtmlTextAreaElement,
    pub email: HtmlInputElement,
    pub status: HtmlElement,
}

/// Inject the scoped stylesheet once; a second call is a no-op.
pub fn inject_styles(document: &Document) -> Result<(), JsValue> {
    if document
        .get_element_by_id(styles::STYLE_ELEMENT_ID)
        .is_some()
    {
        return Ok(());
    }
    let style: HtmlStyleElement = document.create_element("style")?.dyn_into()?;
    style.set_id(styles::STYLE_ELEMENT_ID);
    style.set_text_content(Some(styles::WIDGET_CSS));
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no head"))?;
    head.append_child(&style)?;
    Ok(())
}

fn modal_markup() -> String {
    format!(
        r#"<div class="bugreel-modal-content">
    <div class="bugreel-modal-header">
        <h2>Report a Bug</h2>
        <p>Describe what went wrong and share a quick screen recording to help us fix it faster.</p>
        <button class="bugreel-modal-close" id="{close_id}" aria-label="Close">&#10005;</button>
    </div>
    <div class="bugreel-form-group">
        <label for="{desc_id}">Describe the issue<span style="color: var(--bugreel-destructive);">*</span></label>
        <textarea id="{desc_id}" class="bugreel-textarea" placeholder="Write your bug report here..."></textarea>
    </div>
    <div class="bugreel-form-group">
        <label for="{email_id}">Email <span style="color: var(--bugreel-muted); font-weight: 400; font-size: 11px;">(optional, for follow-up questions)</span></label>
        <input type="email" id="{email_id}" class="bugreel-input" placeholder="you@example.com">
    </div>
    <p id="{status_id}" class="bugreel-status bugreel-status--neutral"></p>
    <div class="bugreel-modal-footer">
        <button id="{record_id}" class="bugreel-base-button bugreel-record-button" disabled>{start}</button>
        <button id="{submit_id}" class="bugreel-base-button bugreel-submit-button disabled" disabled>{submit}</button>
    </div>
</div>"#,
        close_id = styles::ID_CLOSE_BTN,
        desc_id = styles::ID_DESCRIPTION,
        email_id = styles::ID_EMAIL,
        status_id = styles::ID_STATUS,
        record_id = styles::ID_RECORD_BTN,
        submit_id = styles::ID_SUBMIT_BTN,
        start = LABEL_START,
        submit = LABEL_SUBMIT,
    )
}

fn lookup<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("widget element #{id} missing")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("widget element #{id} has unexpected type")))
}

/// Build the trigger button, recording border, and modal, and append them
/// to the document body.
pub fn build_ui(document: &Document) -> Result<Ui, JsValue> {
    let container: Element = document.create_element("div")?;
    container.set_class_name(styles::CLASS_CONTAINER);

    let border: HtmlElement = document.create_element("div")?.dyn_into()?;
    border.set_class_name("bugreel-recording-border");

    let trigger: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
    trigger.set_class_name(styles::CLASS_TRIGGER);
    trigger.set_text_content(Some("Report a Bug"));

    let overlay: HtmlElement = document.create_element("div")?.dyn_into()?;
    overlay.set_class_name(styles::CLASS_OVERLAY);
    overlay.set_inner_html(&modal_markup());

    container.append_child(&border)?;
    container.append_child(&trigger)?;
    container.append_child(&overlay)?;

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&container)?;

    Ok(Ui {
        overlay,
        border,
        trigger,
        close_btn: lookup(document, styles::ID_CLOSE_BTN)?,
        record_btn: lookup(document, styles::ID_RECORD_BTN)?,
        submit_btn: lookup(document, styles::ID_SUBMIT_BTN)?,
        description: lookup(document, styles::ID_DESCRIPTION)?,
        email: lookup(document, styles::ID_EMAIL)?,
        status: lookup(document, styles::ID_STATUS)?,
    })
}

impl Ui {
    pub fn set_modal_visible(&self, visible: bool) {
        toggle_class(&self.overlay, styles::CLASS_VISIBLE, visible);
    }

    pub fn set_recording_border(&self, visible: bool) {
        toggle_class(&self.border, styles::CLASS_VISIBLE, visible);
    }

    pub fn set_status(&self, text: &str, tone: StatusTone) {
        self.status.set_text_content(Some(text));
        let class = match tone {
            StatusTone::Neutral => styles::CLASS_STATUS_NEUTRAL,
            StatusTone::Success => styles::CLASS_STATUS_SUCCESS,
            StatusTone::Error => styles::CLASS_STATUS_ERROR,
        };
        self.status
            .set_class_name(&format!("bugreel-status {class}"));
    }

    pub fn set_submit_enabled(&self, enabled: bool) {
        self.submit_btn.set_disabled(!enabled);
        toggle_class(&self.submit_btn, styles::CLASS_DISABLED, !enabled);
    }

    pub fn set_submit_busy(&self, busy: bool) {
        self.submit_btn.set_text_content(Some(if busy {
            LABEL_SUBMITTING
        } else {
            LABEL_SUBMIT
        }));
    }

    pub fn set_record_control(&self, enabled: bool, recording: bool) {
        self.record_btn.set_disabled(!enabled);
        toggle_class(&self.record_btn, styles::CLASS_RECORDING, recording);
        self.record_btn.set_text_content(Some(if recording {
            LABEL_STOP
        } else {
            LABEL_START
        }));
    }

    pub fn clear_form(&self) {
        self.description.set_value("");
        self.email.set_value("");
        self.set_submit_busy(false);
    }
}

fn toggle_class(element: &HtmlElement, class: &str, on: bool) {
    let list = element.class_list();
    let result = if on {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
    if let Err(err) = result {
        tracing::warn!(?err, class, "class toggle failed");
    }
}
