#![forbid(unsafe_code)]

//! Scoped presentation rules, injected once at startup.
//!
//! Every rule is namespaced under `bugreel-` classes and custom properties
//! so the widget cannot collide with host-page styles. The stylesheet is a
//! plain constant; injection happens on the wasm side by appending one
//! `<style>` element to the document head, guarded by the element id so a
//! double init never injects twice.

/// Id of the injected `<style>` element (also the double-injection guard).
pub const STYLE_ELEMENT_ID: &str = "bugreel-style";

/// Container ids the wasm surface looks up after building the modal.
pub const ID_DESCRIPTION: &str = "bugreel-description";
pub const ID_EMAIL: &str = "bugreel-email";
pub const ID_STATUS: &str = "bugreel-status";
pub const ID_RECORD_BTN: &str = "bugreel-record-btn";
pub const ID_SUBMIT_BTN: &str = "bugreel-submit-btn";
pub const ID_CLOSE_BTN: &str = "bugreel-close-btn";

/// Class names shared between the stylesheet and the DOM builder.
pub const CLASS_CONTAINER: &str = "bugreel-container";
pub const CLASS_TRIGGER: &str = "bugreel-button";
pub const CLASS_OVERLAY: &str = "bugreel-modal-overlay";
pub const CLASS_VISIBLE: &str = "visible";
pub const CLASS_RECORDING: &str = "recording";
pub const CLASS_DISABLED: &str = "disabled";
pub const CLASS_STATUS_NEUTRAL: &str = "bugreel-status--neutral";
pub const CLASS_STATUS_SUCCESS: &str = "bugreel-status--success";
pub const CLASS_STATUS_ERROR: &str = "bugreel-status--error";

/// The widget stylesheet.
pub const WIDGET_CSS: &str = r#"
:root {
    --bugreel-primary: #18181b;
    --bugreel-primary-foreground: #fafafa;
    --bugreel-background: #ffffff;
    --bugreel-foreground: #09090b;
    --bugreel-card: #f4f4f5;
    --bugreel-border: #e4e4e7;
    --bugreel-ring: #a1a1aa;
    --bugreel-radius: 0.5rem;
    --bugreel-destructive: #ef4444;
    --bugreel-success: #16a34a;
    --bugreel-muted: #6b7280;
}

.bugreel-container {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto,
        Helvetica, Arial, sans-serif;
    box-sizing: border-box;
}
.bugreel-container *, .bugreel-container *:before, .bugreel-container *:after {
    box-sizing: inherit;
}

.bugreel-button {
    position: fixed;
    bottom: 10px;
    right: 10px;
    background-color: var(--bugreel-primary);
    color: var(--bugreel-primary-foreground);
    padding: 8px 14px;
    border-radius: var(--bugreel-radius);
    border: none;
    cursor: pointer;
    font-size: 14px;
    font-weight: 500;
    box-shadow: 0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1);
    z-index: 99999;
    transition: transform 0.2s ease-in-out;
}
.bugreel-button:hover {
    transform: translateY(-2px);
}

.bugreel-modal-overlay {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    z-index: 100000;
    opacity: 0;
    visibility: hidden;
    pointer-events: none;
    transition: opacity 0.3s ease, visibility 0.3s ease;
}
.bugreel-modal-overlay.visible {
    opacity: 1;
    visibility: visible;
}

.bugreel-modal-content {
    position: fixed;
    bottom: 65px;
    right: 15px;
    background-color: var(--bugreel-background);
    padding: 16px;
    border-radius: var(--bugreel-radius);
    border: 1px solid var(--bugreel-border);
    width: 90%;
    max-width: 340px;
    box-shadow: 0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1);
    pointer-events: auto;
    display: flex;
    flex-direction: column;
    gap: 12px;
}

.bugreel-modal-header h2 {
    font-size: 16px;
    font-weight: 600;
    color: var(--bugreel-foreground);
    margin: 0;
}
.bugreel-modal-header p {
    font-size: 12px;
    color: var(--bugreel-muted);
    margin: 4px 0 0 0;
    line-height: 1.4;
}
.bugreel-modal-close {
    position: absolute;
    top: 8px;
    right: 8px;
    background: none;
    border: none;
    cursor: pointer;
    padding: 4px;
    border-radius: 99px;
    font-size: 14px;
    line-height: 1;
    color: var(--bugreel-foreground);
}
.bugreel-modal-close:hover {
    background-color: var(--bugreel-card);
}

.bugreel-form-group {
    display: flex;
    flex-direction: column;
    gap: 6px;
}
.bugreel-form-group label {
    font-size: 13px;
    font-weight: 500;
    color: var(--bugreel-foreground);
}
.bugreel-textarea, .bugreel-input {
    width: 100%;
    padding: 8px 10px;
    border: 1px solid var(--bugreel-border);
    border-radius: calc(var(--bugreel-radius) - 2px);
    font-size: 13px;
}
.bugreel-textarea {
    min-height: 80px;
    resize: vertical;
    background-color: transparent;
}
.bugreel-textarea:focus, .bugreel-input:focus {
    outline: 2px solid transparent;
    outline-offset: 2px;
    border-color: var(--bugreel-ring);
}

.bugreel-status {
    font-size: 12px;
    text-align: right;
    margin: 0;
    min-height: 1em;
}
.bugreel-status--neutral { color: var(--bugreel-muted); }
.bugreel-status--success { color: var(--bugreel-success); }
.bugreel-status--error   { color: var(--bugreel-destructive); }

.bugreel-modal-footer {
    display: flex;
    flex-direction: column;
    justify-content: flex-end;
    gap: 8px;
}

.bugreel-base-button {
    padding: 8px 14px;
    border-radius: calc(var(--bugreel-radius) - 2px);
    border: none;
    cursor: pointer;
    font-size: 13px;
    font-weight: 500;
    transition: background-color 0.2s ease, border-color 0.2s ease;
    width: fit-content;
}

.bugreel-record-button {
    background-color: var(--bugreel-primary);
    color: var(--bugreel-primary-foreground);
    display: flex;
    align-items: center;
    gap: 6px;
}
.bugreel-record-button:disabled {
    background-color: var(--bugreel-card);
    color: var(--bugreel-ring);
    opacity: 0.8;
    cursor: not-allowed;
}
.bugreel-record-button.recording:before {
    content: "";
    width: 7px;
    height: 7px;
    background-color: #ffffff;
    border-radius: 50%;
    animation: bugreel-pulse 1.5s infinite;
}
.bugreel-record-button:hover:not(:disabled) {
    background-color: #dc2626;
}

.bugreel-submit-button {
    background-color: var(--bugreel-primary);
    color: var(--bugreel-primary-foreground);
}
.bugreel-submit-button:hover:not(:disabled) {
    background-color: #27272a;
}
.bugreel-submit-button.disabled {
    background-color: transparent;
    color: var(--bugreel-ring);
    border: 1px solid var(--bugreel-border);
    cursor: not-allowed;
}

.bugreel-recording-border {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    border: 4px solid var(--bugreel-destructive);
    z-index: 999999;
    pointer-events: none;
    box-sizing: border-box;
    opacity: 0;
    transition: opacity 0.3s ease;
}
.bugreel-recording-border.visible {
    opacity: 1;
}

@keyframes bugreel-pulse {
    0%, 100% { opacity: 1; }
    50% { opacity: 0.5; }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_defines_every_shared_class() {
        for class in [
            CLASS_CONTAINER,
            CLASS_TRIGGER,
            CLASS_OVERLAY,
            CLASS_STATUS_NEUTRAL,
            CLASS_STATUS_SUCCESS,
            CLASS_STATUS_ERROR,
        ] {
            assert!(
                WIDGET_CSS.contains(&format!(".{class}")),
                "missing rule for .{class}"
            );
        }
        // State classes appear as compound selectors.
        assert!(WIDGET_CSS.contains(".bugreel-modal-overlay.visible"));
        assert!(WIDGET_CSS.contains(".bugreel-record-button.recording"));
        assert!(WIDGET_CSS.contains(".bugreel-submit-button.disabled"));
    }

    #[test]
    fn all_rules_are_namespaced() {
        for line in WIDGET_CSS.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with('.') {
                assert!(
                    trimmed.starts_with(".bugreel-"),
                    "unscoped selector: {trimmed}"
                );
            }
        }
    }
}
