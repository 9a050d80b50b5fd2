#![forbid(unsafe_code)]

//! Wall-clock access for the browser surface. The engine never reads time
//! itself; every timestamp it stores is produced here.

/// Current wall-clock time as an ISO-8601 string.
pub fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}
