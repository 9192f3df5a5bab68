use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, HtmlInputElement};

use crate::api::FilePart;
use crate::error::ApiError;
use crate::logging::warn_on_err;

/// Blocking alert for screens without an error slot.
pub fn alert(msg: &str) {
    if let Some(win) = window() {
        warn_on_err(win.alert_with_message(msg), "could not show alert");
    }
}

/// Render an API timestamp in the viewer's locale.
pub fn local_time(iso: &str) -> String {
    let date = js_sys::Date::new(&JsValue::from_str(iso));
    if date.get_time().is_nan() {
        return iso.to_string();
    }
    date.to_locale_string("default", &JsValue::UNDEFINED).into()
}

/// First file picked in a file input, read into memory.
pub async fn selected_file(input: &HtmlInputElement) -> Result<Option<FilePart>, ApiError> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ApiError::Browser(format!("could not read {}: {:?}", file.name(), e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let content_type = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };

    Ok(Some(FilePart {
        filename: file.name(),
        content_type,
        bytes,
    }))
}
