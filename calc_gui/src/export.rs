//! PDF export targets.
//!
//! Native builds ask for a path with the system save dialog; the browser
//! build hands the bytes to the user as a download.

/// Ask where to save `bytes` and write them.
///
/// Returns the written path, or `None` if the dialog was cancelled.
#[cfg(not(target_arch = "wasm32"))]
pub async fn save_pdf(bytes: Vec<u8>, suggested_name: String) -> Result<Option<String>, String> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .add_filter("PDF", &["pdf"])
        .set_file_name(&suggested_name)
        .save_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().display().to_string();
    handle
        .write(&bytes)
        .await
        .map_err(|e| format!("Failed to write {}: {}", path, e))?;
    Ok(Some(path))
}

/// Offer `bytes` as a browser download
#[cfg(target_arch = "wasm32")]
pub fn download_pdf(bytes: &[u8], file_name: &str) -> Result<(), String> {
    use wasm_bindgen::JsCast;

    let js_err = |e: wasm_bindgen::JsValue| format!("{:?}", e);

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let anchor = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "Not an anchor element".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&url).map_err(js_err)?;
    Ok(())
}

/// File name suggested for a report, e.g. `cable-sizing-kitchen.pdf`
pub fn suggested_file_name(kind: &str, label: &str) -> String {
    let slug: String = label
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("{}.pdf", kind)
    } else {
        format!("{}-{}.pdf", kind, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_file_name() {
        assert_eq!(suggested_file_name("shading", ""), "shading.pdf");
        assert_eq!(
            suggested_file_name("cable-sizing", " Kitchen  Sockets "),
            "cable-sizing-kitchen-sockets.pdf"
        );
        assert_eq!(
            suggested_file_name("circuits", "MB → Inverter 1"),
            "circuits-mb-inverter-1.pdf"
        );
    }
}
