//! Image encoding helpers.

use std::borrow::Cow;

/// A 1x1 transparent PNG, used as the image of code deliverables.
pub const PLACEHOLDER_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Returns `image` as something a multimodal model can fetch.
///
/// Data URIs pass through; anything else is assumed to be bare base64 PNG
/// data and gets the data URI header.
#[must_use]
pub fn ensure_data_uri(image: &str) -> Cow<'_, str> {
    if image.starts_with("data:") {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(format!("data:image/png;base64,{image}"))
    }
}
