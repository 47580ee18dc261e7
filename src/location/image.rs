//! Photo attachments as data URIs

use crate::{FieldError, NarratorError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

const IMAGE_PREFIX: &str = "data:image/";

/// Check that a string is a `data:image/...` URI
pub fn is_image_data_uri(value: &str) -> bool {
    value.starts_with(IMAGE_PREFIX)
}

/// Guess the image MIME type from a file extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// Encode raw image bytes as a base64 data URI
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URI into its MIME type and decoded bytes
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}

/// Read an image file from disk into a data URI
pub fn data_uri_from_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mime = mime_for_path(path).ok_or_else(|| {
        NarratorError::InvalidInput(vec![FieldError::new(
            "imageDataUri",
            format!("unsupported image type: {}", path.display()),
        )])
    })?;
    let bytes = std::fs::read(path)?;
    Ok(encode_data_uri(mime, &bytes))
}
