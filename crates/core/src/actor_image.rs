//! Actor portrait upload rules and HTTP caching helpers.

use crate::error::CoreError;
use crate::hashing::sha256_hex;

/// Largest accepted upload, in bytes (500 KiB).
pub const MAX_IMAGE_BYTES: usize = 500 * 1024;

/// Accepted image content types.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Entity tag served with the placeholder image.
pub const PLACEHOLDER_ETAG: &str = "\"no-image-v1\"";

/// `Content-Type` of the placeholder image.
pub const PLACEHOLDER_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

/// 200x200 placeholder served for actors without a portrait.
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200" role="img" aria-label="No Image">
  <rect width="200" height="200" fill="#3b3b3b"/>
  <text x="100" y="108" text-anchor="middle" font-family="system-ui, -apple-system, Segoe UI, Roboto, Arial" font-size="20" fill="#FFFFFF">
    No Image
  </text>
</svg>
"##;

/// An uploaded portrait that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
    pub sha256: String,
}

impl ValidatedImage {
    /// Validate an upload. Empty uploads yield `Ok(None)` (nothing was sent).
    pub fn from_upload(
        data: Vec<u8>,
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Option<Self>, CoreError> {
        if data.is_empty() {
            return Ok(None);
        }

        if data.len() > MAX_IMAGE_BYTES {
            return Err(CoreError::Validation(format!(
                "Image is too large (max {} KB)",
                MAX_IMAGE_BYTES / 1024
            )));
        }

        let content_type = content_type
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unsupported image type '{content_type}'. Allowed: {}",
                ALLOWED_CONTENT_TYPES.join(", ")
            )));
        }

        let sha256 = sha256_hex(&data);
        Ok(Some(Self {
            data,
            content_type,
            file_name: file_name
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
            sha256,
        }))
    }
}

/// Entity tag for a stored image: the quoted digest, or the quoted length
/// when no digest was recorded.
pub fn image_etag(sha256: Option<&str>, len: usize) -> String {
    match sha256.map(str::trim).filter(|s| !s.is_empty()) {
        Some(sha) => format!("\"{sha}\""),
        None => format!("\"{len}\""),
    }
}
