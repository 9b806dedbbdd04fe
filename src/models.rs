// Shared data shapes and upload rules.
// The web proxy and the upload page view both enforce the same constraints,
// so they live here rather than in either module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted upload size. Files over this limit are rejected before
/// any request leaves the browser or the proxy.
pub const MAX_UPLOAD_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Multipart field name the upstream service expects the image under.
pub const UPLOAD_FIELD_NAME: &str = "image";

/// Metadata of a file the user picked or dropped, as the browser reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// What the upstream service did to the image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProcessingDetails {
    pub cropped: bool,
    pub background_removed: bool,
    pub face_detected: bool,
    // Output dimensions as reported by the service, e.g. "512x512".
    pub size: String,
    pub original_size_bytes: u64,
    pub processed_size_bytes: u64,
}

/// Response body of POST /api/process-avatar, produced by the upstream
/// service and relayed verbatim by the proxy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub success: bool,
    pub message: String,
    pub processed_image_url: String,
    pub original_filename: String,
    pub avatar_id: u64,
    pub processing_details: ProcessingDetails,
}

/// Why a selected file was rejected without being uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    TooLarge,
    NotAnImage,
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge => write!(f, "File size must be less than 10MB"),
            Self::NotAnImage => write!(f, "Please select a valid image file"),
        }
    }
}

/// Checks a candidate upload against the size cap and the `image/*` content
/// type requirement. Size is checked first so an oversized non-image reports
/// the size problem.
pub fn validate_upload(
    size_bytes: u64,
    content_type: Option<&str>,
) -> Result<(), UploadRejection> {
    if size_bytes > MAX_UPLOAD_SIZE_BYTES {
        return Err(UploadRejection::TooLarge);
    }

    let is_image = content_type
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.type_() == mime::IMAGE);
    if !is_image {
        return Err(UploadRejection::NotAnImage);
    }

    Ok(())
}

/// Formats a byte count with binary (1024-based) unit scaling, two decimal
/// places at most, trailing zeros trimmed: 0 -> "0 Bytes", 1536 -> "1.5 KB".
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut formatted = format!("{:.2}", value);
    while formatted.ends_with('0') {
        formatted.pop();
    }
    if formatted.ends_with('.') {
        formatted.pop();
    }

    format!("{} {}", formatted, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_format_file_size_exact_units() {
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn test_format_file_size_fractional() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 + 256), "1.25 KB");
    }

    #[test]
    fn test_format_file_size_sub_unit() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
    }

    #[test]
    fn test_format_file_size_caps_at_gb() {
        // No TB unit; very large values stay expressed in GB.
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_validate_upload_accepts_image_at_limit() {
        assert!(validate_upload(MAX_UPLOAD_SIZE_BYTES, Some("image/png")).is_ok());
        assert!(validate_upload(1, Some("image/jpeg")).is_ok());
    }

    #[test]
    fn test_validate_upload_rejects_oversize() {
        assert_eq!(
            validate_upload(MAX_UPLOAD_SIZE_BYTES + 1, Some("image/png")),
            Err(UploadRejection::TooLarge)
        );
    }

    #[test]
    fn test_validate_upload_rejects_non_image() {
        assert_eq!(
            validate_upload(100, Some("text/plain")),
            Err(UploadRejection::NotAnImage)
        );
        assert_eq!(
            validate_upload(100, Some("application/octet-stream")),
            Err(UploadRejection::NotAnImage)
        );
        assert_eq!(validate_upload(100, None), Err(UploadRejection::NotAnImage));
    }

    #[test]
    fn test_validate_upload_size_checked_before_type() {
        // An oversized non-image reports the size problem, matching the page.
        assert_eq!(
            validate_upload(MAX_UPLOAD_SIZE_BYTES + 1, Some("text/plain")),
            Err(UploadRejection::TooLarge)
        );
    }

    #[test]
    fn test_processing_result_matches_upstream_contract() {
        let body = serde_json::json!({
            "success": true,
            "message": "Avatar processed successfully",
            "processed_image_url": "http://backend.example/media/avatars/42.png",
            "original_filename": "me.jpg",
            "avatar_id": 42,
            "processing_details": {
                "cropped": true,
                "background_removed": true,
                "face_detected": true,
                "size": "512x512",
                "original_size_bytes": 183_500,
                "processed_size_bytes": 96_200,
            }
        });

        let result: ProcessingResult = serde_json::from_value(body).unwrap();
        assert!(result.success);
        assert_eq!(result.avatar_id, 42);
        assert_eq!(result.processing_details.size, "512x512");
        assert!(result.processing_details.face_detected);
    }
}
