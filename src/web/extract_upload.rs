// Pulls the uploaded image out of the inbound multipart request and applies
// the same constraints the page enforces client-side, so an invalid upload
// never reaches the upstream service.

use super::error::ApiError;
use crate::models::{UPLOAD_FIELD_NAME, validate_upload};
use axum::extract::{FromRequest, Multipart, Request};
use tracing::{debug, warn};

/// The image to forward: raw bytes plus the filename and content type the
/// browser attached to the multipart field.
#[derive(Debug)]
pub struct UploadPayload {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

pub async fn extract_upload(request: Request) -> Result<UploadPayload, ApiError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart request: {}", e)))?;

    let mut payload: Option<UploadPayload> = None;

    // Walk all fields, keep the image, ignore the rest.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to process multipart field: {}", e)))?
    {
        if field.name() == Some(UPLOAD_FIELD_NAME) {
            if payload.is_some() {
                warn!(
                    "Multiple '{}' fields found in multipart request, using the last one",
                    UPLOAD_FIELD_NAME
                );
            }

            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            debug!(
                "Received upload field: file_name={:?}, content_type={:?}",
                file_name, content_type
            );

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read image data: {}", e)))?
                .to_vec();

            if data.is_empty() {
                return Err(ApiError::BadRequest(format!(
                    "Uploaded '{}' field is empty.",
                    UPLOAD_FIELD_NAME
                )));
            }

            payload = Some(UploadPayload {
                data,
                file_name,
                content_type,
            });
        } else {
            debug!(
                "Ignoring multipart field: {}",
                field.name().unwrap_or("unnamed")
            );
        }
    }

    let payload = payload.ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Missing '{}' field in multipart request.",
            UPLOAD_FIELD_NAME
        ))
    })?;

    validate_upload(payload.data.len() as u64, payload.content_type.as_deref())?;

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};

    fn multipart_request(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Request {
        let boundary = "----avatar-web-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/process-avatar")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_extracts_image_field() {
        let request = multipart_request("image", "me.png", "image/png", b"fake png bytes");

        let payload = extract_upload(request).await.unwrap();
        assert_eq!(payload.data, b"fake png bytes");
        assert_eq!(payload.file_name.as_deref(), Some("me.png"));
        assert_eq!(payload.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_missing_image_field_is_bad_request() {
        let request = multipart_request("attachment", "me.png", "image/png", b"bytes");

        match extract_upload(request).await {
            Err(ApiError::BadRequest(msg)) => assert!(msg.contains("Missing 'image' field")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_image_field_is_bad_request() {
        let request = multipart_request("image", "me.png", "image/png", b"");

        match extract_upload(request).await {
            Err(ApiError::BadRequest(msg)) => assert!(msg.contains("empty")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oversize_image_rejected() {
        use crate::models::MAX_UPLOAD_SIZE_BYTES;
        use crate::web::MAX_REQUEST_BODY_BYTES;
        use axum::extract::DefaultBodyLimit;
        use std::convert::Infallible;
        use tower::{Layer, ServiceExt, service_fn};

        let data = vec![0u8; (MAX_UPLOAD_SIZE_BYTES + 1) as usize];
        let request = multipart_request("image", "huge.png", "image/png", &data);

        // Dispatch through the same body-limit layer the app installs, so the
        // oversize body reaches validate_upload instead of tripping axum's
        // built-in 2 MB default during multipart parsing.
        let service = DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES).layer(service_fn(
            |req: Request| async move { Ok::<_, Infallible>(extract_upload(req).await) },
        ));

        match service.oneshot(request).await.unwrap() {
            Err(ApiError::PayloadTooLarge(msg)) => {
                assert_eq!(msg, "File size must be less than 10MB");
            }
            other => panic!("expected PayloadTooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_image_content_type_rejected() {
        let request = multipart_request("image", "notes.txt", "text/plain", b"hello");

        match extract_upload(request).await {
            Err(ApiError::UnsupportedMediaType(msg)) => {
                assert_eq!(msg, "Please select a valid image file");
            }
            other => panic!("expected UnsupportedMediaType, got {:?}", other),
        }
    }
}
