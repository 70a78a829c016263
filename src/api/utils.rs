//! Request parsing helpers for `POST /scan`
//!
//! Turns a multipart or urlencoded form body into a [`ScanRequest`]. These
//! functions are kept free of application state so they can be unit tested.

use axum::{
    Form,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{HeaderMap, header},
};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::audit::ScanRequest;

pub const MANUAL_FIELD: &str = "manual_barcode";
pub const FILE_FIELD: &str = "file";

/// Body encodings accepted by `POST /scan`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Multipart,
    UrlEncoded,
    /// No Content-Type: treated as a form with no fields
    Empty,
}

#[derive(Debug, Deserialize)]
struct ManualForm {
    manual_barcode: Option<String>,
}

/// Classifies the request body by its Content-Type header
///
/// Rejects anything other than `multipart/form-data` and
/// `application/x-www-form-urlencoded` (parameters such as `boundary` or
/// `charset` are allowed).
pub fn classify_content_type(headers: &HeaderMap) -> Result<FormKind, ApiError> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Ok(FormKind::Empty);
    };

    let content_type = value
        .to_str()
        .map_err(|_| ApiError::InvalidPayload("Content-Type is not valid ASCII".into()))?;
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    match (media_type.type_(), media_type.subtype()) {
        (mime::MULTIPART, mime::FORM_DATA) => Ok(FormKind::Multipart),
        (mime::APPLICATION, mime::WWW_FORM_URLENCODED) => Ok(FormKind::UrlEncoded),
        (ty, subtype) => Err(ApiError::InvalidPayload(format!(
            "Content-Type must be multipart/form-data or application/x-www-form-urlencoded, got: {}/{}",
            ty, subtype
        ))),
    }
}

/// Reads the scan form from the request body.
///
/// `limit` is only used to report 413 errors; enforcement happens in the
/// `DefaultBodyLimit` layer.
pub async fn read_scan_form(request: Request, limit: u64) -> Result<ScanRequest, ApiError> {
    match classify_content_type(request.headers())? {
        FormKind::Empty => Ok(ScanRequest::default()),
        FormKind::UrlEncoded => {
            let Form(form) = Form::<ManualForm>::from_request(request, &())
                .await
                .map_err(|r| ApiError::from_rejection(r.status(), r.body_text(), limit))?;

            Ok(ScanRequest {
                identifier: form.manual_barcode,
                image: None,
            })
        }
        FormKind::Multipart => {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|r| ApiError::from_rejection(r.status(), r.body_text(), limit))?;

            read_multipart(multipart, limit).await
        }
    }
}

/// Collects `manual_barcode` and `file` from a multipart stream.
///
/// Unknown fields are skipped and a repeated field keeps its last value. A
/// file part with no filename and no content is what browsers send when no
/// file was picked, so it is treated as absent.
async fn read_multipart(mut multipart: Multipart, limit: u64) -> Result<ScanRequest, ApiError> {
    let mut request = ScanRequest::default();
    let map_err = |e: MultipartError| ApiError::from_rejection(e.status(), e.body_text(), limit);

    while let Some(field) = multipart.next_field().await.map_err(map_err)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            MANUAL_FIELD => {
                request.identifier = Some(field.text().await.map_err(map_err)?);
            }
            FILE_FIELD => {
                let named = field.file_name().is_some_and(|n| !n.is_empty());
                let data = field.bytes().await.map_err(map_err)?;

                // A browser's "no file chosen" part counts as no upload rather
                // than an `Invalid Image` failure. Named empty files still fail
                // validation.
                if !named && data.is_empty() {
                    tracing::debug!("Ignoring empty file placeholder");
                    continue;
                }

                tracing::debug!(bytes = data.len(), "Received image upload");
                request.image = Some(data);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(request)
}
