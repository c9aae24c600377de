//! Request body for `POST /api/issue`: a multipart upload or a JSON link.

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use validator::Validate;

use codedrop_core::error::{AppError, ErrorKind};
use codedrop_service::IssueInput;
use codedrop_storage::mime::guess_media_type;

use super::validated_json::{json_rejection, validation_message};
use crate::dto::request::IssueLinkRequest;
use crate::error::ApiError;

/// Name of the multipart part carrying the file.
pub const FILE_FIELD: &str = "file";

/// Issuance input taken from either body shape.
///
/// `multipart/form-data` must carry a `file` part; its bytes go through the
/// storage provider. `application/json` carries the URL of a file the
/// client already uploaded.
#[derive(Debug)]
pub struct IssueBody(pub IssueInput);

impl<S> FromRequest<S> for IssueBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                AppError::validation(format!("Invalid multipart body: {}", e.body_text()))
            })?;
            from_multipart(multipart).await.map(Self)
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<IssueLinkRequest>::from_request(req, state)
                .await
                .map_err(json_rejection)?;
            body.validate()
                .map_err(|e| AppError::validation(validation_message(&e)))?;
            Ok(Self(IssueInput::Url {
                url: body.url.unwrap_or_default(),
                file_name: body.file_name,
                media_type: body.media_type,
            }))
        } else {
            Err(AppError::validation(
                "Expected a multipart/form-data or application/json body",
            )
            .into())
        }
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<IssueInput, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(FILE_FIELD) {
            return read_file_field(field).await;
        }
    }
    Err(AppError::validation(format!("Missing '{FILE_FIELD}' part")).into())
}

async fn read_file_field(field: Field<'_>) -> Result<IssueInput, ApiError> {
    let name = field
        .file_name()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("file")
        .to_string();
    let media_type = field
        .content_type()
        .map(str::to_string)
        .unwrap_or_else(|| guess_media_type(&name).to_string());

    let data = field.bytes().await.map_err(multipart_error)?;

    Ok(IssueInput::Content {
        name,
        media_type,
        data,
    })
}

fn multipart_error(err: MultipartError) -> ApiError {
    let kind = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorKind::PayloadTooLarge
    } else {
        ErrorKind::Validation
    };
    ApiError(AppError::new(kind, err.body_text()))
}
