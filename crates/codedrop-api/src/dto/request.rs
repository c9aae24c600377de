//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// JSON body for issuing a code for an already-uploaded file.
///
/// Every field is optional at the parsing stage so that an empty body is
/// reported as a validation error by the issuance service rather than as
/// a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct IssueLinkRequest {
    /// Retrieval URL of the uploaded file.
    #[serde(default, alias = "fileUrl")]
    #[validate(length(max = 2048, message = "url must be at most 2048 characters"))]
    pub url: Option<String>,
    /// Descriptive file name.
    #[serde(default, alias = "fileName")]
    #[validate(length(max = 255, message = "file_name must be at most 255 characters"))]
    pub file_name: Option<String>,
    /// Media type of the file.
    #[serde(default, alias = "fileType", alias = "mediaType")]
    #[validate(length(max = 255, message = "media_type must be at most 255 characters"))]
    pub media_type: Option<String>,
}

/// JSON body for starting a direct upload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BeginUploadRequest {
    /// Name of the file the client is about to upload.
    #[serde(alias = "fileName")]
    #[validate(length(min = 1, max = 255, message = "file_name is required"))]
    pub file_name: String,
    /// Media type of the file.
    #[serde(alias = "fileType", alias = "mediaType")]
    #[validate(length(min = 1, max = 255, message = "media_type is required"))]
    pub media_type: String,
}

/// Query string for code redemption.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedeemQuery {
    /// The code to redeem, as typed by the user.
    pub code: Option<String>,
}
