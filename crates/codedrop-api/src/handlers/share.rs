//! Issue and redeem handlers.

use axum::Json;
use axum::extract::{Query, State};

use codedrop_core::error::AppError;

use crate::dto::request::{BeginUploadRequest, RedeemQuery};
use crate::dto::response::{ApiResponse, IssueResponse, RedeemResponse, UploadSessionResponse};
use crate::error::ApiResult;
use crate::extractors::{IssueBody, ValidatedJson};
use crate::state::AppState;

/// POST /api/issue
pub async fn issue(
    State(state): State<AppState>,
    IssueBody(input): IssueBody,
) -> ApiResult<Json<ApiResponse<IssueResponse>>> {
    let record = state.issuance_service.issue(input).await?;
    Ok(Json(ApiResponse::ok(record.into())))
}

/// POST /api/issue/session
pub async fn begin_upload(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<BeginUploadRequest>,
) -> ApiResult<Json<ApiResponse<UploadSessionResponse>>> {
    let ticket = state
        .issuance_service
        .begin_upload(&req.file_name, &req.media_type)
        .await?;
    Ok(Json(ApiResponse::ok(ticket.into())))
}

/// GET /api/redeem?code=
pub async fn redeem(
    State(state): State<AppState>,
    Query(query): Query<RedeemQuery>,
) -> ApiResult<Json<ApiResponse<RedeemResponse>>> {
    let code = query
        .code
        .ok_or_else(|| AppError::validation("Code is required"))?;

    let record = state.redemption_service.redeem(&code).await?;
    Ok(Json(ApiResponse::ok(record.into())))
}
