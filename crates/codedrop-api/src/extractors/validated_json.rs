//! JSON extractor that runs `validator` rules after deserializing.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use codedrop_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that has passed its `Validate` rules.
///
/// Malformed JSON and failed rules are both rejected as `400
/// VALIDATION_ERROR`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value
            .validate()
            .map_err(|e| AppError::validation(validation_message(&e)))?;

        Ok(Self(value))
    }
}

pub(crate) fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError(AppError::validation(format!(
        "Invalid JSON body: {}",
        rejection.body_text()
    )))
}

/// Flattens field errors into one line, ordered by field name.
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    parts.sort();
    if parts.is_empty() {
        "Request validation failed".to_string()
    } else {
        parts.join("; ")
    }
}
