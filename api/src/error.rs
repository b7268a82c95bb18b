use crate::schema::ErrorDetail;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const ENGINE_UNAVAILABLE: &str = "RAG engine is not initialised. Check server logs.";
pub const ANSWER_FAILED: &str = "An unexpected error occurred while generating the answer.";
pub const INVALID_BODY: &str = "Request body must be a JSON object with a string 'question' field.";

/// Errors returned to HTTP clients. The message is the whole response body, so
/// variants never carry internal error text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", ENGINE_UNAVAILABLE)]
    EngineUnavailable,

    #[error("{}", ANSWER_FAILED)]
    AnswerFailed,

    #[error("{0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidRequest(detail.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EngineUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::AnswerFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        log::debug!("Rejected request body ({}): {}", rejection.status(), rejection.body_text());
        Self::invalid(INVALID_BODY)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorDetail {
            detail: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_failure_kinds() {
        assert_eq!(ApiError::EngineUnavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::AnswerFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::invalid("bad").status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn messages_are_fixed() {
        assert_eq!(ApiError::EngineUnavailable.to_string(), ENGINE_UNAVAILABLE);
        assert_eq!(ApiError::AnswerFailed.to_string(), ANSWER_FAILED);
    }
}
