use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors that can surface from `GET /api/quiz`.
///
/// Image lookup failures and missing credentials never show up here; they
/// are absorbed by the image collaborator and at startup.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Daily request limit reached ({limit} per day)")]
    RateLimitExceeded { limit: u32 },

    #[error("Failed to select a quiz question")]
    SelectionFailure(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for QuizError {
    fn status_code(&self) -> StatusCode {
        match self {
            QuizError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            QuizError::SelectionFailure(_) | QuizError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
