use crate::model::response::ErrorResponse;
use crate::repository::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;
use validator::ValidationErrors;

const INTERNAL_DETAIL: &str = "An unexpected error occurred while processing the request";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("{message}: {detail}")]
    NotFound { message: String, detail: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn team_not_found(team_id: &str) -> Self {
        ApiError::NotFound {
            message: "Team not found".to_string(),
            detail: format!("No team registration exists with id {team_id}"),
        }
    }

    pub fn player_not_found(player_id: &str) -> Self {
        ApiError::NotFound {
            message: "Player not found".to_string(),
            detail: format!("No player exists with id {player_id}"),
        }
    }

    pub fn match_not_found(match_id: &str) -> Self {
        ApiError::NotFound {
            message: "Match not found".to_string(),
            detail: format!("No match exists with id {match_id}"),
        }
    }

    pub fn route_not_found() -> Self {
        ApiError::NotFound {
            message: "Resource not found".to_string(),
            detail: "The requested path does not exist".to_string(),
        }
    }

    fn envelope(&self) -> ErrorResponse {
        let (message, detail) = match self {
            ApiError::BadRequest(detail) => ("Invalid request".to_string(), detail.to_owned()),
            ApiError::NotFound { message, detail } => (message.to_owned(), detail.to_owned()),
            ApiError::Conflict(detail) => ("Request conflicts with current state".to_string(), detail.to_owned()),
            ApiError::Internal(_) => ("Internal server error".to_string(), INTERNAL_DETAIL.to_string()),
        };
        ErrorResponse {
            success: false,
            message,
            detail: Some(detail),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.envelope())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if let StoreError::Duplicate { .. } = err {
            return ApiError::Conflict("The record already exists".to_string());
        }
        error!("A storage error occurred while handling a request. The error: {:?}", err);
        ApiError::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}
