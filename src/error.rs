use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::database::PresetError;
use crate::grid::GridError;
use crate::handlers::shared::ApiResponse;
use crate::services::scheduler::SchedulerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The roster itself cannot be rendered faithfully.
    #[error("Invalid roster: {0}")]
    InvalidRoster(GridError),

    /// The scheduler failed; the message is the scheduler's own when it sent one.
    #[error("{0}")]
    Upstream(String),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidRoster(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        if status_code.is_server_error() {
            log::error!("Request failed with status {}: {}", status_code, error_message);
        } else {
            log::warn!("Request failed with status {}: {}", status_code, error_message);
        }

        HttpResponse::build(status_code).json(ApiResponse::<()>::error(&error_message))
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }
}

impl From<SchedulerError> for AppError {
    fn from(error: SchedulerError) -> Self {
        match error {
            // The scheduler judged the input itself (wrong sheet layout, missing
            // settings); that is the caller's problem, not a gateway failure.
            SchedulerError::Rejected { status, detail } if (400..500).contains(&status) => {
                AppError::BadRequest(detail)
            }
            SchedulerError::Rejected { detail, .. } => AppError::Upstream(detail),
            SchedulerError::Transport(err) => {
                log::error!("Scheduler transport error: {}", err);
                AppError::Upstream("Scheduler service is unavailable".to_string())
            }
        }
    }
}

impl From<GridError> for AppError {
    fn from(error: GridError) -> Self {
        match error {
            GridError::UnknownMetric(_) => AppError::BadRequest(error.to_string()),
            GridError::RaggedMatrix { .. } => AppError::InvalidRoster(error),
        }
    }
}

impl From<PresetError> for AppError {
    fn from(error: PresetError) -> Self {
        match error {
            PresetError::Reserved(_) | PresetError::InvalidName => {
                AppError::BadRequest(error.to_string())
            }
            PresetError::Corrupt { .. } | PresetError::Store(_) => {
                log::error!("Preset storage error: {}", error);
                AppError::internal_server_error_message("Preset storage failed")
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);
        AppError::InternalServerError(Some(error.to_string()))
    }
}
