use aoiscan_core::error::AoiscanError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AoiscanError> for ApiError {
    fn from(err: AoiscanError) -> Self {
        match &err {
            AoiscanError::NothingToAnalyze => Self::bad_request(err.to_string()),
            AoiscanError::InvalidRegion { .. } => {
                Self::bad_request("Invalid region").with_details(err.to_string())
            }
            AoiscanError::ConfigInvalid { .. } => {
                Self::bad_request("Invalid parameter").with_details(err.to_string())
            }
            AoiscanError::NoData => Self::not_found("No Data").with_details(err.to_string()),
            AoiscanError::ExportFailed { .. }
            | AoiscanError::ExportWrite { .. }
            | AoiscanError::Serialization(_) => {
                Self::internal("Download failed").with_details(err.to_string())
            }
            _ => Self::internal("Internal error").with_details(err.to_string()),
        }
    }
}
