use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::domain::order::ServiceError;

/// JSON body sent for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(ServiceError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        // Store details stay in the logs
        let message = match self {
            ServiceError::Store(_) => "Internal server error".to_string(),
            other => other.message(),
        };

        HttpResponse::build(ResponseError::status_code(self)).json(ErrorBody {
            status: ServiceError::status_code(self),
            message,
        })
    }
}
