use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::ErrorResponse;

/// Claims of an access token issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Session expired, please sign in again")]
    SessionExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Failed to issue token: {0}")]
    Issue(jsonwebtoken::errors::Error),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Issue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AuthError::SessionExpired => ErrorResponse::session_expired(&self.to_string()),
            AuthError::Issue(_) => ErrorResponse::internal_error("Failed to issue token"),
            _ => ErrorResponse::unauthorized(&self.to_string()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
