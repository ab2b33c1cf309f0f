use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;

/// The error surface of the API. Every failing operation is translated into
/// one of these before it reaches the caller; raw storage detail is logged
/// and withheld from the response body.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: String,
    public_message: Option<String>,
}

// Associated constants for enum-like usage without parentheses
impl ApiError {
    pub const NOT_FOUND: ApiError = ApiError {
        status: StatusCode::NOT_FOUND,
        public_code: String::new(),
        public_message: None,
    };

    pub const FORBIDDEN: ApiError = ApiError {
        status: StatusCode::FORBIDDEN,
        public_code: String::new(),
        public_message: None,
    };

    pub const UNAUTHORIZED: ApiError = ApiError {
        status: StatusCode::UNAUTHORIZED,
        public_code: String::new(),
        public_message: None,
    };
}

impl ApiError {
    fn new(status: StatusCode, public_code: impl Into<String>, public_message: Option<String>) -> Self {
        Self {
            status,
            public_code: public_code.into(),
            public_message,
        }
    }

    /// Missing or malformed required fields in the request.
    pub fn validation(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Validation error: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", Some(msg))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Not found: {}", msg);
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", Some(msg))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Unauthorized: {}", msg);
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", Some(msg))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Forbidden: {}", msg);
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", Some(msg))
    }

    /// Transition not permitted from the entity's current state.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Invalid state: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, "INVALID_STATE", Some(msg))
    }

    /// A storage-layer uniqueness constraint was violated.
    pub fn duplicate(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Duplicate: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, "DUPLICATE", Some(msg))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn public_code(&self) -> &str {
        if self.public_code.is_empty() {
            match self.status {
                StatusCode::NOT_FOUND => "NOT_FOUND",
                StatusCode::FORBIDDEN => "FORBIDDEN",
                StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
                StatusCode::BAD_REQUEST => "VALIDATION_ERROR",
                _ => "ERROR",
            }
        } else {
            self.public_code.as_str()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            success: bool,
            error: &'a str,
            message: &'a str,
        }

        let code = self.public_code();
        let message = self
            .public_message
            .as_deref()
            .unwrap_or_else(|| self.status.canonical_reason().unwrap_or("Error"));

        (
            self.status,
            Json(ErrorEnvelope {
                success: false,
                error: code,
                message,
            }),
        )
            .into_response()
    }
}

impl From<glowcart_types::Error> for ApiError {
    fn from(err: glowcart_types::Error) -> Self {
        tracing::error!("Internal error: {:?}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            tracing::warn!("Duplicate key: {:?}", err);
            return Self::duplicate("A record with the same unique value already exists");
        }
        tracing::error!("Database error: {:?}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", None)
    }
}

impl From<mongodb::bson::ser::Error> for ApiError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        tracing::error!("BSON serialization error: {:?}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
    }
}

impl From<mongodb::bson::de::Error> for ApiError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        tracing::error!("BSON deserialization error: {:?}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!("JSON error: {:?}", err);
        Self::validation(format!("JSON error: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::warn!("JWT error: {:?}", err);
        Self::unauthorized("Invalid or expired token")
    }
}

/// MongoDB signals every unique-index violation with error code 11000,
/// either as a write error or as a command error.
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.public_code())
    }
}

// Convenience macros for quick error creation
#[macro_export]
macro_rules! internal {
    ($($arg:tt)*) => { $crate::error::ApiError::internal(format!($($arg)*)) };
}

#[macro_export]
macro_rules! not_found {
    ($($arg:tt)*) => { $crate::error::ApiError::not_found(format!($($arg)*)) };
}

#[macro_export]
macro_rules! validation {
    ($($arg:tt)*) => { $crate::error::ApiError::validation(format!($($arg)*)) };
}

#[macro_export]
macro_rules! unauthorized {
    ($($arg:tt)*) => { $crate::error::ApiError::unauthorized(format!($($arg)*)) };
}

#[macro_export]
macro_rules! forbidden {
    ($($arg:tt)*) => { $crate::error::ApiError::forbidden(format!($($arg)*)) };
}

#[macro_export]
macro_rules! invalid_state {
    ($($arg:tt)*) => { $crate::error::ApiError::invalid_state(format!($($arg)*)) };
}

#[macro_export]
macro_rules! duplicate {
    ($($arg:tt)*) => { $crate::error::ApiError::duplicate(format!($($arg)*)) };
}

// Legacy type alias kept for parity with middleware signatures
pub type AuthorizationError = ApiError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::invalid_state("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::duplicate("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_state_and_duplicate_have_distinct_codes() {
        assert_eq!(ApiError::invalid_state("x").public_code(), "INVALID_STATE");
        assert_eq!(ApiError::duplicate("x").public_code(), "DUPLICATE");
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let err = ApiError::internal("secret connection string");
        assert!(err.public_message.is_none());
    }

    #[test]
    fn const_errors_fall_back_to_status_code_names() {
        assert_eq!(ApiError::NOT_FOUND.public_code(), "NOT_FOUND");
        assert_eq!(ApiError::FORBIDDEN.public_code(), "FORBIDDEN");
        assert_eq!(ApiError::UNAUTHORIZED.public_code(), "UNAUTHORIZED");
    }
}
