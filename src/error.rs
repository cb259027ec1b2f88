use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("missing required fields: {}", .0.join(", "))]
    ValidationError(Vec<&'static str>),

    #[error("{0} not found(id: {1})")]
    NotFoundError(&'static str, i32),

    #[error("invalid request: {0}")]
    InvalidRequestError(String),

    #[error("invalid decision: {0:?}, expected APPROVED or REJECTED")]
    InvalidDecisionError(String),

    #[error("host application has already been decided(id: {id}, status: {status})")]
    AlreadyDecidedError { id: i32, status: String },

    #[error("role is not configured: {0}")]
    RoleMissingError(String),

    #[error("database error: {0}")]
    StorageError(#[from] sqlx::Error),

    #[error("jwt error: {0}")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("dotenv error: {0}")]
    DotEnvError(#[from] dotenv::Error),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden")]
    Forbidden,

    #[error("host account is not active(user: {0})")]
    HostInactiveError(i32),
}

impl Error {
    pub fn reason(&self) -> &'static str {
        match self {
            Error::ValidationError(_) => "validation_error",
            Error::NotFoundError(..) => "not_found",
            Error::InvalidRequestError(_) => "invalid_request",
            Error::InvalidDecisionError(_) => "invalid_decision",
            Error::AlreadyDecidedError { .. } => "already_decided",
            Error::RoleMissingError(_) => "role_missing",
            Error::StorageError(_) => "storage_error",
            Error::JWTError(_) | Error::Unauthorized(_) => "unauthorized",
            Error::Forbidden => "forbidden",
            Error::HostInactiveError(_) => "host_inactive",
            Error::DotEnvError(_) | Error::ConfigError(_) => "config_error",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::ValidationError(_) | Error::InvalidDecisionError(_) | Error::InvalidRequestError(_) => StatusCode::BAD_REQUEST,
            Error::NotFoundError(..) => StatusCode::NOT_FOUND,
            Error::AlreadyDecidedError { .. } => StatusCode::CONFLICT,
            Error::JWTError(_) | Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden | Error::HostInactiveError(_) => StatusCode::FORBIDDEN,
            Error::RoleMissingError(_) | Error::StorageError(_) | Error::DotEnvError(_) | Error::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        let mut body = json!({
            "error": self.reason(),
            "message": self.to_string(),
        });
        if let Error::ValidationError(missing) = self {
            body["missing"] = json!(missing);
        }
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validation_error_lists_fields() {
        let err = Error::ValidationError(vec!["org_name", "motivation"]);
        assert_eq!(err.to_string(), "missing required fields: org_name, motivation");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_reasons_are_distinguishable() {
        assert_eq!(Error::NotFoundError("event", 1).reason(), "not_found");
        assert_eq!(Error::NotFoundError("event", 1).to_string(), "event not found(id: 1)");
        assert_eq!(Error::NotFoundError("host application", 1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::InvalidRequestError("bad json".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::InvalidRequestError("bad json".into()).reason(), "invalid_request");
        assert_eq!(Error::HostInactiveError(7).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::HostInactiveError(7).reason(), "host_inactive");
        assert_eq!(Error::InvalidDecisionError("MAYBE".into()).reason(), "invalid_decision");
        assert_eq!(
            Error::AlreadyDecidedError {
                id: 1,
                status: "Rejected".into()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(Error::StorageError(sqlx::Error::RowNotFound).reason(), "storage_error");
        assert_eq!(Error::RoleMissingError("Host".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
