//! Maps the domain error onto HTTP statuses and the JSON error envelope
//! `{"error": {"code", "message", "details"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use sightline_common::SightlineError;

pub struct ApiError(pub SightlineError);

impl From<SightlineError> for ApiError {
    fn from(err: SightlineError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            SightlineError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            SightlineError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            SightlineError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            SightlineError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            SightlineError::SelfRoleChange => (StatusCode::CONFLICT, "SELF_ROLE_CHANGE"),
            SightlineError::Repository(_) => {
                warn!(error = %self.0, "repository failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
            }
        };

        let details = match &self.0 {
            SightlineError::Validation(fields) => json!(fields),
            _ => serde_json::Value::Null,
        };

        let body = json!({
            "error": {
                "code": code,
                "message": self.0.to_string(),
                "details": details,
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_common::{FieldError, Permission};

    #[test]
    fn statuses_match_error_kinds() {
        let cases = [
            (
                SightlineError::validation(vec![FieldError::new("days", "must be 7 or 30")]),
                StatusCode::BAD_REQUEST,
            ),
            (SightlineError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                SightlineError::Forbidden(Permission::EventsDelete),
                StatusCode::FORBIDDEN,
            ),
            (SightlineError::not_found("event"), StatusCode::NOT_FOUND),
            (SightlineError::SelfRoleChange, StatusCode::CONFLICT),
            (
                SightlineError::Repository("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
