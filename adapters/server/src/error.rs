//! Mapping of content errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use grow_defence_core::ContentError;
use log::error;

use crate::wire::ErrorResponse;

/// Error returned by every handler.
#[derive(Debug)]
pub(crate) struct ApiError(ContentError);

impl ApiError {
    pub(crate) fn status(&self) -> StatusCode {
        match self.0 {
            ContentError::Validation(_) => StatusCode::BAD_REQUEST,
            ContentError::Unauthorized => StatusCode::UNAUTHORIZED,
            ContentError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(error: ContentError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self.0);
        }
        let body = ErrorResponse {
            success: false,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (ContentError::validation("bad"), StatusCode::BAD_REQUEST),
            (ContentError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                ContentError::generation("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }
}
