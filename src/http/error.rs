//! @ai:module:intent Map report errors onto HTTP responses
//! @ai:module:layer interface
//! @ai:module:public_api error_status
//! @ai:module:stateless true

use crate::error::ReportError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// @ai:intent HTTP status for an error: caller mistakes are 4xx, the rest 500
/// @ai:effects pure
pub fn error_status(err: &ReportError) -> StatusCode {
    match err {
        ReportError::TemplateNotFound { .. }
        | ReportError::UnsupportedFormat(_)
        | ReportError::UnsupportedReportType(_)
        | ReportError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ReportError::RegistryMiss(_) | ReportError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<JsonRejection> for ReportError {
    fn from(rejection: JsonRejection) -> Self {
        ReportError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ReportError {
    fn from(rejection: QueryRejection) -> Self {
        ReportError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = error_status(&self);
        if self.is_user_error() {
            tracing::debug!("Rejected request: {}", self);
        } else {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        let not_found = ReportError::TemplateNotFound {
            language: "en".into(),
            format: "pitch".into(),
        };
        assert_eq!(error_status(&not_found), StatusCode::BAD_REQUEST);
        assert_eq!(error_status(&ReportError::UnsupportedFormat("pdf".into())), StatusCode::BAD_REQUEST);
        assert_eq!(error_status(&ReportError::RegistryMiss("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(error_status(&ReportError::ProjectNotFound("p".into())), StatusCode::NOT_FOUND);
        assert_eq!(error_status(&ReportError::Csv("broken".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ReportError::RegistryMiss("summary_report_1".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "RegistryMiss");
        assert_eq!(body["error"]["message"], "Report summary_report_1 not found");
        assert!(body.get("report").is_none());
    }
}
