use axum::body::Body as AxumBody;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Response};
use axum::response::IntoResponse;
use serde_json::json;
use vantage_core::error::ContextError;

/// Rejection returned when a request context cannot be resolved.
///
/// Renders as `{"error":{"status":...,"message":...}}` with the error's status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRejection(pub ContextError);

impl From<ContextError> for ContextRejection {
    fn from(err: ContextError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ContextRejection {
    fn into_response(self) -> Response<AxumBody> {
        let status = self.0.status();
        let payload = json!({
            "error": {
                "status": status.as_u16(),
                "message": self.0.message(),
            }
        });

        let mut response = Response::new(AxumBody::from(payload.to_string()));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}
