use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use storefront_core::errors::{ApplicationError, InterfaceError};
use tracing::warn;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
    pub correlation_id: String,
}

/// JSON error response carrying a fresh correlation id.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    /// 400 for input rejected before it reaches the catalog, such as a
    /// malformed path or query string.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(InterfaceError::BadRequest {
            message: message.into(),
            correlation_id: Uuid::new_v4().to_string(),
        })
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let detail = match &self.0 {
            InterfaceError::BadRequest { message, .. }
            | InterfaceError::NotFound { message, .. } => message.clone(),
            // storage details stay in the logs
            InterfaceError::ServiceUnavailable { .. } | InterfaceError::Internal { .. } => {
                String::new()
            }
        };

        ErrorBody {
            error: self.0.user_message(),
            detail,
            correlation_id: self.0.correlation_id().to_string(),
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<ApplicationError>,
{
    fn from(error: E) -> Self {
        let correlation_id = Uuid::new_v4().to_string();
        let interface = error.into().into_interface(correlation_id);
        if matches!(
            interface,
            InterfaceError::ServiceUnavailable { .. } | InterfaceError::Internal { .. }
        ) {
            warn!(
                event_name = "catalog.request.failed",
                correlation_id = interface.correlation_id(),
                error = %interface,
                "catalog request failed"
            );
        }
        Self(interface)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use storefront_core::errors::{ApplicationError, DomainError};

    use super::ApiError;

    #[test]
    fn domain_errors_are_bad_requests_with_detail() {
        let error = ApiError::from(DomainError::InvalidSort("unsupported sort".to_string()));

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.body().detail, "invalid sort: unsupported sort");
        assert!(!error.body().correlation_id.is_empty());
    }

    #[test]
    fn persistence_errors_hide_storage_detail() {
        let error = ApiError::from(ApplicationError::Persistence("disk I/O error".to_string()));

        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.body().detail, "");
        assert_eq!(
            error.body().error,
            "The service is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn bad_request_keeps_detail_and_assigns_correlation_id() {
        let error = ApiError::bad_request("Cannot parse `abc` to a `i64`");

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.body().detail, "Cannot parse `abc` to a `i64`");
        assert!(!error.body().correlation_id.is_empty());
    }

    #[test]
    fn every_error_gets_its_own_correlation_id() {
        let first = ApiError::from(ApplicationError::Configuration("a".to_string()));
        let second = ApiError::from(ApplicationError::Configuration("a".to_string()));

        assert_ne!(first.body().correlation_id, second.body().correlation_id);
    }
}
