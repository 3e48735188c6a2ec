use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::auth::CredentialError;
use crate::pricing::PricingError;
use crate::store::StoreError;
use crate::wizard::WizardError;

/// Every handler failure. Rendered as `{"message": ...}` with the matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("Unauthorized")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "request failed");
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidTravelers(_) => ApiError::Validation(err.to_string()),
            PricingError::Overflow => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Pricing(inner) => inner.into(),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::pricing::PricingError;
    use crate::store::StoreError;
    use crate::wizard::WizardError;

    use super::ApiError;

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(StoreError::DuplicateUsername).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(WizardError::MissingTravelClass).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(WizardError::Pricing(PricingError::Overflow)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::NotFound("Trip").to_string(),
            "Trip not found"
        );
    }
}
