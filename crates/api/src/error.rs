//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": CODE, "message": text}` with
//! the status the domain error carries.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledgerflow_core::fiscal::FiscalError;
use ledgerflow_core::ledger::LedgerError;
use ledgerflow_core::workflow::WorkflowError;
use ledgerflow_shared::AppError;
use serde_json::json;
use tracing::error;

/// An error rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::new(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<FiscalError> for ApiError {
    fn from(err: FiscalError) -> Self {
        Self::new(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        Self::new(err.http_status_code(), err.error_code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Database details stay in the log.
        let message = if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "Request failed");
            "Internal server error".to_string()
        } else {
            self.message
        };

        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rust_decimal_macros::dec;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unbalanced_voucher_is_bad_request() {
        let err: ApiError = LedgerError::UnbalancedVoucher {
            debit: dec!(100.00),
            credit: dec!(60.00),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let body = body_json(err.into_response()).await;
        assert_eq!(body["error"], "UNBALANCED_VOUCHER");
        assert_eq!(
            body["message"],
            "Voucher is not balanced. Debit: 100.00, Credit: 60.00"
        );
    }

    #[test]
    fn test_wrapped_errors_keep_their_status() {
        let err: ApiError =
            WorkflowError::Posting(LedgerError::LockContention("deadlock detected".into())).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "LOCK_CONTENTION");

        let err: ApiError = WorkflowError::FirstStepWithoutApprover(4).into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = FiscalError::YearNotFound(8).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_database_details_are_hidden() {
        let err: ApiError = LedgerError::Database("connection refused on 10.0.0.4".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "Internal server error");
    }

    #[test]
    fn test_app_error_conversion() {
        let err: ApiError = AppError::Validation("narration is required".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
