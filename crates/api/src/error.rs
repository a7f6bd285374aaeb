//! Error-to-response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use balanza_db::repositories::account::AccountError;
use balanza_db::repositories::allocation::TransactionError;
use balanza_db::repositories::bank_movement::BankMovementError;
use balanza_db::repositories::cash_movement::CashMovementError;
use balanza_db::repositories::document::DocumentError;
use balanza_db::repositories::fiscal::FiscalInfoError;
use balanza_sri::PipelineError;

/// API error carrying the HTTP status, a stable code, and a message.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: StatusCode,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        }
    }

    fn not_found(message: String) -> Self {
        Self::new(404, "NOT_FOUND", message)
    }

    fn database(message: String) -> Self {
        Self::new(500, "DATABASE_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match &err {
            DocumentError::NotFound(_)
            | DocumentError::TenantNotFound(_)
            | DocumentError::PersonNotFound(_) => Self::not_found(err.to_string()),
            DocumentError::CannotModifyVoid => Self::new(409, "CANNOT_MODIFY_VOID", err.to_string()),
            DocumentError::Accounting(e) => {
                Self::new(e.http_status_code(), e.error_code(), err.to_string())
            }
            DocumentError::Journal(e) => Self::from_journal(e, err.to_string()),
            DocumentError::Database(_) => Self::database(err.to_string()),
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match &err {
            TransactionError::NotFound(_) | TransactionError::PersonNotFound(_) => {
                Self::not_found(err.to_string())
            }
            TransactionError::Allocation(e) => {
                Self::new(e.http_status_code(), e.error_code(), err.to_string())
            }
            TransactionError::CashMovement(e) => Self::from_cash(e),
            TransactionError::BankMovement(e) => Self::from_bank(e),
            TransactionError::Document(_) => Self::new(422, "DOCUMENT_UPDATE_FAILED", err.to_string()),
            TransactionError::Database(_) => Self::database(err.to_string()),
        }
    }
}

impl From<CashMovementError> for ApiError {
    fn from(err: CashMovementError) -> Self {
        Self::from_cash(&err)
    }
}

impl From<BankMovementError> for ApiError {
    fn from(err: BankMovementError) -> Self {
        Self::from_bank(&err)
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match &err {
            AccountError::AccountNotFound(_) | AccountError::ParentNotFound(_) => {
                Self::not_found(err.to_string())
            }
            AccountError::DuplicateCode(_) => Self::new(409, "DUPLICATE_CODE", err.to_string()),
            AccountError::Clone(_) => Self::new(400, "INVALID_TEMPLATE", err.to_string()),
            AccountError::Database(_) => Self::database(err.to_string()),
        }
    }
}

impl From<FiscalInfoError> for ApiError {
    fn from(err: FiscalInfoError) -> Self {
        match &err {
            FiscalInfoError::NotFound(_) => Self::not_found(err.to_string()),
            FiscalInfoError::InvalidTransition { .. } => {
                Self::new(409, "INVALID_TRANSITION", err.to_string())
            }
            FiscalInfoError::NotRejected(_) => Self::new(409, "NOT_REJECTED", err.to_string()),
            FiscalInfoError::Database(_) => Self::database(err.to_string()),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::Fiscal(e) => {
                Self::new(e.http_status_code(), e.error_code(), err.to_string())
            }
            PipelineError::FiscalInfo(e) => match e {
                FiscalInfoError::NotFound(_) => Self::not_found(err.to_string()),
                _ => Self::new(409, "FISCAL_STATE_CONFLICT", err.to_string()),
            },
            PipelineError::Document(_) => Self::new(422, "DOCUMENT_UPDATE_FAILED", err.to_string()),
            PipelineError::TenantNotFound(_) => Self::not_found(err.to_string()),
            PipelineError::Database(_) => Self::database(err.to_string()),
        }
    }
}

impl ApiError {
    fn from_journal(err: &balanza_db::repositories::journal::JournalError, message: String) -> Self {
        use balanza_db::repositories::journal::JournalError;
        match err {
            JournalError::Validation(e) => Self::new(e.http_status_code(), e.error_code(), message),
            JournalError::Database(_) => Self::database(message),
        }
    }

    fn from_cash(err: &CashMovementError) -> Self {
        match err {
            CashMovementError::NotFound(_)
            | CashMovementError::SessionNotFound(_)
            | CashMovementError::CashBoxNotFound(_)
            | CashMovementError::PersonNotFound(_) => Self::not_found(err.to_string()),
            CashMovementError::SessionClosed(_) => {
                Self::new(422, "CASH_SESSION_CLOSED", err.to_string())
            }
            CashMovementError::Accounting(e) => {
                Self::new(e.http_status_code(), e.error_code(), err.to_string())
            }
            CashMovementError::Journal(e) => Self::from_journal(e, err.to_string()),
            CashMovementError::Database(_) => Self::database(err.to_string()),
        }
    }

    fn from_bank(err: &BankMovementError) -> Self {
        match err {
            BankMovementError::NotFound(_) | BankMovementError::BankAccountNotFound(_) => {
                Self::not_found(err.to_string())
            }
            BankMovementError::Accounting(e) => {
                Self::new(e.http_status_code(), e.error_code(), err.to_string())
            }
            BankMovementError::Journal(e) => Self::from_journal(e, err.to_string()),
            BankMovementError::Database(_) => Self::database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanza_core::allocation::AllocationError;

    #[test]
    fn test_allocation_errors_keep_their_codes() {
        let err: ApiError = TransactionError::Allocation(AllocationError::NoOpenCashSession).into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, "NO_OPEN_CASH_SESSION");
    }

    #[test]
    fn test_pending_maps_to_accepted() {
        let err: ApiError =
            PipelineError::Fiscal(balanza_core::fiscal::FiscalError::AuthorizationPending).into();
        assert_eq!(err.status, StatusCode::ACCEPTED);
        assert_eq!(err.code, "AUTHORIZATION_PENDING");
    }
}
