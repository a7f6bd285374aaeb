//! Database enum types shared across entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of business document.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_kind")]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Sales invoice.
    #[sea_orm(string_value = "sales_invoice")]
    SalesInvoice,
    /// Credit note.
    #[sea_orm(string_value = "credit_note")]
    CreditNote,
    /// Purchase invoice.
    #[sea_orm(string_value = "purchase_invoice")]
    PurchaseInvoice,
    /// Tax withholding.
    #[sea_orm(string_value = "withholding")]
    Withholding,
}

impl From<DocumentKind> for balanza_core::accounting::DocumentKind {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::SalesInvoice => Self::SalesInvoice,
            DocumentKind::CreditNote => Self::CreditNote,
            DocumentKind::PurchaseInvoice => Self::PurchaseInvoice,
            DocumentKind::Withholding => Self::Withholding,
        }
    }
}

/// Business status of a document.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Issued to the counterparty.
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Confirmed (fiscally authorized where applicable).
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Voided.
    #[sea_orm(string_value = "void")]
    Void,
}

/// Fiscal authorization status (mirrors `balanza_core::fiscal::SriStatus`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sri_status")]
#[serde(rename_all = "snake_case")]
pub enum SriStatus {
    /// Not yet transmitted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Transmission attempted, reply ambiguous.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Accepted by reception.
    #[sea_orm(string_value = "received")]
    Received,
    /// Awaiting authorization.
    #[sea_orm(string_value = "in_process")]
    InProcess,
    /// Authorized.
    #[sea_orm(string_value = "authorized")]
    Authorized,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<SriStatus> for balanza_core::fiscal::SriStatus {
    fn from(status: SriStatus) -> Self {
        match status {
            SriStatus::Draft => Self::Draft,
            SriStatus::Sent => Self::Sent,
            SriStatus::Received => Self::Received,
            SriStatus::InProcess => Self::InProcess,
            SriStatus::Authorized => Self::Authorized,
            SriStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<balanza_core::fiscal::SriStatus> for SriStatus {
    fn from(status: balanza_core::fiscal::SriStatus) -> Self {
        use balanza_core::fiscal::SriStatus as Core;
        match status {
            Core::Draft => Self::Draft,
            Core::Sent => Self::Sent,
            Core::Received => Self::Received,
            Core::InProcess => Self::InProcess,
            Core::Authorized => Self::Authorized,
            Core::Rejected => Self::Rejected,
        }
    }
}

/// Direction of a money movement.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_direction")]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Money received.
    #[sea_orm(string_value = "in")]
    In,
    /// Money paid out.
    #[sea_orm(string_value = "out")]
    Out,
}

impl From<MovementDirection> for balanza_core::accounting::MovementDirection {
    fn from(direction: MovementDirection) -> Self {
        match direction {
            MovementDirection::In => Self::In,
            MovementDirection::Out => Self::Out,
        }
    }
}

impl From<balanza_core::accounting::MovementDirection> for MovementDirection {
    fn from(direction: balanza_core::accounting::MovementDirection) -> Self {
        use balanza_core::accounting::MovementDirection as Core;
        match direction {
            Core::In => Self::In,
            Core::Out => Self::Out,
        }
    }
}

/// Payment method of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash through an open session.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// Cash session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_session_status")]
#[serde(rename_all = "lowercase")]
pub enum CashSessionStatus {
    /// Session is open and accepts movements.
    #[sea_orm(string_value = "open")]
    Open,
    /// Session has been closed.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Account classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_kind")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue account.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<balanza_core::coa::AccountKind> for AccountKind {
    fn from(kind: balanza_core::coa::AccountKind) -> Self {
        use balanza_core::coa::AccountKind as Core;
        match kind {
            Core::Asset => Self::Asset,
            Core::Liability => Self::Liability,
            Core::Equity => Self::Equity,
            Core::Revenue => Self::Revenue,
            Core::Expense => Self::Expense,
        }
    }
}

/// Journal entry classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_kind")]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Sales document.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Purchase document.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Cash movement.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank movement.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Withholding document.
    #[sea_orm(string_value = "withholding")]
    Withholding,
    /// Inter-account transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
    /// Manual adjustment.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl From<balanza_core::ledger::EntryKind> for EntryKind {
    fn from(kind: balanza_core::ledger::EntryKind) -> Self {
        use balanza_core::ledger::EntryKind as Core;
        match kind {
            Core::Sale => Self::Sale,
            Core::Purchase => Self::Purchase,
            Core::Cash => Self::Cash,
            Core::Bank => Self::Bank,
            Core::Withholding => Self::Withholding,
            Core::Transfer => Self::Transfer,
            Core::Adjustment => Self::Adjustment,
        }
    }
}
