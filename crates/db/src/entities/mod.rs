//! `SeaORM` entity definitions.

pub mod bank_accounts;
pub mod bank_movement_details;
pub mod bank_movements;
pub mod cash_boxes;
pub mod cash_movements;
pub mod cash_sessions;
pub mod chart_of_accounts;
pub mod cost_centers;
pub mod document_fiscal_infos;
pub mod document_items;
pub mod document_payments;
pub mod documents;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod people;
pub mod sea_orm_active_enums;
pub mod tenants;
pub mod transaction_documents;
pub mod transactions;
