//! Repository abstractions for data access.

pub mod account;
pub mod allocation;
pub mod bank_movement;
pub mod cash_movement;
pub mod document;
pub mod fiscal;
pub mod journal;

pub use account::AccountRepository;
pub use allocation::TransactionRepository;
pub use bank_movement::BankMovementRepository;
pub use cash_movement::CashMovementRepository;
pub use document::DocumentRepository;
pub use fiscal::FiscalInfoRepository;
pub use journal::JournalRepository;
