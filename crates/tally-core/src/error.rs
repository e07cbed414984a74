use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the core engines.
///
/// Validation-class errors map to a rejected request at whatever boundary
/// wraps this core; not-found errors to a missing resource; state errors to a
/// conflict.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Settlement not found: {0}")]
    SettlementNotFound(Uuid),
    #[error("Loan not found: {0}")]
    LoanNotFound(Uuid),
    #[error("Recurring schedule not found: {0}")]
    ScheduleNotFound(Uuid),
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),
    #[error("Investment not found: {0}")]
    InvestmentNotFound(Uuid),
    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    #[error("Invalid loan state: {0}")]
    InvalidLoanState(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Illegal state: {0}")]
    IllegalState(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
