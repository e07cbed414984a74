//! Domain models for ledger transactions.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Frequency, Identifiable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Positive magnitude; direction is carried by `kind`.
    pub amount: Decimal,
    pub description: String,
    pub kind: TransactionKind,
    pub category: TransactionCategory,
    pub date: DateTime<Utc>,
    pub group_id: Option<Uuid>,
    pub loan_id: Option<Uuid>,
    pub recurring: bool,
    pub recurrence: Option<Frequency>,
    pub next_recurrence: Option<DateTime<Utc>>,
    /// Set only once every settlement referencing this transaction has left
    /// PENDING.
    pub settled: bool,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        amount: Decimal,
        description: impl Into<String>,
        kind: TransactionKind,
        category: TransactionCategory,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            description: description.into(),
            kind,
            category,
            date,
            group_id: None,
            loan_id: None,
            recurring: false,
            recurrence: None,
            next_recurrence: None,
            settled: false,
        }
    }

    pub fn with_group(mut self, group_id: Uuid) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_loan(mut self, loan_id: Uuid) -> Self {
        self.loan_id = Some(loan_id);
        self
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates the kinds of money movement a transaction records.
pub enum TransactionKind {
    Expense,
    Income,
    Loan,
    Investment,
    BillSplit,
    LoanPayment,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
            TransactionKind::Loan => "Loan",
            TransactionKind::Investment => "Investment",
            TransactionKind::BillSplit => "Bill Split",
            TransactionKind::LoanPayment => "Loan Payment",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionCategory {
    Food,
    Transportation,
    Housing,
    Utilities,
    Entertainment,
    Healthcare,
    Education,
    Shopping,
    Investment,
    LoanPayment,
    Salary,
    Other,
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionCategory::Food => "Food",
            TransactionCategory::Transportation => "Transportation",
            TransactionCategory::Housing => "Housing",
            TransactionCategory::Utilities => "Utilities",
            TransactionCategory::Entertainment => "Entertainment",
            TransactionCategory::Healthcare => "Healthcare",
            TransactionCategory::Education => "Education",
            TransactionCategory::Shopping => "Shopping",
            TransactionCategory::Investment => "Investment",
            TransactionCategory::LoanPayment => "Loan Payment",
            TransactionCategory::Salary => "Salary",
            TransactionCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn serde_round_trip_preserves_amount_exactly() {
        let txn = Transaction::new(
            Uuid::new_v4(),
            dec!(19.99),
            "Streaming",
            TransactionKind::Expense,
            TransactionCategory::Entertainment,
            chrono::Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        )
        .with_group(Uuid::new_v4());

        let json = serde_json::to_string(&txn).expect("serialize");
        let back: Transaction = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back.id, txn.id);
        assert_eq!(back.amount, dec!(19.99));
        assert_eq!(back.kind, TransactionKind::Expense);
        assert_eq!(back.group_id, txn.group_id);
        assert!(!back.settled);
    }
}
