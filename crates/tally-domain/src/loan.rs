//! Peer-to-peer loans.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Frequency, Identifiable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub lender_id: Uuid,
    pub principal_amount: Decimal,
    /// Carried for reporting; the core never compounds it.
    pub interest_rate: Decimal,
    pub start_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// Descriptive cadence only; never drives arithmetic.
    pub payment_frequency: Option<Frequency>,
    /// Monotonically non-increasing while ACTIVE; never negative.
    pub remaining_amount: Decimal,
    pub status: LoanStatus,
    /// Ids of the payment transactions applied to this loan.
    pub payment_ids: Vec<Uuid>,
}

impl Loan {
    pub fn new(
        borrower_id: Uuid,
        lender_id: Uuid,
        principal_amount: Decimal,
        interest_rate: Decimal,
        start_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            borrower_id,
            lender_id,
            principal_amount,
            interest_rate,
            start_date,
            due_date,
            payment_frequency: None,
            remaining_amount: principal_amount,
            status: LoanStatus::Pending,
            payment_ids: Vec::new(),
        }
    }

    pub fn with_payment_frequency(mut self, frequency: Frequency) -> Self {
        self.payment_frequency = Some(frequency);
        self
    }
}

impl Identifiable for Loan {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoanStatus {
    Pending,
    Active,
    Completed,
    Defaulted,
    Cancelled,
}

impl LoanStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LoanStatus::Completed | LoanStatus::Defaulted | LoanStatus::Cancelled
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::Active => "Active",
            LoanStatus::Completed => "Completed",
            LoanStatus::Defaulted => "Defaulted",
            LoanStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}
