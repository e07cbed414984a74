//! Settlement obligations between group members.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// A one-directional obligation from `payer_id` to `payee_id`, tied to one
/// transaction. Multiple settlements may reference the same transaction (one
/// per non-payer group member).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: Uuid,
    pub transaction_id: Uuid,
    /// The member who owes.
    pub payer_id: Uuid,
    /// The member who is owed. Never equal to `payer_id`.
    pub payee_id: Uuid,
    pub amount: Decimal,
    pub status: SettlementStatus,
    pub due_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    /// Stamped when the settlement reaches COMPLETED.
    pub settlement_date: Option<DateTime<Utc>>,
    pub reminder_sent: bool,
}

impl Settlement {
    pub fn new(
        transaction_id: Uuid,
        payer_id: Uuid,
        payee_id: Uuid,
        amount: Decimal,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            payer_id,
            payee_id,
            amount,
            status: SettlementStatus::Pending,
            due_date,
            payment_method: None,
            payment_reference: None,
            settlement_date: None,
            reminder_sent: false,
        }
    }
}

impl Identifiable for Settlement {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SettlementStatus {
    Pending,
    Completed,
    Cancelled,
    Overdue,
}

impl SettlementStatus {
    /// COMPLETED and CANCELLED are terminal; no engine re-examines them.
    pub fn is_terminal(self) -> bool {
        matches!(self, SettlementStatus::Completed | SettlementStatus::Cancelled)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SettlementStatus::Pending => "Pending",
            SettlementStatus::Completed => "Completed",
            SettlementStatus::Cancelled => "Cancelled",
            SettlementStatus::Overdue => "Overdue",
        };
        f.write_str(label)
    }
}
