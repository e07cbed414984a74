//! Invoices attached to transactions.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub invoice_number: String,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub description: Option<String>,
    pub payment_terms: Option<String>,
    pub payment_method: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub attachment_url: Option<String>,
    pub reminder_sent: bool,
    pub last_reminder_date: Option<DateTime<Utc>>,
}

impl Invoice {
    pub fn new(
        transaction_id: Uuid,
        invoice_number: impl Into<String>,
        amount: Decimal,
        issue_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            invoice_number: invoice_number.into(),
            issue_date,
            due_date: None,
            amount,
            status: InvoiceStatus::Pending,
            description: None,
            payment_terms: None,
            payment_method: None,
            payment_date: None,
            attachment_url: None,
            reminder_sent: false,
            last_reminder_date: None,
        }
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}
