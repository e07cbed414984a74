//! Recurring schedule templates that materialize into transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Frequency, Identifiable};
use crate::transaction::{TransactionCategory, TransactionKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringSchedule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: TransactionCategory,
    pub frequency: Frequency,
    /// Interval multiplier; always >= 1.
    pub frequency_interval: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    /// Scheduler-owned; strictly precedes `next_execution` once set.
    pub last_execution: Option<DateTime<Utc>>,
    pub next_execution: Option<DateTime<Utc>>,
    pub notification_enabled: bool,
    pub notification_lead_days: Option<u32>,
    /// Which occurrence was last announced by the upcoming sweep.
    pub last_notified_execution: Option<DateTime<Utc>>,
    pub active: bool,
}

impl RecurringSchedule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        amount: Decimal,
        kind: TransactionKind,
        category: TransactionCategory,
        frequency: Frequency,
        frequency_interval: u32,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: None,
            amount,
            kind,
            category,
            frequency,
            frequency_interval,
            start_date,
            end_date: None,
            last_execution: None,
            next_execution: None,
            notification_enabled: true,
            notification_lead_days: None,
            last_notified_execution: None,
            active: true,
        }
    }

    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_notification_lead(mut self, lead_days: u32) -> Self {
        self.notification_enabled = true;
        self.notification_lead_days = Some(lead_days);
        self
    }
}

impl Identifiable for RecurringSchedule {
    fn id(&self) -> Uuid {
        self.id
    }
}
