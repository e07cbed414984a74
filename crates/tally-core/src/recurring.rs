//! Recurring scheduler: advances schedules and materializes due occurrences
//! into concrete transactions.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use tally_domain::{
    Frequency, RecurringSchedule, Transaction, TransactionCategory, TransactionKind,
};

use crate::error::{CoreError, Result};
use crate::notify::{NotificationEvent, NotificationKind, NotificationSink};
use crate::store::LedgerStore;
use crate::sweep::SweepReport;

/// Term edits for [`RecurringScheduler::update_schedule`]. Execution dates are
/// scheduler-owned and cannot be patched.
#[derive(Debug, Default, Clone)]
pub struct SchedulePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionKind>,
    pub category: Option<TransactionCategory>,
    pub frequency: Option<Frequency>,
    pub frequency_interval: Option<u32>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub notification_enabled: Option<bool>,
    pub notification_lead_days: Option<Option<u32>>,
}

pub struct RecurringScheduler {
    store: Arc<dyn LedgerStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl RecurringScheduler {
    /// The sweeps take `now` explicitly, so the scheduler needs no clock of
    /// its own; the external trigger reads one and passes the timestamp in.
    pub fn new(store: Arc<dyn LedgerStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Pure next-occurrence computation: the base is the last execution when
    /// set, the start date otherwise, advanced by the schedule's interval.
    /// Calendar-aware; see [`Frequency::advance`] for the month-end rule.
    pub fn compute_next_execution(schedule: &RecurringSchedule) -> DateTime<Utc> {
        let base = schedule.last_execution.unwrap_or(schedule.start_date);
        schedule
            .frequency
            .advance(base, schedule.frequency_interval)
    }

    /// Validates and persists a new schedule with its first occurrence
    /// computed.
    pub fn create_schedule(&self, mut schedule: RecurringSchedule) -> Result<RecurringSchedule> {
        validate_terms(schedule.amount, schedule.frequency_interval)?;
        schedule.next_execution = Some(Self::compute_next_execution(&schedule));
        self.store.save_schedule(&schedule)?;
        Ok(schedule)
    }

    /// Applies term edits. Execution dates are untouched; the next sweep picks
    /// the new terms up naturally.
    pub fn update_schedule(
        &self,
        schedule_id: Uuid,
        patch: SchedulePatch,
    ) -> Result<RecurringSchedule> {
        let mut schedule = self.store.schedule(schedule_id)?;

        if let Some(title) = patch.title {
            schedule.title = title;
        }
        if let Some(description) = patch.description {
            schedule.description = Some(description);
        }
        if let Some(amount) = patch.amount {
            schedule.amount = amount;
        }
        if let Some(kind) = patch.kind {
            schedule.kind = kind;
        }
        if let Some(category) = patch.category {
            schedule.category = category;
        }
        if let Some(frequency) = patch.frequency {
            schedule.frequency = frequency;
        }
        if let Some(interval) = patch.frequency_interval {
            schedule.frequency_interval = interval;
        }
        if let Some(end_date) = patch.end_date {
            schedule.end_date = end_date;
        }
        if let Some(enabled) = patch.notification_enabled {
            schedule.notification_enabled = enabled;
        }
        if let Some(lead) = patch.notification_lead_days {
            schedule.notification_lead_days = lead;
        }
        validate_terms(schedule.amount, schedule.frequency_interval)?;

        self.store.save_schedule(&schedule)?;
        Ok(schedule)
    }

    /// Materializes every active schedule due at `now` into a concrete
    /// transaction, advances its execution dates, and deactivates it when the
    /// end date precedes the newly computed occurrence.
    ///
    /// Intended to be driven daily by an external trigger. Idempotent: a
    /// schedule advanced past `now` is not due again.
    pub fn materialize_due(&self, now: DateTime<Utc>) -> Result<Vec<Transaction>> {
        let due = self
            .store
            .schedules_where(&|s| s.active && s.next_execution.is_some_and(|next| next <= now))?;

        let mut materialized = Vec::new();
        for mut schedule in due {
            let mut transaction = Transaction::new(
                schedule.user_id,
                schedule.amount,
                schedule.title.clone(),
                schedule.kind,
                schedule.category,
                now,
            );
            transaction.recurring = true;
            transaction.recurrence = Some(schedule.frequency);

            if let Err(err) = self.store.save_transaction(&transaction) {
                warn!(schedule = %schedule.id, %err, "failed to materialize occurrence");
                continue;
            }

            schedule.last_execution = Some(now);
            let next = Self::compute_next_execution(&schedule);
            schedule.next_execution = Some(next);
            if schedule.end_date.is_some_and(|end| end < next) {
                schedule.active = false;
            }

            match self.store.save_schedule(&schedule) {
                Ok(()) => materialized.push(transaction),
                Err(err) => {
                    warn!(schedule = %schedule.id, %err, "failed to advance schedule");
                }
            }
        }
        Ok(materialized)
    }

    /// Emits one upcoming-occurrence event per active, notification-enabled
    /// schedule whose lead window has opened. Each occurrence is announced at
    /// most once.
    pub fn notify_upcoming(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let enabled = self
            .store
            .schedules_where(&|s| s.active && s.notification_enabled)?;

        let mut report = SweepReport::default();
        for mut schedule in enabled {
            let (Some(lead_days), Some(next)) =
                (schedule.notification_lead_days, schedule.next_execution)
            else {
                continue;
            };
            let notification_date = next - Duration::days(lead_days as i64);
            if now < notification_date || schedule.last_notified_execution == Some(next) {
                continue;
            }

            schedule.last_notified_execution = Some(next);
            match self.store.save_schedule(&schedule) {
                Ok(()) => {
                    self.notifier.notify(NotificationEvent {
                        kind: NotificationKind::UpcomingRecurrence,
                        user_id: schedule.user_id,
                        entity_id: schedule.id,
                        amount: schedule.amount,
                        due_date: next,
                    });
                    report.record_success();
                }
                Err(err) => {
                    warn!(schedule = %schedule.id, %err, "failed to mark upcoming notification");
                    report.record_failure();
                }
            }
        }
        Ok(report)
    }

    pub fn user_schedules(&self, user_id: Uuid) -> Result<Vec<RecurringSchedule>> {
        self.store.schedules_where(&|s| s.user_id == user_id)
    }
}

fn validate_terms(amount: Decimal, interval: u32) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::InvalidArgument(format!(
            "schedule amount must be positive, got {amount}"
        )));
    }
    if interval == 0 {
        return Err(CoreError::InvalidArgument(
            "frequency interval must be at least 1".into(),
        ));
    }
    Ok(())
}
