use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// An event the core has decided is due. Delivery (email/SMS/push) is the
/// collaborator's concern; the core never blocks on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    /// The user the notification targets.
    pub user_id: Uuid,
    /// The entity the notification is about.
    pub entity_id: Uuid,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A pending settlement is due soon.
    SettlementReminder,
    /// A recurring schedule will materialize soon.
    UpcomingRecurrence,
    /// A pending invoice is due soon.
    InvoiceReminder,
}

/// Fire-and-forget notification sink.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: NotificationEvent);
}

/// Discards every event. Useful when an embedder has no delivery channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: NotificationEvent) {}
}
