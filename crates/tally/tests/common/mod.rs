//! Shared fixture for the engine integration suites: in-memory store, manual
//! clock, and a recording notification sink.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use tally_core::{
    GroupService, InvestmentEngine, InvoiceEngine, LoanEngine, ManualClock, NotificationEvent,
    NotificationSink, RecurringScheduler, SettlementEngine, TransactionService,
};
use tally_domain::Group;
use tally_storage_memory::MemoryStore;

/// Captures every emitted event for assertions.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("sink lock poisoned").clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: NotificationEvent) {
        self.events.lock().expect("sink lock poisoned").push(event);
    }
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingSink>,
    pub settlements: SettlementEngine,
    pub transactions: TransactionService,
    pub scheduler: RecurringScheduler,
    pub loans: LoanEngine,
    pub invoices: InvoiceEngine,
    pub investments: InvestmentEngine,
    pub groups: GroupService,
}

impl Fixture {
    pub fn at(start: DateTime<Utc>) -> Self {
        init_tracing();
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start));
        let sink = Arc::new(RecordingSink::default());

        Self {
            settlements: SettlementEngine::new(store.clone(), clock.clone(), sink.clone()),
            transactions: TransactionService::new(store.clone()),
            scheduler: RecurringScheduler::new(store.clone(), sink.clone()),
            loans: LoanEngine::new(store.clone(), clock.clone()),
            invoices: InvoiceEngine::new(store.clone(), clock.clone(), sink.clone()),
            investments: InvestmentEngine::new(store.clone(), clock.clone()),
            groups: GroupService::new(store.clone()),
            store,
            clock,
            sink,
        }
    }

    pub fn new() -> Self {
        Self::at(datetime(2024, 1, 1, 12, 0))
    }

    /// Creates and persists a group of `extra + 1` members (creator first).
    pub fn group_of(&self, extra: usize) -> (Group, Vec<Uuid>) {
        let creator = Uuid::new_v4();
        let others: Vec<Uuid> = (0..extra).map(|_| Uuid::new_v4()).collect();
        let group = self
            .groups
            .create(Group::new("Trip", creator).with_members(others.clone()))
            .expect("create group");
        let mut members: Vec<Uuid> = group.members.iter().copied().collect();
        members.sort();
        (group, members)
    }
}

pub fn datetime(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, hh, mm, 0).unwrap()
}

/// Surfaces the engines' sweep warnings when a test run sets RUST_LOG.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
