//! tally
//!
//! Umbrella crate for the tally ledger/settlement core. Re-exports the domain
//! models, the engines with their collaborator traits, and the in-memory
//! store, so embedders depend on one crate.

pub use tally_core::investments::InvestmentPatch;
pub use tally_core::invoices::InvoicePatch;
pub use tally_core::recurring::SchedulePatch;
pub use tally_core::transactions::TransactionPatch;
pub use tally_core::{
    compute_shares, Clock, CoreError, GroupService, InvestmentEngine, InvoiceEngine, LedgerStore,
    LoanEngine, ManualClock, NotificationEvent, NotificationKind, NotificationSink, NullSink,
    RecurringScheduler, SettlementEngine, SweepReport, SystemClock, TransactionService,
};
pub use tally_domain as domain;
pub use tally_storage_memory::MemoryStore;
