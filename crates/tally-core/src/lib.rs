//! tally-core
//!
//! Engines and services for the tally ledger: splitting, settlements,
//! recurring schedules, loans, invoices, investments, and group membership.
//! Depends on tally-domain. Persistence, the clock, and notification delivery
//! are collaborator traits consumed here and implemented elsewhere.
//!
//! Every public operation executes as one atomic unit of work against the
//! store; the reconciliation sweeps are idempotent and safe to re-run.

pub mod error;
pub mod groups;
pub mod investments;
pub mod invoices;
pub mod loans;
pub mod notify;
pub mod recurring;
pub mod settlement;
pub mod split;
pub mod store;
pub mod sweep;
pub mod time;
pub mod transactions;

pub use error::CoreError;
pub use groups::GroupService;
pub use investments::InvestmentEngine;
pub use invoices::InvoiceEngine;
pub use loans::LoanEngine;
pub use notify::{NotificationEvent, NotificationKind, NotificationSink, NullSink};
pub use recurring::RecurringScheduler;
pub use settlement::SettlementEngine;
pub use split::compute_shares;
pub use store::LedgerStore;
pub use sweep::SweepReport;
pub use time::{Clock, ManualClock, SystemClock};
pub use transactions::TransactionService;
