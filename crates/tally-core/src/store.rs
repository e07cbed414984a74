use uuid::Uuid;

use tally_domain::{Group, Investment, Invoice, Loan, RecurringSchedule, Settlement, Transaction};

use crate::error::Result;

/// Abstraction over persistence backends for the ledger entity families.
///
/// Each method is one atomic unit of work: it either commits fully or not at
/// all, and implementations must provide at least per-row update isolation so
/// that the engines' read-then-write sequences do not race (one database
/// transaction per call, or a lock over the backing maps).
///
/// Query methods take a predicate and return matching snapshots; the filtering
/// rules themselves (due, overdue, pending) stay in the engines.
pub trait LedgerStore: Send + Sync {
    fn transaction(&self, id: Uuid) -> Result<Transaction>;
    fn save_transaction(&self, transaction: &Transaction) -> Result<()>;
    fn transactions_where(&self, pred: &dyn Fn(&Transaction) -> bool) -> Result<Vec<Transaction>>;

    fn settlement(&self, id: Uuid) -> Result<Settlement>;
    fn save_settlement(&self, settlement: &Settlement) -> Result<()>;
    fn settlements_where(&self, pred: &dyn Fn(&Settlement) -> bool) -> Result<Vec<Settlement>>;

    fn loan(&self, id: Uuid) -> Result<Loan>;
    fn save_loan(&self, loan: &Loan) -> Result<()>;
    fn loans_where(&self, pred: &dyn Fn(&Loan) -> bool) -> Result<Vec<Loan>>;

    fn schedule(&self, id: Uuid) -> Result<RecurringSchedule>;
    fn save_schedule(&self, schedule: &RecurringSchedule) -> Result<()>;
    fn schedules_where(
        &self,
        pred: &dyn Fn(&RecurringSchedule) -> bool,
    ) -> Result<Vec<RecurringSchedule>>;

    fn invoice(&self, id: Uuid) -> Result<Invoice>;
    fn save_invoice(&self, invoice: &Invoice) -> Result<()>;
    fn invoices_where(&self, pred: &dyn Fn(&Invoice) -> bool) -> Result<Vec<Invoice>>;

    fn investment(&self, id: Uuid) -> Result<Investment>;
    fn save_investment(&self, investment: &Investment) -> Result<()>;
    fn investments_where(&self, pred: &dyn Fn(&Investment) -> bool) -> Result<Vec<Investment>>;

    /// Resolves a group with its member list.
    fn group(&self, id: Uuid) -> Result<Group>;
    fn save_group(&self, group: &Group) -> Result<()>;
}
