//! In-memory implementation of the tally store, for tests and embedders that
//! do not need durable persistence.
//!
//! Every trait method takes one lock over the backing maps, which gives each
//! call the atomicity and per-row isolation the store contract asks for.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use tally_core::error::Result;
use tally_core::{CoreError, LedgerStore};
use tally_domain::{
    Group, Investment, Invoice, Loan, RecurringSchedule, Settlement, Transaction,
};

#[derive(Default)]
struct Tables {
    transactions: HashMap<Uuid, Transaction>,
    settlements: HashMap<Uuid, Settlement>,
    loans: HashMap<Uuid, Loan>,
    schedules: HashMap<Uuid, RecurringSchedule>,
    invoices: HashMap<Uuid, Invoice>,
    investments: HashMap<Uuid, Investment>,
    groups: HashMap<Uuid, Group>,
}

/// Lock-guarded map-per-family store.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

macro_rules! read_tables {
    ($self:ident) => {
        $self
            .tables
            .read()
            .map_err(|_| CoreError::Storage("store lock poisoned".into()))?
    };
}

macro_rules! write_tables {
    ($self:ident) => {
        $self
            .tables
            .write()
            .map_err(|_| CoreError::Storage("store lock poisoned".into()))?
    };
}

impl LedgerStore for MemoryStore {
    fn transaction(&self, id: Uuid) -> Result<Transaction> {
        read_tables!(self)
            .transactions
            .get(&id)
            .cloned()
            .ok_or(CoreError::TransactionNotFound(id))
    }

    fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        write_tables!(self)
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    fn transactions_where(&self, pred: &dyn Fn(&Transaction) -> bool) -> Result<Vec<Transaction>> {
        Ok(read_tables!(self)
            .transactions
            .values()
            .filter(|t| pred(t))
            .cloned()
            .collect())
    }

    fn settlement(&self, id: Uuid) -> Result<Settlement> {
        read_tables!(self)
            .settlements
            .get(&id)
            .cloned()
            .ok_or(CoreError::SettlementNotFound(id))
    }

    fn save_settlement(&self, settlement: &Settlement) -> Result<()> {
        write_tables!(self)
            .settlements
            .insert(settlement.id, settlement.clone());
        Ok(())
    }

    fn settlements_where(&self, pred: &dyn Fn(&Settlement) -> bool) -> Result<Vec<Settlement>> {
        Ok(read_tables!(self)
            .settlements
            .values()
            .filter(|s| pred(s))
            .cloned()
            .collect())
    }

    fn loan(&self, id: Uuid) -> Result<Loan> {
        read_tables!(self)
            .loans
            .get(&id)
            .cloned()
            .ok_or(CoreError::LoanNotFound(id))
    }

    fn save_loan(&self, loan: &Loan) -> Result<()> {
        write_tables!(self).loans.insert(loan.id, loan.clone());
        Ok(())
    }

    fn loans_where(&self, pred: &dyn Fn(&Loan) -> bool) -> Result<Vec<Loan>> {
        Ok(read_tables!(self)
            .loans
            .values()
            .filter(|l| pred(l))
            .cloned()
            .collect())
    }

    fn schedule(&self, id: Uuid) -> Result<RecurringSchedule> {
        read_tables!(self)
            .schedules
            .get(&id)
            .cloned()
            .ok_or(CoreError::ScheduleNotFound(id))
    }

    fn save_schedule(&self, schedule: &RecurringSchedule) -> Result<()> {
        write_tables!(self)
            .schedules
            .insert(schedule.id, schedule.clone());
        Ok(())
    }

    fn schedules_where(
        &self,
        pred: &dyn Fn(&RecurringSchedule) -> bool,
    ) -> Result<Vec<RecurringSchedule>> {
        Ok(read_tables!(self)
            .schedules
            .values()
            .filter(|s| pred(s))
            .cloned()
            .collect())
    }

    fn invoice(&self, id: Uuid) -> Result<Invoice> {
        read_tables!(self)
            .invoices
            .get(&id)
            .cloned()
            .ok_or(CoreError::InvoiceNotFound(id))
    }

    fn save_invoice(&self, invoice: &Invoice) -> Result<()> {
        write_tables!(self)
            .invoices
            .insert(invoice.id, invoice.clone());
        Ok(())
    }

    fn invoices_where(&self, pred: &dyn Fn(&Invoice) -> bool) -> Result<Vec<Invoice>> {
        Ok(read_tables!(self)
            .invoices
            .values()
            .filter(|i| pred(i))
            .cloned()
            .collect())
    }

    fn investment(&self, id: Uuid) -> Result<Investment> {
        read_tables!(self)
            .investments
            .get(&id)
            .cloned()
            .ok_or(CoreError::InvestmentNotFound(id))
    }

    fn save_investment(&self, investment: &Investment) -> Result<()> {
        write_tables!(self)
            .investments
            .insert(investment.id, investment.clone());
        Ok(())
    }

    fn investments_where(&self, pred: &dyn Fn(&Investment) -> bool) -> Result<Vec<Investment>> {
        Ok(read_tables!(self)
            .investments
            .values()
            .filter(|i| pred(i))
            .cloned()
            .collect())
    }

    fn group(&self, id: Uuid) -> Result<Group> {
        read_tables!(self)
            .groups
            .get(&id)
            .cloned()
            .ok_or(CoreError::GroupNotFound(id))
    }

    fn save_group(&self, group: &Group) -> Result<()> {
        write_tables!(self).groups.insert(group.id, group.clone());
        Ok(())
    }
}
