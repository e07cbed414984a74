//! Settlement engine: turns group transactions into obligations, nets group
//! balances, and ages/reminds pending settlements.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use tally_domain::{Settlement, SettlementStatus, Transaction, TransactionKind};

use crate::error::{CoreError, Result};
use crate::notify::{NotificationEvent, NotificationKind, NotificationSink};
use crate::split::compute_shares;
use crate::store::LedgerStore;
use crate::sweep::SweepReport;
use crate::time::Clock;

/// Days between a group expense and its settlements' due date.
const SETTLEMENT_DUE_DAYS: i64 = 7;

pub struct SettlementEngine {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn NotificationSink>,
}

impl SettlementEngine {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            clock,
            notifier,
        }
    }

    /// Records a bill-split expense: persists the transaction and creates one
    /// PENDING settlement per non-payer member with a positive share, due
    /// seven days after the expense date.
    ///
    /// The transaction type is normalized to [`TransactionKind::BillSplit`].
    /// Fails with `InvalidArgument` when no group is referenced and
    /// `GroupNotFound` when the group cannot be resolved.
    pub fn record_group_expense(
        &self,
        mut transaction: Transaction,
        weights: Option<&HashMap<Uuid, Decimal>>,
    ) -> Result<Transaction> {
        let group_id = transaction.group_id.ok_or_else(|| {
            CoreError::InvalidArgument("group must be specified for a group expense".into())
        })?;
        if transaction.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "transaction amount must be positive, got {}",
                transaction.amount
            )));
        }

        transaction.kind = TransactionKind::BillSplit;
        self.store.save_transaction(&transaction)?;

        let group = self.store.group(group_id)?;
        self.create_settlements(&transaction, &group.members, weights)?;
        Ok(transaction)
    }

    /// Lighter path for a transaction that merely carries a group reference:
    /// persists it and splits it equally among all members, without custom
    /// weighting.
    pub fn record_group_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        let group_id = transaction.group_id.ok_or_else(|| {
            CoreError::InvalidArgument("group must be specified for a group transaction".into())
        })?;
        if transaction.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "transaction amount must be positive, got {}",
                transaction.amount
            )));
        }

        self.store.save_transaction(&transaction)?;
        let group = self.store.group(group_id)?;
        self.create_settlements(&transaction, &group.members, None)?;
        Ok(transaction)
    }

    fn create_settlements(
        &self,
        expense: &Transaction,
        members: &BTreeSet<Uuid>,
        weights: Option<&HashMap<Uuid, Decimal>>,
    ) -> Result<()> {
        let payer = expense.user_id;
        let due_date = expense.date + Duration::days(SETTLEMENT_DUE_DAYS);
        let shares = compute_shares(expense.amount, members, weights)?;

        for (member, share) in shares {
            if member != payer && share > Decimal::ZERO {
                let settlement = Settlement::new(expense.id, member, payer, share, due_date);
                self.store.save_settlement(&settlement)?;
            }
        }
        Ok(())
    }

    /// Nets PENDING settlements across the group's bill-split transactions.
    ///
    /// A positive balance means the user owes; a negative balance means the
    /// user is owed. Balances sum to zero across the group.
    pub fn group_balances(&self, group_id: Uuid) -> Result<BTreeMap<Uuid, Decimal>> {
        let expenses = self.store.transactions_where(&|t| {
            t.group_id == Some(group_id) && t.kind == TransactionKind::BillSplit
        })?;
        let expense_ids: HashSet<Uuid> = expenses.iter().map(|t| t.id).collect();

        let pending = self.store.settlements_where(&|s| {
            s.status == SettlementStatus::Pending && expense_ids.contains(&s.transaction_id)
        })?;

        let mut balances: BTreeMap<Uuid, Decimal> = BTreeMap::new();
        for settlement in pending {
            *balances.entry(settlement.payer_id).or_insert(Decimal::ZERO) += settlement.amount;
            *balances.entry(settlement.payee_id).or_insert(Decimal::ZERO) -= settlement.amount;
        }
        Ok(balances)
    }

    /// Moves PENDING settlements past their due date to OVERDUE. One-way and
    /// idempotent; intended to be driven hourly by an external trigger.
    pub fn age_overdue(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let due = self
            .store
            .settlements_where(&|s| s.status == SettlementStatus::Pending && s.due_date < now)?;

        let mut report = SweepReport::default();
        for mut settlement in due {
            settlement.status = SettlementStatus::Overdue;
            match self.store.save_settlement(&settlement) {
                Ok(()) => report.record_success(),
                Err(err) => {
                    warn!(settlement = %settlement.id, %err, "failed to age settlement");
                    report.record_failure();
                }
            }
        }
        Ok(report)
    }

    /// Marks the transaction settled, but only when no settlement referencing
    /// it remains PENDING. Otherwise a silent no-op (returns `false`); a later
    /// sweep tick simply retries.
    pub fn mark_transaction_settled(&self, transaction_id: Uuid) -> Result<bool> {
        let mut transaction = self.store.transaction(transaction_id)?;
        let pending = self.store.settlements_where(&|s| {
            s.transaction_id == transaction_id && s.status == SettlementStatus::Pending
        })?;
        if !pending.is_empty() {
            return Ok(false);
        }
        if !transaction.settled {
            transaction.settled = true;
            self.store.save_transaction(&transaction)?;
        }
        Ok(true)
    }

    /// Marks PENDING, not-yet-reminded settlements due within `lead_days` and
    /// emits one reminder event per settlement to the payer.
    pub fn reminder_sweep(&self, now: DateTime<Utc>, lead_days: u32) -> Result<SweepReport> {
        let horizon = now + Duration::days(lead_days as i64);
        let upcoming = self.store.settlements_where(&|s| {
            s.status == SettlementStatus::Pending && !s.reminder_sent && s.due_date <= horizon
        })?;

        let mut report = SweepReport::default();
        for mut settlement in upcoming {
            settlement.reminder_sent = true;
            match self.store.save_settlement(&settlement) {
                Ok(()) => {
                    self.notifier.notify(NotificationEvent {
                        kind: NotificationKind::SettlementReminder,
                        user_id: settlement.payer_id,
                        entity_id: settlement.id,
                        amount: settlement.amount,
                        due_date: settlement.due_date,
                    });
                    report.record_success();
                }
                Err(err) => {
                    warn!(settlement = %settlement.id, %err, "failed to mark reminder");
                    report.record_failure();
                }
            }
        }
        Ok(report)
    }

    /// Applies a status transition. Transitions are monotonic: COMPLETED and
    /// CANCELLED are terminal, and a settlement never returns to PENDING.
    /// Reaching a terminal status re-checks the owning transaction's settled
    /// flag.
    pub fn update_status(
        &self,
        settlement_id: Uuid,
        status: SettlementStatus,
        payment_method: Option<String>,
        payment_reference: Option<String>,
    ) -> Result<Settlement> {
        let mut settlement = self.store.settlement(settlement_id)?;
        if settlement.status == status {
            return Ok(settlement);
        }
        if settlement.status.is_terminal() {
            return Err(CoreError::IllegalState(format!(
                "settlement {} is already {}",
                settlement.id, settlement.status
            )));
        }
        if status == SettlementStatus::Pending {
            return Err(CoreError::IllegalState(
                "a settlement cannot return to pending".into(),
            ));
        }

        settlement.status = status;
        if payment_method.is_some() {
            settlement.payment_method = payment_method;
        }
        if payment_reference.is_some() {
            settlement.payment_reference = payment_reference;
        }
        if status == SettlementStatus::Completed {
            settlement.settlement_date = Some(self.clock.now());
        }
        self.store.save_settlement(&settlement)?;

        if status.is_terminal() {
            self.mark_transaction_settled(settlement.transaction_id)?;
        }
        Ok(settlement)
    }

    /// All settlements referencing one transaction.
    pub fn settlements_for_transaction(&self, transaction_id: Uuid) -> Result<Vec<Settlement>> {
        self.store
            .settlements_where(&|s| s.transaction_id == transaction_id)
    }

    /// All settlements a user participates in, as payer or payee.
    pub fn user_settlements(&self, user_id: Uuid) -> Result<Vec<Settlement>> {
        self.store
            .settlements_where(&|s| s.payer_id == user_id || s.payee_id == user_id)
    }
}
