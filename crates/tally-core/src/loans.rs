//! Loan engine: approval, disbursement, payment application, payoff, and
//! default aging.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use tally_domain::{Loan, LoanStatus, Transaction, TransactionCategory, TransactionKind};

use crate::error::{CoreError, Result};
use crate::store::LedgerStore;
use crate::sweep::SweepReport;
use crate::time::Clock;

pub struct LoanEngine {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
}

impl LoanEngine {
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Persists a new loan in PENDING with the remaining amount reset to the
    /// principal.
    pub fn create(&self, mut loan: Loan) -> Result<Loan> {
        if loan.principal_amount <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "loan principal must be positive, got {}",
                loan.principal_amount
            )));
        }
        if loan.borrower_id == loan.lender_id {
            return Err(CoreError::InvalidArgument(
                "borrower and lender must differ".into(),
            ));
        }
        loan.remaining_amount = loan.principal_amount;
        loan.status = LoanStatus::Pending;
        loan.payment_ids.clear();
        self.store.save_loan(&loan)?;
        Ok(loan)
    }

    /// PENDING -> ACTIVE, emitting the disbursement transaction to the
    /// borrower.
    pub fn approve(&self, loan_id: Uuid) -> Result<Loan> {
        let mut loan = self.store.loan(loan_id)?;
        if loan.status != LoanStatus::Pending {
            return Err(CoreError::InvalidLoanState(format!(
                "loan {} is {}, expected Pending",
                loan.id, loan.status
            )));
        }

        loan.status = LoanStatus::Active;

        let disbursement = Transaction::new(
            loan.borrower_id,
            loan.principal_amount,
            "Loan disbursement",
            TransactionKind::Loan,
            TransactionCategory::Other,
            self.clock.now(),
        )
        .with_loan(loan.id);
        self.store.save_transaction(&disbursement)?;
        self.store.save_loan(&loan)?;
        Ok(loan)
    }

    /// Applies a payment to an ACTIVE loan, emitting the payment transaction.
    /// Crossing zero clamps the remaining amount to zero and completes the
    /// loan; further payments are rejected as a state error.
    pub fn record_payment(&self, loan_id: Uuid, amount: Decimal) -> Result<Loan> {
        let mut loan = self.store.loan(loan_id)?;
        if loan.status != LoanStatus::Active {
            return Err(CoreError::InvalidLoanState(format!(
                "loan {} is {}, expected Active",
                loan.id, loan.status
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "payment amount must be positive, got {amount}"
            )));
        }

        let payment = Transaction::new(
            loan.borrower_id,
            amount,
            "Loan payment",
            TransactionKind::LoanPayment,
            TransactionCategory::LoanPayment,
            self.clock.now(),
        )
        .with_loan(loan.id);
        self.store.save_transaction(&payment)?;

        loan.payment_ids.push(payment.id);
        loan.remaining_amount -= amount;
        if loan.remaining_amount <= Decimal::ZERO {
            loan.remaining_amount = Decimal::ZERO;
            loan.status = LoanStatus::Completed;
        }
        self.store.save_loan(&loan)?;
        Ok(loan)
    }

    /// Externally-triggered PENDING/ACTIVE -> CANCELLED transition.
    pub fn cancel(&self, loan_id: Uuid) -> Result<Loan> {
        let mut loan = self.store.loan(loan_id)?;
        if !matches!(loan.status, LoanStatus::Pending | LoanStatus::Active) {
            return Err(CoreError::InvalidLoanState(format!(
                "loan {} is {}, expected Pending or Active",
                loan.id, loan.status
            )));
        }
        loan.status = LoanStatus::Cancelled;
        self.store.save_loan(&loan)?;
        Ok(loan)
    }

    /// Moves ACTIVE loans past their due date to DEFAULTED. Terminal loans
    /// are never re-examined. Intended to be driven daily.
    pub fn age_loans(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let overdue = self
            .store
            .loans_where(&|l| l.status == LoanStatus::Active && l.due_date < now)?;

        let mut report = SweepReport::default();
        for mut loan in overdue {
            loan.status = LoanStatus::Defaulted;
            match self.store.save_loan(&loan) {
                Ok(()) => report.record_success(),
                Err(err) => {
                    warn!(loan = %loan.id, %err, "failed to default loan");
                    report.record_failure();
                }
            }
        }
        Ok(report)
    }

    /// Loans a user participates in, as borrower or lender.
    pub fn user_loans(&self, user_id: Uuid) -> Result<Vec<Loan>> {
        self.store
            .loans_where(&|l| l.borrower_id == user_id || l.lender_id == user_id)
    }

    /// ACTIVE loans falling due inside the window.
    pub fn upcoming_payments(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Loan>> {
        self.store.loans_where(&|l| {
            l.status == LoanStatus::Active && l.due_date >= start && l.due_date <= end
        })
    }
}
