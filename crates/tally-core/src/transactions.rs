//! Personal transaction create/update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use tally_domain::{Frequency, Transaction, TransactionCategory};

use crate::error::{CoreError, Result};
use crate::store::LedgerStore;

/// Field-limited patch for [`TransactionService::update`]. Absent fields are
/// left untouched.
#[derive(Debug, Default, Clone)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub category: Option<TransactionCategory>,
    pub date: Option<DateTime<Utc>>,
    /// Applied only while the transaction is flagged recurring.
    pub recurrence: Option<Frequency>,
    pub next_recurrence: Option<DateTime<Utc>>,
}

pub struct TransactionService {
    store: Arc<dyn LedgerStore>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Persists a personal transaction. Group-scoped transactions enter
    /// through the settlement engine instead, so that their settlements are
    /// derived in the same unit of work.
    pub fn create(&self, transaction: Transaction) -> Result<Transaction> {
        if transaction.group_id.is_some() {
            return Err(CoreError::InvalidArgument(
                "group transactions enter through the settlement engine".into(),
            ));
        }
        if transaction.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "transaction amount must be positive, got {}",
                transaction.amount
            )));
        }
        self.store.save_transaction(&transaction)?;
        Ok(transaction)
    }

    /// Updates the mutable fields only: description, category, date, and the
    /// recurrence fields while the transaction is recurring. Amount, owner,
    /// type, and references stay fixed once settlements may point at the
    /// transaction.
    pub fn update(&self, transaction_id: Uuid, patch: TransactionPatch) -> Result<Transaction> {
        let mut transaction = self.store.transaction(transaction_id)?;

        if let Some(description) = patch.description {
            transaction.description = description;
        }
        if let Some(category) = patch.category {
            transaction.category = category;
        }
        if let Some(date) = patch.date {
            transaction.date = date;
        }
        if transaction.recurring {
            if let Some(recurrence) = patch.recurrence {
                transaction.recurrence = Some(recurrence);
            }
            if let Some(next) = patch.next_recurrence {
                transaction.next_recurrence = Some(next);
            }
        }

        self.store.save_transaction(&transaction)?;
        Ok(transaction)
    }

    pub fn user_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        self.store.transactions_where(&|t| t.user_id == user_id)
    }
}
