//! Invoice lifecycle: creation, payment, cancellation, overdue aging, and
//! payment reminders.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use tally_domain::{Invoice, InvoiceStatus};

use crate::error::{CoreError, Result};
use crate::notify::{NotificationEvent, NotificationKind, NotificationSink};
use crate::store::LedgerStore;
use crate::sweep::SweepReport;
use crate::time::Clock;

/// Edits for [`InvoiceEngine::update`]. Absent fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct InvoicePatch {
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub payment_terms: Option<String>,
    pub payment_method: Option<String>,
    pub attachment_url: Option<String>,
}

pub struct InvoiceEngine {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn NotificationSink>,
}

impl InvoiceEngine {
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

    /// Persists a new PENDING invoice with the issue date stamped from the
    /// clock. The referenced transaction must exist.
    pub fn create(&self, mut invoice: Invoice) -> Result<Invoice> {
        if invoice.amount <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "invoice amount must be positive, got {}",
                invoice.amount
            )));
        }
        self.store.transaction(invoice.transaction_id)?;

        invoice.issue_date = self.clock.now();
        invoice.status = InvoiceStatus::Pending;
        self.store.save_invoice(&invoice)?;
        Ok(invoice)
    }

    pub fn update(&self, invoice_id: Uuid, patch: InvoicePatch) -> Result<Invoice> {
        let mut invoice = self.store.invoice(invoice_id)?;

        if let Some(description) = patch.description {
            invoice.description = Some(description);
        }
        if let Some(due_date) = patch.due_date {
            invoice.due_date = Some(due_date);
        }
        if let Some(terms) = patch.payment_terms {
            invoice.payment_terms = Some(terms);
        }
        if let Some(method) = patch.payment_method {
            invoice.payment_method = Some(method);
        }
        if let Some(url) = patch.attachment_url {
            invoice.attachment_url = Some(url);
        }

        self.store.save_invoice(&invoice)?;
        Ok(invoice)
    }

    /// PENDING/OVERDUE -> PAID, stamping the payment date.
    pub fn mark_paid(&self, invoice_id: Uuid) -> Result<Invoice> {
        let mut invoice = self.store.invoice(invoice_id)?;
        if invoice.status.is_terminal() {
            return Err(CoreError::IllegalState(format!(
                "invoice {} is already {}",
                invoice.id, invoice.status
            )));
        }
        invoice.status = InvoiceStatus::Paid;
        invoice.payment_date = Some(self.clock.now());
        self.store.save_invoice(&invoice)?;
        Ok(invoice)
    }

    /// PENDING/OVERDUE -> CANCELLED.
    pub fn cancel(&self, invoice_id: Uuid) -> Result<Invoice> {
        let mut invoice = self.store.invoice(invoice_id)?;
        if invoice.status.is_terminal() {
            return Err(CoreError::IllegalState(format!(
                "invoice {} is already {}",
                invoice.id, invoice.status
            )));
        }
        invoice.status = InvoiceStatus::Cancelled;
        self.store.save_invoice(&invoice)?;
        Ok(invoice)
    }

    /// Moves PENDING invoices past their due date to OVERDUE. Idempotent;
    /// intended to be driven daily.
    pub fn age_invoices(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let overdue = self.store.invoices_where(&|i| {
            i.status == InvoiceStatus::Pending && i.due_date.is_some_and(|due| due < now)
        })?;

        let mut report = SweepReport::default();
        for mut invoice in overdue {
            invoice.status = InvoiceStatus::Overdue;
            match self.store.save_invoice(&invoice) {
                Ok(()) => report.record_success(),
                Err(err) => {
                    warn!(invoice = %invoice.id, %err, "failed to age invoice");
                    report.record_failure();
                }
            }
        }
        Ok(report)
    }

    /// Emits one reminder per unreminded open invoice due within `lead_days`,
    /// targeting the owner of the invoiced transaction.
    pub fn reminder_sweep(&self, now: DateTime<Utc>, lead_days: u32) -> Result<SweepReport> {
        let horizon = now + Duration::days(lead_days as i64);
        let upcoming = self.store.invoices_where(&|i| {
            !i.status.is_terminal() && !i.reminder_sent && i.due_date.is_some_and(|d| d <= horizon)
        })?;

        let mut report = SweepReport::default();
        for mut invoice in upcoming {
            let owner = match self.store.transaction(invoice.transaction_id) {
                Ok(transaction) => transaction.user_id,
                Err(err) => {
                    warn!(invoice = %invoice.id, %err, "invoiced transaction unresolved");
                    report.record_failure();
                    continue;
                }
            };

            invoice.reminder_sent = true;
            invoice.last_reminder_date = Some(now);
            match self.store.save_invoice(&invoice) {
                Ok(()) => {
                    self.notifier.notify(NotificationEvent {
                        kind: NotificationKind::InvoiceReminder,
                        user_id: owner,
                        entity_id: invoice.id,
                        amount: invoice.amount,
                        due_date: invoice.due_date.unwrap_or(now),
                    });
                    report.record_success();
                }
                Err(err) => {
                    warn!(invoice = %invoice.id, %err, "failed to mark invoice reminder");
                    report.record_failure();
                }
            }
        }
        Ok(report)
    }

    pub fn invoices_for_transaction(&self, transaction_id: Uuid) -> Result<Vec<Invoice>> {
        self.store
            .invoices_where(&|i| i.transaction_id == transaction_id)
    }
}
