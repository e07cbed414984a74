//! Investment valuation and maturity aging.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use tally_domain::{money, Investment, InvestmentKind, InvestmentStatus};

use crate::error::{CoreError, Result};
use crate::store::LedgerStore;
use crate::sweep::SweepReport;
use crate::time::Clock;

/// Edits for [`InvestmentEngine::update`]. Absent fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct InvestmentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<InvestmentKind>,
    pub risk_level: Option<String>,
    pub maturity_date: Option<DateTime<Utc>>,
}

pub struct InvestmentEngine {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
}

impl InvestmentEngine {
    pub fn new(store: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Persists a new ACTIVE investment valued at its invested amount.
    pub fn create(&self, mut investment: Investment) -> Result<Investment> {
        if investment.invested_amount <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "invested amount must be positive, got {}",
                investment.invested_amount
            )));
        }
        investment.current_value = investment.invested_amount;
        investment.return_amount = Decimal::ZERO;
        investment.return_percentage = Decimal::ZERO;
        investment.status = InvestmentStatus::Active;
        investment.last_valuation_date = Some(self.clock.now());
        self.store.save_investment(&investment)?;
        Ok(investment)
    }

    pub fn update(&self, investment_id: Uuid, patch: InvestmentPatch) -> Result<Investment> {
        let mut investment = self.store.investment(investment_id)?;

        if let Some(name) = patch.name {
            investment.name = name;
        }
        if let Some(description) = patch.description {
            investment.description = Some(description);
        }
        if let Some(kind) = patch.kind {
            investment.kind = kind;
        }
        if let Some(risk) = patch.risk_level {
            investment.risk_level = Some(risk);
        }
        if let Some(maturity) = patch.maturity_date {
            investment.maturity_date = Some(maturity);
        }

        self.store.save_investment(&investment)?;
        Ok(investment)
    }

    /// Records a valuation snapshot for an ACTIVE investment, recomputing the
    /// return amount and the half-up-rounded return percentage.
    pub fn update_valuation(
        &self,
        investment_id: Uuid,
        current_value: Decimal,
    ) -> Result<Investment> {
        let mut investment = self.store.investment(investment_id)?;
        if investment.status != InvestmentStatus::Active {
            return Err(CoreError::IllegalState(format!(
                "investment {} is {}, expected Active",
                investment.id, investment.status
            )));
        }

        investment.current_value = current_value;
        investment.return_amount = current_value - investment.invested_amount;
        investment.return_percentage = money::round(
            investment.return_amount * Decimal::from(100) / investment.invested_amount,
        );
        investment.last_valuation_date = Some(self.clock.now());
        self.store.save_investment(&investment)?;
        Ok(investment)
    }

    /// Moves ACTIVE investments past their maturity date to MATURED.
    /// Intended to be driven daily.
    pub fn mature_investments(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let matured = self.store.investments_where(&|i| {
            i.status == InvestmentStatus::Active && i.maturity_date.is_some_and(|m| m < now)
        })?;

        let mut report = SweepReport::default();
        for mut investment in matured {
            investment.status = InvestmentStatus::Matured;
            match self.store.save_investment(&investment) {
                Ok(()) => report.record_success(),
                Err(err) => {
                    warn!(investment = %investment.id, %err, "failed to mature investment");
                    report.record_failure();
                }
            }
        }
        Ok(report)
    }

    pub fn user_investments(&self, user_id: Uuid) -> Result<Vec<Investment>> {
        self.store.investments_where(&|i| i.user_id == user_id)
    }
}
