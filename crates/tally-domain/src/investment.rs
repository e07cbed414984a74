//! User investments and their valuation snapshots.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub invested_amount: Decimal,
    pub current_value: Decimal,
    pub return_amount: Decimal,
    /// Percentage of `invested_amount`, rounded to two decimals.
    pub return_percentage: Decimal,
    pub kind: InvestmentKind,
    pub status: InvestmentStatus,
    pub investment_date: DateTime<Utc>,
    pub maturity_date: Option<DateTime<Utc>>,
    pub last_valuation_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub risk_level: Option<String>,
}

impl Investment {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        invested_amount: Decimal,
        kind: InvestmentKind,
        investment_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            invested_amount,
            current_value: invested_amount,
            return_amount: Decimal::ZERO,
            return_percentage: Decimal::ZERO,
            kind,
            status: InvestmentStatus::Active,
            investment_date,
            maturity_date: None,
            last_valuation_date: None,
            description: None,
            risk_level: None,
        }
    }

    pub fn with_maturity_date(mut self, maturity_date: DateTime<Utc>) -> Self {
        self.maturity_date = Some(maturity_date);
        self
    }
}

impl Identifiable for Investment {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvestmentKind {
    Stocks,
    Bonds,
    MutualFunds,
    RealEstate,
    Cryptocurrency,
    FixedDeposit,
    Other,
}

impl fmt::Display for InvestmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvestmentKind::Stocks => "Stocks",
            InvestmentKind::Bonds => "Bonds",
            InvestmentKind::MutualFunds => "Mutual Funds",
            InvestmentKind::RealEstate => "Real Estate",
            InvestmentKind::Cryptocurrency => "Cryptocurrency",
            InvestmentKind::FixedDeposit => "Fixed Deposit",
            InvestmentKind::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvestmentStatus {
    Active,
    Sold,
    Matured,
    Cancelled,
}

impl InvestmentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, InvestmentStatus::Active)
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvestmentStatus::Active => "Active",
            InvestmentStatus::Sold => "Sold",
            InvestmentStatus::Matured => "Matured",
            InvestmentStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}
