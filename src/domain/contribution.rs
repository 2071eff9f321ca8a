//! Signed ledger entries against savings goals and investment positions.
//!
//! Positive amounts are deposits/contributions, negative amounts withdrawals.
//! Goal and investment balances themselves are owned elsewhere; these rows only
//! feed period totals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::amount::deserialize_amount;
use crate::domain::common::LedgerRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalContribution {
    pub id: Uuid,
    pub goal_id: Uuid,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GoalContribution {
    pub fn new(goal_id: Uuid, amount: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            amount,
            note: None,
            created_at,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_deposit(&self) -> bool {
        self.amount > 0.0
    }
}

impl LedgerRow for GoalContribution {
    /// Buckets by the calendar day of `created_at`; time of day is ignored.
    fn ledger_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestmentContribution {
    pub id: Uuid,
    pub investment_id: Uuid,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub contribution_date: NaiveDate,
}

impl InvestmentContribution {
    pub fn new(investment_id: Uuid, amount: f64, contribution_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            investment_id,
            amount,
            note: None,
            contribution_date,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl LedgerRow for InvestmentContribution {
    fn ledger_date(&self) -> NaiveDate {
        self.contribution_date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}
