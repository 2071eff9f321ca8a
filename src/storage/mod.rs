pub mod cached;
pub mod json_backend;
pub mod snapshot;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{DateWindow, GoalContribution, InvestmentContribution, Movement, UserId};
use crate::errors::Result;

/// Read access to one user's ledgers.
///
/// Implementations return only rows owned by `user` whose ledger date lies
/// inside `window` (bounds inclusive). Movements come back with their category
/// display joined when the category still exists. Row order is the reader's
/// own and is treated as stable by the analytics layer.
pub trait LedgerReader: Send + Sync {
    fn fetch_movements(&self, user: UserId, window: DateWindow) -> Result<Vec<Movement>>;

    fn fetch_goal_contributions(
        &self,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<GoalContribution>>;

    fn fetch_investment_contributions(
        &self,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<InvestmentContribution>>;

    /// Fetches all three ledgers; any failure fails the whole call.
    fn fetch_all(&self, user: UserId, window: DateWindow) -> Result<LedgerRows> {
        Ok(LedgerRows {
            movements: self.fetch_movements(user, window)?,
            goal_contributions: self.fetch_goal_contributions(user, window)?,
            investment_contributions: self.fetch_investment_contributions(user, window)?,
        })
    }
}

/// The three ledgers for one user and window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerRows {
    pub movements: Vec<Movement>,
    pub goal_contributions: Vec<GoalContribution>,
    pub investment_contributions: Vec<InvestmentContribution>,
}

impl LedgerRows {
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
            && self.goal_contributions.is_empty()
            && self.investment_contributions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Movements,
    GoalContributions,
    InvestmentContributions,
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RowKind::Movements => "movements",
            RowKind::GoalContributions => "goal contributions",
            RowKind::InvestmentContributions => "investment contributions",
        };
        f.write_str(label)
    }
}

pub use cached::{CacheStats, CachedLedgerReader, DEFAULT_MAX_SIZE, DEFAULT_TTL};
pub use json_backend::{load_snapshot_from_path, save_snapshot_to_path, JsonLedgerReader};
pub use snapshot::{LedgerSnapshot, UserRow};
