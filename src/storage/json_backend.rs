use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::{DateWindow, GoalContribution, InvestmentContribution, Movement, UserId};
use crate::errors::{AnalyticsError, Result};
use crate::storage::{LedgerReader, LedgerSnapshot};
use crate::utils::paths::write_atomic;

/// Ledger reader backed by a JSON snapshot file.
///
/// The file is read once on [`open`](Self::open); call
/// [`reload`](Self::reload) to pick up external changes.
#[derive(Debug, Clone)]
pub struct JsonLedgerReader {
    path: PathBuf,
    snapshot: LedgerSnapshot,
}

impl JsonLedgerReader {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = load_snapshot_from_path(&path)?;
        tracing::debug!(
            path = %path.display(),
            movements = snapshot.movements.len(),
            "opened ledger snapshot"
        );
        Ok(Self { path, snapshot })
    }

    /// Wraps an in-memory snapshot that will be written to `path` on save.
    pub fn with_snapshot(path: impl Into<PathBuf>, snapshot: LedgerSnapshot) -> Self {
        Self {
            path: path.into(),
            snapshot,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn reload(&mut self) -> Result<()> {
        self.snapshot = load_snapshot_from_path(&self.path)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        save_snapshot_to_path(&self.snapshot, &self.path)
    }
}

impl LedgerReader for JsonLedgerReader {
    fn fetch_movements(&self, user: UserId, window: DateWindow) -> Result<Vec<Movement>> {
        self.snapshot.fetch_movements(user, window)
    }

    fn fetch_goal_contributions(
        &self,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<GoalContribution>> {
        self.snapshot.fetch_goal_contributions(user, window)
    }

    fn fetch_investment_contributions(
        &self,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<InvestmentContribution>> {
        self.snapshot.fetch_investment_contributions(user, window)
    }
}

pub fn save_snapshot_to_path(snapshot: &LedgerSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    write_atomic(path, &json)
}

pub fn load_snapshot_from_path(path: &Path) -> Result<LedgerSnapshot> {
    if !path.exists() {
        return Err(AnalyticsError::Storage(format!(
            "ledger file `{}` not found",
            path.display()
        )));
    }
    let data = fs::read_to_string(path)?;
    let snapshot: LedgerSnapshot = serde_json::from_str(&data)?;
    Ok(snapshot)
}
