#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use analytics_core::domain::{
    Category, CategoryKind, GoalContribution, InvestmentContribution, Movement, MovementType,
    UserId,
};
use analytics_core::storage::{save_snapshot_to_path, LedgerSnapshot};
use chrono::{NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub struct Fixture {
    pub user: UserId,
    pub other_user: UserId,
    pub groceries: Category,
    pub rent: Category,
    pub snapshot: LedgerSnapshot,
}

/// A small two-user ledger spanning February and March 2024.
///
/// March for `user`: income 2000, expenses 300 (groceries) + 200 (rent),
/// saving 100 plus a 50 goal deposit and a -20 withdrawal, investment 250.
/// February: expense 400.
pub fn fixture() -> Fixture {
    let user = Uuid::new_v4();
    let other_user = Uuid::new_v4();
    let groceries = Category::new("Supermercado", CategoryKind::Expense)
        .with_style("shopping-cart", "#10B981");
    let rent = Category::new("Alquiler", CategoryKind::Expense).with_style("home", "#6366F1");

    let mut snapshot = LedgerSnapshot::new();
    snapshot.add_category(groceries.clone());
    snapshot.add_category(rent.clone());

    snapshot.add_movement(
        user,
        Movement::new(MovementType::Income, 2000.0, date(2024, 3, 1)).with_concept("Nómina"),
    );
    snapshot.add_movement(
        user,
        Movement::new(MovementType::Expense, 300.0, date(2024, 3, 9))
            .with_category(&groceries)
            .with_concept("Compra semanal"),
    );
    snapshot.add_movement(
        user,
        Movement::new(MovementType::Expense, 200.0, date(2024, 3, 31))
            .with_category(&rent)
            .with_concept("Alquiler"),
    );
    snapshot.add_movement(user, Movement::new(MovementType::Saving, 100.0, date(2024, 3, 5)));
    snapshot.add_movement(user, Movement::new(MovementType::Expense, 400.0, date(2024, 2, 14)));

    let goal = Uuid::new_v4();
    snapshot.add_goal_contribution(
        user,
        GoalContribution::new(goal, 50.0, Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap()),
    );
    snapshot.add_goal_contribution(
        user,
        GoalContribution::new(goal, -20.0, Utc.with_ymd_and_hms(2024, 3, 20, 7, 15, 0).unwrap()),
    );
    snapshot.add_investment_contribution(
        user,
        InvestmentContribution::new(Uuid::new_v4(), 250.0, date(2024, 3, 12)),
    );

    snapshot.add_movement(
        other_user,
        Movement::new(MovementType::Expense, 9999.0, date(2024, 3, 10)),
    );

    Fixture {
        user,
        other_user,
        groceries,
        rent,
        snapshot,
    }
}

/// Persists `snapshot` under a fresh temp dir and returns the file path.
pub fn write_ledger(snapshot: &LedgerSnapshot) -> PathBuf {
    let path = temp_base().join("ledger.json");
    save_snapshot_to_path(snapshot, &path).expect("write ledger snapshot");
    path
}
