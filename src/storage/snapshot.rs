use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Category, CategoryDisplay, DateWindow, GoalContribution, InvestmentContribution, LedgerRow,
    Movement, UserId,
};
use crate::errors::Result;
use crate::storage::LedgerReader;

/// A ledger row tagged with its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow<T> {
    pub user_id: UserId,
    #[serde(flatten)]
    pub row: T,
}

/// In-memory copy of every user's ledgers plus the category table used for
/// display joins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub movements: Vec<UserRow<Movement>>,
    #[serde(default)]
    pub goal_contributions: Vec<UserRow<GoalContribution>>,
    #[serde(default)]
    pub investment_contributions: Vec<UserRow<InvestmentContribution>>,
}

impl LedgerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        id
    }

    /// Stores the movement without its joined display; the display is rebuilt
    /// from the category table on every read.
    pub fn add_movement(&mut self, user_id: UserId, mut movement: Movement) -> Uuid {
        let id = movement.id;
        movement.category = None;
        self.movements.push(UserRow {
            user_id,
            row: movement,
        });
        id
    }

    pub fn add_goal_contribution(&mut self, user_id: UserId, contribution: GoalContribution) -> Uuid {
        let id = contribution.id;
        self.goal_contributions.push(UserRow {
            user_id,
            row: contribution,
        });
        id
    }

    pub fn add_investment_contribution(
        &mut self,
        user_id: UserId,
        contribution: InvestmentContribution,
    ) -> Uuid {
        let id = contribution.id;
        self.investment_contributions.push(UserRow {
            user_id,
            row: contribution,
        });
        id
    }

    pub fn remove_category(&mut self, id: Uuid) -> Option<Category> {
        let position = self.categories.iter().position(|category| category.id == id)?;
        Some(self.categories.remove(position))
    }

    fn category_displays(&self) -> HashMap<Uuid, CategoryDisplay> {
        self.categories
            .iter()
            .map(|category| (category.id, category.display()))
            .collect()
    }
}

fn select<T: LedgerRow + Clone>(rows: &[UserRow<T>], user: UserId, window: DateWindow) -> Vec<T> {
    rows.iter()
        .filter(|entry| entry.user_id == user && window.contains(entry.row.ledger_date()))
        .map(|entry| entry.row.clone())
        .collect()
}

impl LedgerReader for LedgerSnapshot {
    fn fetch_movements(&self, user: UserId, window: DateWindow) -> Result<Vec<Movement>> {
        let displays = self.category_displays();
        let mut movements = select(&self.movements, user, window);
        for movement in &mut movements {
            movement.category = movement
                .category_id
                .and_then(|id| displays.get(&id).cloned());
        }
        Ok(movements)
    }

    fn fetch_goal_contributions(
        &self,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<GoalContribution>> {
        Ok(select(&self.goal_contributions, user, window))
    }

    fn fetch_investment_contributions(
        &self,
        user: UserId,
        window: DateWindow,
    ) -> Result<Vec<InvestmentContribution>> {
        Ok(select(&self.investment_contributions, user, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryKind, MovementType};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march() -> DateWindow {
        DateWindow::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap()
    }

    #[test]
    fn filters_by_owner_and_inclusive_window() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut snapshot = LedgerSnapshot::new();
        snapshot.add_movement(alice, Movement::new(MovementType::Income, 1.0, date(2024, 3, 1)));
        snapshot.add_movement(alice, Movement::new(MovementType::Income, 2.0, date(2024, 3, 31)));
        snapshot.add_movement(alice, Movement::new(MovementType::Income, 4.0, date(2024, 4, 1)));
        snapshot.add_movement(bob, Movement::new(MovementType::Income, 8.0, date(2024, 3, 10)));

        let rows = snapshot.fetch_movements(alice, march()).unwrap();
        let amounts: Vec<f64> = rows.iter().map(|m| m.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0]);
    }

    #[test]
    fn goal_rows_use_calendar_day_of_timestamp() {
        let user = Uuid::new_v4();
        let mut snapshot = LedgerSnapshot::new();
        let late = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        snapshot.add_goal_contribution(user, GoalContribution::new(Uuid::new_v4(), 10.0, late));
        snapshot.add_goal_contribution(user, GoalContribution::new(Uuid::new_v4(), 20.0, next));
        let rows = snapshot.fetch_goal_contributions(user, march()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 10.0);
    }

    #[test]
    fn joins_current_category_display() {
        let user = Uuid::new_v4();
        let mut snapshot = LedgerSnapshot::new();
        let food = Category::new("Comida", CategoryKind::Expense).with_style("utensils", "#F59E0B");
        let food_id = snapshot.add_category(food.clone());
        snapshot.add_movement(
            user,
            Movement::new(MovementType::Expense, 12.0, date(2024, 3, 5)).with_category(&food),
        );

        let rows = snapshot.fetch_movements(user, march()).unwrap();
        assert_eq!(rows[0].category.as_ref().map(|c| c.icon.as_str()), Some("utensils"));

        snapshot.remove_category(food_id);
        let rows = snapshot.fetch_movements(user, march()).unwrap();
        assert_eq!(rows[0].category_id, Some(food_id));
        assert!(rows[0].category.is_none());
    }

    #[test]
    fn fetch_all_collects_every_ledger() {
        let user = Uuid::new_v4();
        let mut snapshot = LedgerSnapshot::new();
        snapshot.add_movement(user, Movement::new(MovementType::Saving, 5.0, date(2024, 3, 2)));
        snapshot.add_investment_contribution(
            user,
            InvestmentContribution::new(Uuid::new_v4(), 50.0, date(2024, 3, 3)),
        );
        let rows = snapshot.fetch_all(user, march()).unwrap();
        assert_eq!(rows.movements.len(), 1);
        assert!(rows.goal_contributions.is_empty());
        assert_eq!(rows.investment_contributions.len(), 1);
        assert!(snapshot.fetch_all(Uuid::new_v4(), march()).unwrap().is_empty());
    }
}
