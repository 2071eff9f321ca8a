use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DateWindow, GoalContribution, InvestmentContribution, LedgerRow, Movement, MovementType,
};

/// Period totals. Income, expense and saving are non-negative for well-formed
/// ledgers; investment is a signed net contribution and may go below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub income: f64,
    pub expense: f64,
    pub saving: f64,
    pub investment: f64,
}

impl PeriodSummary {
    /// What is left after spending and saving: `income - expense - saving`.
    pub fn balance(&self) -> f64 {
        self.income - self.expense - self.saving
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Income => self.income,
            Metric::Expense => self.expense,
            Metric::Saving => self.saving,
            Metric::Investment => self.investment,
        }
    }

    pub(crate) fn merge(&mut self, other: &PeriodSummary) {
        self.income += other.income;
        self.expense += other.expense;
        self.saving += other.saving;
        self.investment += other.investment;
    }

    pub(crate) fn add_movement(&mut self, movement: &Movement) {
        match movement.kind {
            MovementType::Income => self.income += movement.amount,
            MovementType::Expense => self.expense += movement.amount,
            MovementType::Saving => self.saving += movement.amount,
        }
    }

    /// Withdrawals stay in the ledger for goal bookkeeping but never count as saving.
    pub(crate) fn add_goal_contribution(&mut self, contribution: &GoalContribution) {
        if contribution.is_deposit() {
            self.saving += contribution.amount;
        }
    }

    pub(crate) fn add_investment_contribution(&mut self, contribution: &InvestmentContribution) {
        self.investment += contribution.amount;
    }
}

/// The four headline figures of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Income,
    Expense,
    Saving,
    Investment,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Income,
        Metric::Expense,
        Metric::Saving,
        Metric::Investment,
    ];

    /// Expense is the only metric where a decrease is the good news.
    pub fn inverted(&self) -> bool {
        matches!(self, Metric::Expense)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Income => "Ingresos",
            Metric::Expense => "Gastos",
            Metric::Saving => "Ahorro",
            Metric::Investment => "Inversiones",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn within<'a, T: LedgerRow>(
    rows: &'a [T],
    window: &'a DateWindow,
) -> impl Iterator<Item = &'a T> + 'a {
    rows.iter()
        .filter(move |row| window.contains(row.ledger_date()))
}

/// Calendar month a row is bucketed into.
pub(crate) fn month_key<T: LedgerRow>(row: &T) -> (i32, u32) {
    let date = row.ledger_date();
    (date.year(), date.month())
}

/// Folds the three ledgers into one summary, keeping only rows inside `window`.
///
/// Rows are summed per calendar month first and the months are then added in
/// order, matching [`monthly_rollup`](super::monthly_rollup) addition for
/// addition, so a year's twelve buckets add up to exactly this total.
pub fn aggregate(
    movements: &[Movement],
    goal_contributions: &[GoalContribution],
    investment_contributions: &[InvestmentContribution],
    window: &DateWindow,
) -> PeriodSummary {
    let mut months: BTreeMap<(i32, u32), PeriodSummary> = BTreeMap::new();
    for movement in within(movements, window) {
        months
            .entry(month_key(movement))
            .or_default()
            .add_movement(movement);
    }
    for contribution in within(goal_contributions, window) {
        months
            .entry(month_key(contribution))
            .or_default()
            .add_goal_contribution(contribution);
    }
    for contribution in within(investment_contributions, window) {
        months
            .entry(month_key(contribution))
            .or_default()
            .add_investment_contribution(contribution);
    }
    months
        .values()
        .fold(PeriodSummary::default(), |mut total, month| {
            total.merge(month);
            total
        })
}

/// Quick dashboard figures for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// Net goal movement, withdrawals included.
    pub saved: f64,
    pub invested: f64,
}

pub fn monthly_stats(
    goal_contributions: &[GoalContribution],
    investment_contributions: &[InvestmentContribution],
    window: &DateWindow,
) -> MonthlyStats {
    MonthlyStats {
        saved: net(goal_contributions, window),
        invested: net(investment_contributions, window),
    }
}

/// Signed sum of the rows inside `window`.
fn net<T: LedgerRow>(rows: &[T], window: &DateWindow) -> f64 {
    within(rows, window).map(LedgerRow::amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march() -> DateWindow {
        DateWindow::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap()
    }

    #[test]
    fn sums_income_and_expense_inside_window() {
        let movements = vec![
            Movement::new(MovementType::Income, 2000.0, date(2024, 3, 1)),
            Movement::new(MovementType::Expense, 500.0, date(2024, 3, 15)),
            Movement::new(MovementType::Expense, 80.0, date(2024, 4, 1)),
        ];
        let summary = aggregate(&movements, &[], &[], &march());
        assert_eq!(
            summary,
            PeriodSummary {
                income: 2000.0,
                expense: 500.0,
                saving: 0.0,
                investment: 0.0,
            }
        );
        assert_eq!(summary.balance(), 1500.0);
    }

    #[test]
    fn saving_blends_movements_and_goal_deposits() {
        let goal = Uuid::new_v4();
        let movements = vec![Movement::new(MovementType::Saving, 100.0, date(2024, 3, 5))];
        let goals = vec![
            GoalContribution::new(goal, 50.0, Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()),
            GoalContribution::new(goal, -20.0, Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap()),
        ];
        let summary = aggregate(&movements, &goals, &[], &march());
        assert_eq!(summary.saving, 150.0);
    }

    #[test]
    fn investment_is_a_signed_sum() {
        let position = Uuid::new_v4();
        let investments = vec![
            InvestmentContribution::new(position, 100.0, date(2024, 3, 2)),
            InvestmentContribution::new(position, -250.0, date(2024, 3, 30)),
        ];
        let summary = aggregate(&[], &[], &investments, &march());
        assert_eq!(summary.investment, -150.0);
    }

    #[test]
    fn goal_contribution_on_last_evening_counts() {
        let goals = vec![GoalContribution::new(
            Uuid::new_v4(),
            30.0,
            Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap(),
        )];
        assert_eq!(aggregate(&[], &goals, &[], &march()).saving, 30.0);
    }

    #[test]
    fn spans_several_months_with_inexact_amounts() {
        let movements = vec![
            Movement::new(MovementType::Expense, 0.1, date(2024, 1, 3)),
            Movement::new(MovementType::Expense, 0.1, date(2024, 2, 3)),
            Movement::new(MovementType::Expense, 1.1, date(2024, 1, 20)),
        ];
        let window = |start, end| DateWindow::new(start, end).unwrap();
        let quarter = window(date(2024, 1, 1), date(2024, 3, 31));
        let january = aggregate(&movements, &[], &[], &window(date(2024, 1, 1), date(2024, 1, 31)));
        let february = aggregate(&movements, &[], &[], &window(date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(
            aggregate(&movements, &[], &[], &quarter).expense,
            january.expense + february.expense
        );
    }

    #[test]
    fn monthly_stats_keep_withdrawals() {
        let goal = Uuid::new_v4();
        let goals = vec![
            GoalContribution::new(goal, 80.0, Utc.with_ymd_and_hms(2024, 3, 3, 8, 0, 0).unwrap()),
            GoalContribution::new(goal, -30.0, Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()),
        ];
        let investments = vec![InvestmentContribution::new(
            Uuid::new_v4(),
            40.0,
            date(2024, 3, 9),
        )];
        let stats = monthly_stats(&goals, &investments, &march());
        assert_eq!(stats.saved, 50.0);
        assert_eq!(stats.invested, 40.0);
    }

    #[test]
    fn only_expense_is_inverted() {
        let inverted: Vec<_> = Metric::ALL.iter().filter(|m| m.inverted()).collect();
        assert_eq!(inverted, vec![&Metric::Expense]);
    }
}
