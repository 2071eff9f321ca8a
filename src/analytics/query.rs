//! Ad-hoc explorer over movements: arbitrary range, optional type and category
//! filters, day or month buckets, and the largest matching transactions.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::window::first_of_month;
use crate::domain::{DateWindow, Movement, MovementType};
use crate::format::{day_label, month_label};

pub const TOP_TRANSACTIONS_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    Month,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub window: DateWindow,
    /// Allow-list of categories; empty means no category filter.
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    /// `None` keeps every movement type.
    #[serde(default, rename = "type")]
    pub kind: Option<MovementType>,
    #[serde(default)]
    pub group_by: GroupBy,
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
}

impl FilterOptions {
    pub fn new(window: DateWindow, group_by: GroupBy) -> Self {
        Self {
            window,
            category_ids: Vec::new(),
            kind: None,
            group_by,
            top_limit: TOP_TRANSACTIONS_LIMIT,
        }
    }

    pub fn with_kind(mut self, kind: MovementType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_categories(mut self, category_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.category_ids = category_ids.into_iter().collect();
        self
    }

    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.top_limit = limit;
        self
    }
}

fn default_top_limit() -> usize {
    TOP_TRANSACTIONS_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// First day of the bucket.
    pub date: NaiveDate,
    pub amount: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub total: f64,
    pub series: Vec<SeriesPoint>,
    pub top_transactions: Vec<Movement>,
    pub matched: usize,
}

/// Filters `rows` and builds a zero-filled series spanning the whole window.
///
/// Top transactions are sorted by amount with a stable sort, so equal amounts
/// keep the order the reader returned them in.
pub fn query(rows: &[Movement], options: &FilterOptions) -> QueryResult {
    let allowed: HashSet<Uuid> = options.category_ids.iter().copied().collect();
    let matching: Vec<&Movement> = rows
        .iter()
        .filter(|row| options.window.contains(row.date))
        .filter(|row| options.kind.map_or(true, |kind| row.kind == kind))
        .filter(|row| {
            allowed.is_empty()
                || row
                    .category_id
                    .map_or(false, |category| allowed.contains(&category))
        })
        .collect();

    let total = matching.iter().map(|row| row.amount).sum();

    let mut per_bucket: HashMap<NaiveDate, f64> = HashMap::new();
    for row in &matching {
        *per_bucket
            .entry(bucket_start(row.date, options.group_by))
            .or_insert(0.0) += row.amount;
    }
    let buckets: Vec<NaiveDate> = match options.group_by {
        GroupBy::Day => options.window.days().collect(),
        GroupBy::Month => options.window.month_starts(),
    };
    let series = buckets
        .into_iter()
        .map(|date| SeriesPoint {
            date,
            amount: per_bucket.get(&date).copied().unwrap_or(0.0),
            label: match options.group_by {
                GroupBy::Day => day_label(date),
                GroupBy::Month => month_label(date),
            },
        })
        .collect();

    let mut ranked = matching.clone();
    ranked.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    let top_transactions = ranked
        .into_iter()
        .take(options.top_limit)
        .cloned()
        .collect();

    QueryResult {
        total,
        series,
        top_transactions,
        matched: matching.len(),
    }
}

fn bucket_start(date: NaiveDate, group_by: GroupBy) -> NaiveDate {
    match group_by {
        GroupBy::Day => date,
        GroupBy::Month => first_of_month(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
        DateWindow::new(start, end).unwrap()
    }

    #[test]
    fn daily_series_is_zero_filled() {
        let rows = vec![
            Movement::new(MovementType::Expense, 12.0, date(2024, 3, 2)),
            Movement::new(MovementType::Expense, 8.0, date(2024, 3, 2)),
            Movement::new(MovementType::Expense, 5.0, date(2024, 3, 4)),
        ];
        let options = FilterOptions::new(window(date(2024, 3, 1), date(2024, 3, 5)), GroupBy::Day);
        let result = query(&rows, &options);
        assert_eq!(result.total, 25.0);
        let amounts: Vec<f64> = result.series.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![0.0, 20.0, 0.0, 5.0, 0.0]);
        assert_eq!(result.series[1].label, "2 mar");
    }

    #[test]
    fn monthly_series_spans_partial_months() {
        let rows = vec![
            Movement::new(MovementType::Income, 100.0, date(2024, 1, 20)),
            Movement::new(MovementType::Income, 50.0, date(2024, 3, 1)),
        ];
        let options =
            FilterOptions::new(window(date(2024, 1, 15), date(2024, 3, 10)), GroupBy::Month);
        let result = query(&rows, &options);
        assert_eq!(result.series.len(), 3);
        assert_eq!(result.series[0].date, date(2024, 1, 1));
        assert_eq!(result.series[0].label, "ene 2024");
        assert_eq!(result.series[1].amount, 0.0);
        assert_eq!(result.series[2].amount, 50.0);
    }

    #[test]
    fn type_and_category_filters_apply() {
        let food = Category::new("Comida", CategoryKind::Expense);
        let rent = Category::new("Alquiler", CategoryKind::Expense);
        let rows = vec![
            Movement::new(MovementType::Expense, 40.0, date(2024, 3, 1)).with_category(&food),
            Movement::new(MovementType::Expense, 700.0, date(2024, 3, 1)).with_category(&rent),
            Movement::new(MovementType::Expense, 9.0, date(2024, 3, 2)),
            Movement::new(MovementType::Income, 40.0, date(2024, 3, 1)).with_category(&food),
        ];
        let options = FilterOptions::new(window(date(2024, 3, 1), date(2024, 3, 31)), GroupBy::Day)
            .with_kind(MovementType::Expense)
            .with_categories([food.id]);
        let result = query(&rows, &options);
        assert_eq!(result.matched, 1);
        assert_eq!(result.total, 40.0);

        let all_types = FilterOptions::new(options.window, GroupBy::Day);
        assert_eq!(query(&rows, &all_types).matched, 4);
    }

    #[test]
    fn top_transactions_are_stable_and_truncated() {
        let mut rows: Vec<Movement> = (1..=12)
            .map(|n| Movement::new(MovementType::Expense, f64::from(n), date(2024, 3, n)))
            .collect();
        let first_tie = Movement::new(MovementType::Expense, 12.0, date(2024, 3, 20)).with_concept("a");
        let second_tie = Movement::new(MovementType::Expense, 12.0, date(2024, 3, 21)).with_concept("b");
        rows.push(first_tie.clone());
        rows.push(second_tie.clone());

        let options = FilterOptions::new(window(date(2024, 3, 1), date(2024, 3, 31)), GroupBy::Day);
        let result = query(&rows, &options);
        assert_eq!(result.top_transactions.len(), TOP_TRANSACTIONS_LIMIT);
        assert_eq!(result.top_transactions[0].id, rows[11].id);
        assert_eq!(result.top_transactions[1].id, first_tie.id);
        assert_eq!(result.top_transactions[2].id, second_tie.id);
        assert_eq!(result.top_transactions[9].amount, 5.0);
    }

    #[test]
    fn empty_match_keeps_series_shape() {
        let options = FilterOptions::new(window(date(2024, 2, 1), date(2024, 2, 29)), GroupBy::Day);
        let result = query(&[], &options);
        assert_eq!(result.total, 0.0);
        assert_eq!(result.series.len(), 29);
        assert!(result.top_transactions.is_empty());
    }
}
