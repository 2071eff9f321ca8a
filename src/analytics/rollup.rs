use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::analytics::summary::PeriodSummary;
use crate::domain::{GoalContribution, InvestmentContribution, LedgerRow, Movement};
use crate::format::month_abbreviation;

const MONTHS: usize = 12;

/// One month of a yearly rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyData {
    /// Calendar month, 1-12.
    pub month: u32,
    pub label: String,
    #[serde(flatten)]
    pub summary: PeriodSummary,
}

/// Net investment flow of one month plus the running total up to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPoint {
    pub month: u32,
    pub label: String,
    pub total: f64,
    pub cumulative: f64,
}

/// Per-month summaries of `year`, always exactly twelve buckets (January first).
///
/// Each bucket applies the same rules as [`aggregate`](super::aggregate), and
/// adding the buckets in month order reproduces the aggregate of the whole
/// year exactly. Rows dated outside `year` are ignored.
pub fn monthly_rollup(
    movements: &[Movement],
    goal_contributions: &[GoalContribution],
    investment_contributions: &[InvestmentContribution],
    year: i32,
) -> Vec<MonthlyData> {
    let mut buckets = [PeriodSummary::default(); MONTHS];
    for movement in movements {
        if let Some(slot) = month_slot(movement, year) {
            buckets[slot].add_movement(movement);
        }
    }
    for contribution in goal_contributions {
        if let Some(slot) = month_slot(contribution, year) {
            buckets[slot].add_goal_contribution(contribution);
        }
    }
    for contribution in investment_contributions {
        if let Some(slot) = month_slot(contribution, year) {
            buckets[slot].add_investment_contribution(contribution);
        }
    }

    buckets
        .iter()
        .zip(1u32..)
        .map(|(summary, month)| MonthlyData {
            month,
            label: month_abbreviation(month).to_string(),
            summary: *summary,
        })
        .collect()
}

/// Twelve-month investment curve for `year`.
///
/// `cumulative` is net invested capital, not market value, so it drops after a
/// month of net withdrawals.
pub fn investment_series(
    investment_contributions: &[InvestmentContribution],
    year: i32,
) -> Vec<InvestmentPoint> {
    let mut totals = [0.0_f64; MONTHS];
    for contribution in investment_contributions {
        if let Some(slot) = month_slot(contribution, year) {
            totals[slot] += contribution.amount;
        }
    }

    let mut cumulative = 0.0;
    totals
        .iter()
        .zip(1u32..)
        .map(|(total, month)| {
            cumulative += total;
            InvestmentPoint {
                month,
                label: month_abbreviation(month).to_string(),
                total: *total,
                cumulative,
            }
        })
        .collect()
}

/// Net capital invested by the end of the series.
pub fn total_invested(series: &[InvestmentPoint]) -> f64 {
    series.last().map(|point| point.cumulative).unwrap_or(0.0)
}

fn month_slot<T: LedgerRow>(row: &T, year: i32) -> Option<usize> {
    let date = row.ledger_date();
    (date.year() == year).then(|| date.month0() as usize)
}
