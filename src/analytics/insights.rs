//! Rule-based insights over already-aggregated figures.
//!
//! Rules run in a fixed order and each emits at most one insight:
//!
//! 1. total spent this period (when anything was spent);
//! 2. spending trend against the previous period (when it had spending);
//! 3. largest expense category;
//! 4. saving rate, success from 20% and info from 10% of income;
//! 5. overspending warning when `income - expense - saving < 0`.
//!
//! Insights are produced lazily by the [`Insights`] iterator.

use serde::{Deserialize, Serialize};

use crate::analytics::breakdown::CategoryBreakdown;
use crate::analytics::compare::percent_change;
use crate::analytics::summary::PeriodSummary;
use crate::format::{format_currency, format_percent, LocaleConfig};

pub const EXCELLENT_SAVING_RATE: f64 = 20.0;
pub const GOOD_SAVING_RATE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: String) -> Self {
        Self { kind, message }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Spent,
    SpendingTrend,
    TopCategory,
    SavingRate,
    Balance,
}

const RULES: [Rule; 5] = [
    Rule::Spent,
    Rule::SpendingTrend,
    Rule::TopCategory,
    Rule::SavingRate,
    Rule::Balance,
];

/// Holds the money formatting used in messages.
#[derive(Debug, Clone)]
pub struct InsightGenerator {
    locale: LocaleConfig,
    currency: String,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(LocaleConfig::default(), "EUR")
    }
}

impl InsightGenerator {
    pub fn new(locale: LocaleConfig, currency: impl Into<String>) -> Self {
        Self {
            locale,
            currency: currency.into(),
        }
    }

    /// `breakdown` is the expense breakdown of the current period, largest
    /// first; `period_label` is the period noun (`"mes"`, `"año"`).
    pub fn generate<'a>(
        &'a self,
        current: &'a PeriodSummary,
        previous: &'a PeriodSummary,
        breakdown: &'a [CategoryBreakdown],
        period_label: &'a str,
    ) -> Insights<'a> {
        Insights {
            generator: self,
            current,
            previous,
            breakdown,
            period_label,
            next_rule: 0,
        }
    }

    fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.currency, &self.locale)
    }
}

/// Lazy, ordered sequence of insights.
pub struct Insights<'a> {
    generator: &'a InsightGenerator,
    current: &'a PeriodSummary,
    previous: &'a PeriodSummary,
    breakdown: &'a [CategoryBreakdown],
    period_label: &'a str,
    next_rule: usize,
}

impl Insights<'_> {
    fn evaluate(&self, rule: Rule) -> Option<Insight> {
        let current = self.current;
        let noun = self.period_label;
        match rule {
            Rule::Spent => (current.expense > 0.0).then(|| {
                Insight::new(
                    InsightKind::Info,
                    format!(
                        "Este {} has gastado {}",
                        noun,
                        self.generator.money(current.expense)
                    ),
                )
            }),
            Rule::SpendingTrend => {
                if self.previous.expense <= 0.0 {
                    return None;
                }
                let diff = current.expense - self.previous.expense;
                let change = percent_change(current.expense, self.previous.expense)?;
                if diff > 0.0 {
                    Some(Insight::new(
                        InsightKind::Warning,
                        format!(
                            "Gastas {}% más que el {} pasado",
                            format_percent(change),
                            noun
                        ),
                    ))
                } else if diff < 0.0 {
                    Some(Insight::new(
                        InsightKind::Success,
                        format!(
                            "¡Bien! Gastas {}% menos que el {} pasado",
                            format_percent(change.abs()),
                            noun
                        ),
                    ))
                } else {
                    None
                }
            }
            Rule::TopCategory => self.breakdown.first().map(|top| {
                Insight::new(
                    InsightKind::Info,
                    format!(
                        "Tu mayor gasto es en \"{}\" ({}%)",
                        top.name,
                        format_percent(top.percentage)
                    ),
                )
            }),
            Rule::SavingRate => {
                if current.income <= 0.0 || current.saving <= 0.0 {
                    return None;
                }
                let rate = current.saving / current.income * 100.0;
                if rate >= EXCELLENT_SAVING_RATE {
                    Some(Insight::new(
                        InsightKind::Success,
                        format!(
                            "¡Excelente! Ahorras el {}% de tus ingresos",
                            format_percent(rate)
                        ),
                    ))
                } else if rate >= GOOD_SAVING_RATE {
                    Some(Insight::new(
                        InsightKind::Info,
                        format!("Ahorras el {}% de tus ingresos", format_percent(rate)),
                    ))
                } else {
                    None
                }
            }
            Rule::Balance => (current.balance() < 0.0).then(|| {
                Insight::new(
                    InsightKind::Warning,
                    format!("Cuidado: gastas más de lo que ingresas este {}", noun),
                )
            }),
        }
    }
}

impl Iterator for Insights<'_> {
    type Item = Insight;

    fn next(&mut self) -> Option<Insight> {
        while let Some(rule) = RULES.get(self.next_rule).copied() {
            self.next_rule += 1;
            if let Some(insight) = self.evaluate(rule) {
                return Some(insight);
            }
        }
        None
    }
}

/// Runs the rules with `es-ES` / EUR money formatting.
pub fn generate_insights(
    current: &PeriodSummary,
    previous: &PeriodSummary,
    breakdown: &[CategoryBreakdown],
    period_label: &str,
) -> Vec<Insight> {
    InsightGenerator::default()
        .generate(current, previous, breakdown, period_label)
        .collect()
}
