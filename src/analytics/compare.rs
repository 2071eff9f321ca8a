//! Period-over-period deltas.
//!
//! `percent_change` is polarity-agnostic. Whether a rise is good news is decided
//! by the caller through the `invert` flag (set for expenses).

use serde::{Deserialize, Serialize};

use crate::analytics::summary::{Metric, PeriodSummary};

/// Reported when the previous value was zero and the current one is not. It is
/// a marker for "new activity", not a ratio.
pub const NEW_ACTIVITY_CHANGE: f64 = 100.0;

/// Signed percentage change from `previous` to `current`, unrounded.
///
/// Returns `None` when both are zero and [`NEW_ACTIVITY_CHANGE`] when only
/// `previous` is zero.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        if current == 0.0 {
            None
        } else {
            Some(NEW_ACTIVITY_CHANGE)
        }
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Favorable,
    Unfavorable,
    Flat,
    /// No comparison is possible.
    Unknown,
}

/// Reads a change through the metric's polarity: with `invert`, a decrease is
/// favorable.
pub fn trend(change: Option<f64>, invert: bool) -> Trend {
    match change {
        None => Trend::Unknown,
        Some(delta) if delta == 0.0 => Trend::Flat,
        Some(delta) if (delta > 0.0) != invert => Trend::Favorable,
        Some(_) => Trend::Unfavorable,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub metric: Metric,
    pub current: f64,
    pub previous: f64,
    pub change: Option<f64>,
    pub invert: bool,
}

impl Comparison {
    pub fn new(metric: Metric, current: f64, previous: f64) -> Self {
        Self {
            metric,
            current,
            previous,
            change: percent_change(current, previous),
            invert: metric.inverted(),
        }
    }

    pub fn trend(&self) -> Trend {
        trend(self.change, self.invert)
    }

    /// True when `change` is the new-activity marker rather than a real ratio.
    pub fn from_zero(&self) -> bool {
        self.previous == 0.0 && self.current != 0.0
    }
}

/// One comparison per headline metric, in `Metric::ALL` order.
pub fn compare_summaries(current: &PeriodSummary, previous: &PeriodSummary) -> Vec<Comparison> {
    Metric::ALL
        .iter()
        .map(|metric| Comparison::new(*metric, current.get(*metric), previous.get(*metric)))
        .collect()
}
