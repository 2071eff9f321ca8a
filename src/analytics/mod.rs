//! Pure computations over already-fetched ledger rows. Nothing here performs
//! I/O; the service layer fetches and hands slices in.

pub mod breakdown;
pub mod compare;
pub mod insights;
pub mod query;
pub mod rollup;
pub mod summary;

pub use breakdown::{breakdown_by_category, CategoryBreakdown, CategoryKey};
pub use compare::{compare_summaries, percent_change, trend, Comparison, Trend};
pub use insights::{generate_insights, Insight, InsightGenerator, InsightKind, Insights};
pub use query::{query, FilterOptions, GroupBy, QueryResult, SeriesPoint};
pub use rollup::{investment_series, monthly_rollup, total_invested, InvestmentPoint, MonthlyData};
pub use summary::{aggregate, monthly_stats, Metric, MonthlyStats, PeriodSummary};
