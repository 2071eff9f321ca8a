use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analytics::{
    aggregate, breakdown_by_category, compare_summaries, investment_series, monthly_rollup,
    monthly_stats, query, total_invested, CategoryBreakdown, Comparison, FilterOptions, Insight,
    InsightGenerator, InvestmentPoint, MonthlyData, MonthlyStats, PeriodSummary, QueryResult,
};
use crate::analytics::summary::within;
use crate::config::Config;
use crate::domain::{DateWindow, Movement, MovementType, UserId};
use crate::errors::Result;
use crate::format::LocaleConfig;
use crate::period::{
    period_label, resolve_period, resolve_previous_period, year_window, ViewMode,
};
use crate::storage::{LedgerReader, LedgerRows, RowKind};

use super::{ServiceError, ServiceResult};

/// Everything needed to build one report.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub user: UserId,
    pub reference: NaiveDate,
    pub mode: ViewMode,
    pub locale: LocaleConfig,
    pub currency: String,
}

impl ReportRequest {
    pub fn new(user: UserId, reference: NaiveDate, mode: ViewMode) -> Self {
        Self {
            user,
            reference,
            mode,
            locale: LocaleConfig::default(),
            currency: "EUR".into(),
        }
    }

    /// Takes money formatting from the user's configuration.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.locale = config.locale_config();
        self.currency = config.currency.clone();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub mode: ViewMode,
    pub period: DateWindow,
    pub previous_period: DateWindow,
    pub label: String,
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub comparisons: Vec<Comparison>,
    pub expense_breakdown: Vec<CategoryBreakdown>,
    /// Twelve buckets for the calendar year of the reference date.
    pub monthly: Vec<MonthlyData>,
    pub investments: Vec<InvestmentPoint>,
    pub total_invested: f64,
    pub insights: Vec<Insight>,
}

pub struct AnalyticsService;

impl AnalyticsService {
    /// Builds the dashboard report for the period containing `request.reference`.
    ///
    /// Rows are fetched for the reference year and for the previous period. Any
    /// failed fetch fails the report.
    pub fn report<R>(reader: &R, request: &ReportRequest) -> ServiceResult<AnalyticsReport>
    where
        R: LedgerReader + ?Sized,
    {
        let year = request.reference.year();
        let period = resolve_period(request.reference, request.mode);
        let previous_period = resolve_previous_period(request.reference, request.mode);
        let year_span = year_window(year)?;

        let rows = fetch_rows(reader, request.user, year_span)?;
        let previous_rows = fetch_rows(reader, request.user, previous_period)?;

        let current = aggregate(
            &rows.movements,
            &rows.goal_contributions,
            &rows.investment_contributions,
            &period,
        );
        let previous = aggregate(
            &previous_rows.movements,
            &previous_rows.goal_contributions,
            &previous_rows.investment_contributions,
            &previous_period,
        );

        let period_movements: Vec<Movement> = within(&rows.movements, &period).cloned().collect();
        let expense_breakdown = breakdown_by_category(&period_movements, MovementType::Expense);

        let monthly = monthly_rollup(
            &rows.movements,
            &rows.goal_contributions,
            &rows.investment_contributions,
            year,
        );
        let investments = investment_series(&rows.investment_contributions, year);
        let invested = total_invested(&investments);

        let generator = InsightGenerator::new(request.locale.clone(), request.currency.clone());
        let insights: Vec<Insight> = generator
            .generate(&current, &previous, &expense_breakdown, request.mode.noun())
            .collect();

        let report = AnalyticsReport {
            mode: request.mode,
            period,
            previous_period,
            label: period_label(request.reference, request.mode),
            comparisons: compare_summaries(&current, &previous),
            current,
            previous,
            expense_breakdown,
            monthly,
            investments,
            total_invested: invested,
            insights,
        };
        tracing::info!(
            user = %request.user,
            period = %report.period,
            insights = report.insights.len(),
            "analytics report ready"
        );
        Ok(report)
    }

    /// Runs the filtered explorer over the user's movements.
    pub fn explore<R>(reader: &R, user: UserId, filter: &FilterOptions) -> ServiceResult<QueryResult>
    where
        R: LedgerReader + ?Sized,
    {
        if filter.top_limit == 0 {
            return Err(ServiceError::Invalid(
                "top transaction limit must be at least 1".into(),
            ));
        }
        let movements = logged(
            RowKind::Movements,
            user,
            filter.window,
            reader.fetch_movements(user, filter.window),
        )?;
        tracing::debug!(%user, window = %filter.window, rows = movements.len(), "explorer rows fetched");
        Ok(query(&movements, filter))
    }

    /// Goal and investment quick stats for the month containing `reference`.
    pub fn monthly_stats<R>(
        reader: &R,
        user: UserId,
        reference: NaiveDate,
    ) -> ServiceResult<MonthlyStats>
    where
        R: LedgerReader + ?Sized,
    {
        let month = resolve_period(reference, ViewMode::Month);
        let goals = logged(
            RowKind::GoalContributions,
            user,
            month,
            reader.fetch_goal_contributions(user, month),
        )?;
        let investments = logged(
            RowKind::InvestmentContributions,
            user,
            month,
            reader.fetch_investment_contributions(user, month),
        )?;
        Ok(monthly_stats(&goals, &investments, &month))
    }
}

fn fetch_rows<R>(reader: &R, user: UserId, window: DateWindow) -> ServiceResult<LedgerRows>
where
    R: LedgerReader + ?Sized,
{
    let rows = LedgerRows {
        movements: logged(
            RowKind::Movements,
            user,
            window,
            reader.fetch_movements(user, window),
        )?,
        goal_contributions: logged(
            RowKind::GoalContributions,
            user,
            window,
            reader.fetch_goal_contributions(user, window),
        )?,
        investment_contributions: logged(
            RowKind::InvestmentContributions,
            user,
            window,
            reader.fetch_investment_contributions(user, window),
        )?,
    };
    tracing::debug!(
        %user,
        %window,
        movements = rows.movements.len(),
        goal_contributions = rows.goal_contributions.len(),
        investment_contributions = rows.investment_contributions.len(),
        "ledger rows fetched"
    );
    if rows.is_empty() {
        tracing::debug!(%user, %window, "no ledger rows in window");
    }
    Ok(rows)
}

fn logged<T>(
    kind: RowKind,
    user: UserId,
    window: DateWindow,
    fetched: Result<Vec<T>>,
) -> ServiceResult<Vec<T>> {
    fetched.map_err(|err| {
        tracing::warn!(%user, %window, rows = %kind, error = %err, "ledger fetch failed");
        ServiceError::from(err)
    })
}
