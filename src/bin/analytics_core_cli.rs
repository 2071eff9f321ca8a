use std::path::PathBuf;
use std::process::ExitCode;

use analytics_core::{
    analytics::{Comparison, FilterOptions, GroupBy, InsightKind, QueryResult, Trend},
    config::{Config, ConfigManager},
    core::services::{AnalyticsReport, AnalyticsService, ReportRequest},
    domain::{DateWindow, MovementType, UserId},
    format::{format_currency, format_percent, LocaleConfig},
    init,
    period::ViewMode,
    storage::JsonLedgerReader,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use uuid::Uuid;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Spending analytics over a JSON ledger snapshot.
#[derive(Parser, Debug)]
#[command(name = "analytics_core_cli", version, about, long_about = None)]
struct Args {
    /// Ledger snapshot to read; defaults to `ledger_path` from the config file
    #[arg(long, global = true, env = "ANALYTICS_CORE_LEDGER", value_name = "FILE")]
    ledger: Option<PathBuf>,

    /// Owner of the rows to analyse
    #[arg(long, global = true, value_name = "UUID")]
    user: Option<Uuid>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Period summary, comparison, top categories and insights
    Report {
        /// Any day inside the period; defaults to today
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
        /// Report the whole calendar year instead of the month
        #[arg(long)]
        year: bool,
    },
    /// Totals, series and largest movements for an arbitrary range
    Explore {
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: NaiveDate,
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: NaiveDate,
        #[arg(long = "type", value_enum)]
        kind: Option<KindArg>,
        /// Restrict to these category ids (repeatable)
        #[arg(long = "category", value_name = "UUID")]
        categories: Vec<Uuid>,
        #[arg(long, value_enum, default_value = "day")]
        group_by: GroupArg,
        /// Number of top transactions; defaults to the configured value
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Goal and investment figures for one month
    Stats {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Income,
    Expense,
    Saving,
}

impl From<KindArg> for MovementType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => MovementType::Income,
            KindArg::Expense => MovementType::Expense,
            KindArg::Saving => MovementType::Saving,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GroupArg {
    Day,
    Month,
}

impl From<GroupArg> for GroupBy {
    fn from(group: GroupArg) -> Self {
        match group {
            GroupArg::Day => GroupBy::Day,
            GroupArg::Month => GroupBy::Month,
        }
    }
}

fn main() -> ExitCode {
    init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> CliResult<()> {
    let config = ConfigManager::new()?.load()?;
    let ledger_path = args
        .ledger
        .clone()
        .or_else(|| config.ledger_path.clone())
        .ok_or("no ledger given; pass --ledger or set `ledger_path` in the config file")?;
    let user: UserId = args.user.ok_or("--user is required")?;
    let reader = JsonLedgerReader::open(ledger_path)?;
    let today = Local::now().date_naive();

    match args.command {
        Command::Report { date, year } => {
            let mode = if year { ViewMode::Year } else { config.default_view };
            let request =
                ReportRequest::new(user, date.unwrap_or(today), mode).with_config(&config);
            let report = AnalyticsService::report(&reader, &request)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, &config);
            }
        }
        Command::Explore {
            from,
            to,
            kind,
            categories,
            group_by,
            limit,
        } => {
            let mut filter = FilterOptions::new(DateWindow::new(from, to)?, group_by.into())
                .with_categories(categories)
                .with_top_limit(limit.unwrap_or(config.top_transactions));
            if let Some(kind) = kind {
                filter = filter.with_kind(kind.into());
            }
            let result = AnalyticsService::explore(&reader, user, &filter)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_query(&result, &config);
            }
        }
        Command::Stats { date } => {
            let stats = AnalyticsService::monthly_stats(&reader, user, date.unwrap_or(today))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                let money = Money::new(&config);
                println!("{} {}", "Ahorrado:".bold(), money.format(stats.saved));
                println!("{} {}", "Invertido:".bold(), money.format(stats.invested));
            }
        }
    }
    Ok(())
}

struct Money {
    locale: LocaleConfig,
    currency: String,
}

impl Money {
    fn new(config: &Config) -> Self {
        Self {
            locale: config.locale_config(),
            currency: config.currency.clone(),
        }
    }

    fn format(&self, amount: f64) -> String {
        format_currency(amount, &self.currency, &self.locale)
    }
}

fn print_report(report: &AnalyticsReport, config: &Config) {
    let money = Money::new(config);
    println!("{}", report.label.to_uppercase().bold().underline());
    println!();

    for comparison in &report.comparisons {
        println!(
            "  {:<12} {:>14}  {}",
            comparison.metric.label(),
            money.format(comparison.current),
            change_badge(comparison)
        );
    }
    println!(
        "  {:<12} {:>14}",
        "Balance",
        money.format(report.current.balance())
    );

    if !report.expense_breakdown.is_empty() {
        println!();
        println!("{}", "Gastos por categoría".bold());
        for row in report.expense_breakdown.iter().take(5) {
            println!(
                "  {:<20} {:>14}  {:>4}%",
                row.name,
                money.format(row.total),
                format_percent(row.percentage)
            );
        }
    }

    if report.total_invested != 0.0 {
        println!();
        println!(
            "{} {}",
            "Total invertido:".bold(),
            money.format(report.total_invested)
        );
    }

    if !report.insights.is_empty() {
        println!();
        println!("{}", "Análisis".bold());
        for insight in &report.insights {
            let bullet = match insight.kind {
                InsightKind::Info => "•".blue(),
                InsightKind::Success => "✓".green(),
                InsightKind::Warning => "!".yellow(),
            };
            println!("  {} {}", bullet, insight.message);
        }
    }
}

fn change_badge(comparison: &Comparison) -> String {
    let Some(change) = comparison.change else {
        return "-".dimmed().to_string();
    };
    let arrow = if change >= 0.0 { "▲" } else { "▼" };
    let text = format!("{} {}%", arrow, format_percent(change.abs()));
    match comparison.trend() {
        Trend::Favorable => text.green().to_string(),
        Trend::Unfavorable => text.red().to_string(),
        Trend::Flat | Trend::Unknown => text.dimmed().to_string(),
    }
}

fn print_query(result: &QueryResult, config: &Config) {
    let money = Money::new(config);
    println!(
        "{} {} ({} movimientos)",
        "Total:".bold(),
        money.format(result.total),
        result.matched
    );
    println!();
    for point in result.series.iter().filter(|point| point.amount != 0.0) {
        println!("  {:<10} {:>14}", point.label, money.format(point.amount));
    }
    if !result.top_transactions.is_empty() {
        println!();
        println!("{}", "Mayores movimientos".bold());
        for movement in &result.top_transactions {
            println!(
                "  {}  {:>14}  {}",
                movement.date,
                money.format(movement.amount),
                movement.concept.as_deref().unwrap_or("")
            );
        }
    }
}
