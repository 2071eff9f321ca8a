use chrono::NaiveDate;

/// A ledger row that carries a calendar date and a numeric amount.
///
/// Each row kind decides which of its own fields is the bucketing date; callers
/// never compare timestamps of different row kinds directly.
pub trait LedgerRow {
    fn ledger_date(&self) -> NaiveDate;
    fn amount(&self) -> f64;
}
