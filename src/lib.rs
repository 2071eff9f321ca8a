#![doc(test(attr(deny(warnings))))]

//! Analytics Core turns a user's movements, goal contributions and investment
//! contributions into period summaries, category breakdowns, yearly rollups,
//! period-over-period comparisons and plain-language insights.

pub mod analytics;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod format;
pub mod period;
pub mod storage;
pub mod utils;

pub use errors::{AnalyticsError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Analytics Core tracing initialized.");
    });
}
