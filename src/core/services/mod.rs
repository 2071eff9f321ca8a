pub mod analytics_service;

pub use analytics_service::{AnalyticsReport, AnalyticsService, ReportRequest};

use crate::errors::AnalyticsError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error("{0}")]
    Invalid(String),
}
