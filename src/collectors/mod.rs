// Job source collectors.
// Defines the collected job shape and the trait every source implements.

pub mod fetch;
pub mod hiringcafe;
pub mod mapper;
pub mod state;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CollectorError;

/// A job normalized from an external source, in the shape the JobTracker
/// ingest endpoint accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedJob {
    pub company_name: String,
    pub title: String,
    pub url: Option<String>,
    pub location: Option<String>,
    pub remote_type: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    pub description: Option<String>,
    pub source: String,
    pub source_id: String,
    pub raw_data: serde_json::Value,
}

/// Trait that all job collectors must implement.
#[async_trait]
pub trait JobCollector: Send + Sync {
    /// Collector name reported to the ingest endpoint.
    fn name(&self) -> &str;

    /// Fetch up to `max_pages` pages of jobs matching `query`.
    async fn collect(
        &self,
        query: &str,
        max_pages: u32,
    ) -> Result<Vec<CollectedJob>, CollectorError>;
}
