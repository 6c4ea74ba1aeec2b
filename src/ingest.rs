use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::collectors::CollectedJob;
use crate::error::CollectorError;

const INGEST_PATH: &str = "/api/v1/collect/ingest";
const INGEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
pub struct IngestRequest<'a> {
    pub collector_name: &'a str,
    pub jobs: &'a [CollectedJob],
}

/// Counts reported by JobTracker for one ingest call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestResult {
    pub found: i64,
    pub new: i64,
    pub updated: i64,
    #[serde(deserialize_with = "string_or_number")]
    pub run_id: String,
}

impl fmt::Display for IngestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ingested {} jobs (new: {}, updated: {}, run_id: {})",
            self.found, self.new, self.updated, self.run_id
        )
    }
}

/// JobTracker answers with an integer run id; accept strings as well.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RunId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RunId::deserialize(deserializer)? {
        RunId::Text(s) => s,
        RunId::Number(n) => n.to_string(),
    })
}

/// Client for the JobTracker batch ingest API.
pub struct Ingestor {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl Ingestor {
    pub fn new(base_url: &str, token: &str) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder()
            .timeout(INGEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("{}{INGEST_PATH}", self.base_url)
    }

    /// POST all jobs in one batch. Not retried; a failed run can simply be
    /// started again since the endpoint upserts by source id.
    pub async fn ingest(
        &self,
        collector_name: &str,
        jobs: &[CollectedJob],
    ) -> Result<IngestResult, CollectorError> {
        let url = self.url();
        tracing::info!("Posting {} jobs to {url}", jobs.len());

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&IngestRequest {
                collector_name,
                jobs,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CollectorError::Http {
                target: "JobTracker ingest",
                status: status.as_u16(),
            });
        }

        Ok(resp.json::<IngestResult>().await?)
    }
}
