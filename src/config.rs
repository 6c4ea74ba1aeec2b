use clap::Parser;

use crate::collectors::fetch::DEFAULT_BASE_URL;
use crate::collectors::state::SearchOverrides;
use crate::error::CollectorError;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hiringcafe-collector",
    about = "Collect jobs from HiringCafe and ingest them into JobTracker"
)]
pub struct Config {
    /// Job title search query
    #[arg(long, default_value = "")]
    pub query: String,

    /// Maximum pages to fetch (40 jobs/page)
    #[arg(long, default_value_t = 5)]
    pub pages: u32,

    /// Collect but don't ingest
    #[arg(long)]
    pub dry_run: bool,

    /// JobTracker base URL
    #[arg(long, env = "JOBTRACKER_URL", default_value = "http://localhost:8080")]
    pub jobtracker_url: String,

    /// JobTracker API token (required unless --dry-run)
    #[arg(long, env = "JOBTRACKER_TOKEN", hide_env_values = true)]
    pub jobtracker_token: Option<String>,

    /// HiringCafe base URL
    #[arg(long, env = "HIRINGCAFE_URL", default_value = DEFAULT_BASE_URL)]
    pub search_url: String,

    /// Job description search query
    #[arg(long)]
    pub description_query: Option<String>,

    /// Only jobs fetched within the past N days
    #[arg(long, env = "HIRINGCAFE_DAYS")]
    pub days: Option<u32>,

    /// Workplace type filter (repeatable), e.g. Remote
    #[arg(long = "workplace-type")]
    pub workplace_types: Vec<String>,

    /// Commitment type filter (repeatable), e.g. Full-time
    #[arg(long = "commitment-type")]
    pub commitment_types: Vec<String>,

    /// Department filter (repeatable)
    #[arg(long = "department")]
    pub departments: Vec<String>,

    /// Industry filter (repeatable)
    #[arg(long = "industry")]
    pub industries: Vec<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    /// The ingest token, treating an empty value as missing.
    pub fn ingest_token(&self) -> Result<&str, CollectorError> {
        self.jobtracker_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                CollectorError::Configuration(
                    "JOBTRACKER_TOKEN is required (set env var)".to_string(),
                )
            })
    }

    /// Search filters given on the command line. The title query is passed
    /// to the collector separately.
    pub fn search_overrides(&self) -> SearchOverrides {
        let non_empty = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());

        SearchOverrides {
            job_title_query: None,
            job_description_query: self.description_query.clone(),
            locations: None,
            workplace_types: non_empty(&self.workplace_types),
            commitment_types: non_empty(&self.commitment_types),
            date_fetched_past_n_days: self.days,
            departments: non_empty(&self.departments),
            industries: non_empty(&self.industries),
        }
    }
}
