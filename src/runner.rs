use crate::collectors::hiringcafe::HiringCafe;
use crate::collectors::{CollectedJob, JobCollector};
use crate::config::Config;
use crate::error::CollectorError;
use crate::ingest::{IngestResult, Ingestor};

const PREVIEW_LIMIT: usize = 5;

/// How a collection run ended.
#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    /// Nothing matched; the ingest endpoint was not called.
    NoJobs,
    /// Jobs were collected but `--dry-run` skipped ingestion.
    DryRun { collected: usize },
    Ingested(IngestResult),
}

/// Lines printed for a dry run: the first few jobs and how many were left out.
pub fn preview(jobs: &[CollectedJob]) -> Vec<String> {
    let mut lines: Vec<String> = jobs
        .iter()
        .take(PREVIEW_LIMIT)
        .map(|job| format!("  - {} at {}", job.title, job.company_name))
        .collect();
    if jobs.len() > PREVIEW_LIMIT {
        lines.push(format!("  ... and {} more", jobs.len() - PREVIEW_LIMIT));
    }
    lines
}

/// Collect from HiringCafe and ingest into JobTracker, printing a summary.
/// The ingest token is checked before any request goes out.
pub async fn run(config: &Config) -> Result<RunOutcome, CollectorError> {
    let token = if config.dry_run {
        None
    } else {
        Some(config.ingest_token()?)
    };

    println!(
        "Collecting from HiringCafe (query={:?}, max_pages={})",
        config.query, config.pages
    );
    let collector = HiringCafe::new(&config.search_url, config.search_overrides())?;
    let jobs = collector.collect(&config.query, config.pages).await?;
    println!("Collected {} jobs total", jobs.len());

    if jobs.is_empty() {
        println!("No jobs found, exiting");
        return Ok(RunOutcome::NoJobs);
    }

    let Some(token) = token else {
        println!("Dry run: would ingest {} jobs", jobs.len());
        for line in preview(&jobs) {
            println!("{line}");
        }
        return Ok(RunOutcome::DryRun {
            collected: jobs.len(),
        });
    };

    println!("Ingesting {} jobs to {}...", jobs.len(), config.jobtracker_url);
    let ingestor = Ingestor::new(&config.jobtracker_url, token)?;
    let result = ingestor.ingest(collector.name(), &jobs).await?;
    tracing::info!("Ingest run {} finished", result.run_id);
    println!("{result}");

    Ok(RunOutcome::Ingested(result))
}
