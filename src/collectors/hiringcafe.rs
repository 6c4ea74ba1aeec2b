use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::collectors::fetch::{PAGE_SIZE, PageFetcher, Pause, TokioPause};
use crate::collectors::mapper::{SOURCE, map_job};
use crate::collectors::state::{SearchOverrides, SearchState, build_state, encode_state};
use crate::collectors::{CollectedJob, JobCollector};
use crate::error::CollectorError;

const PAGE_DELAY: Duration = Duration::from_secs(3);

pub struct HiringCafe {
    fetcher: PageFetcher,
    overrides: SearchOverrides,
    pause: Arc<dyn Pause>,
    page_delay: Duration,
}

impl HiringCafe {
    pub fn new(base_url: &str, overrides: SearchOverrides) -> Result<Self, CollectorError> {
        Ok(Self::with_fetcher(
            PageFetcher::new(base_url)?,
            overrides,
            Arc::new(TokioPause),
        ))
    }

    /// Build a collector around an existing fetcher. `pause` is used for the
    /// delay between pages.
    pub fn with_fetcher(
        fetcher: PageFetcher,
        overrides: SearchOverrides,
        pause: Arc<dyn Pause>,
    ) -> Self {
        Self {
            fetcher,
            overrides,
            pause,
            page_delay: PAGE_DELAY,
        }
    }

    /// The query goes through `build_state`; configured filters are applied
    /// on top.
    fn search_state(&self, query: &str) -> SearchState {
        self.overrides.clone().apply(build_state(Some(query)))
    }
}

#[async_trait]
impl JobCollector for HiringCafe {
    fn name(&self) -> &str {
        SOURCE
    }

    /// Walk result pages in order until `max_pages` or a short page.
    async fn collect(
        &self,
        query: &str,
        max_pages: u32,
    ) -> Result<Vec<CollectedJob>, CollectorError> {
        let encoded = encode_state(&self.search_state(query));

        let mut jobs = Vec::new();
        let mut dropped = 0;
        for page in 0..max_pages {
            if page > 0 {
                self.pause.pause(self.page_delay).await;
            }

            let data = self.fetcher.fetch(&encoded, page).await?;
            let before = jobs.len();
            jobs.extend(data.results.iter().filter_map(map_job));
            let mapped = jobs.len() - before;
            let skipped = data.results.len() - mapped;
            dropped += skipped;

            tracing::info!("Page {page}: {mapped} jobs");
            tracing::debug!(
                "Page {page}: {} results, {skipped} skipped",
                data.results.len()
            );
            if let Some(total) = data.total {
                tracing::debug!("HiringCafe reports {total} matching jobs");
            }

            if data.results.len() < PAGE_SIZE {
                break;
            }
        }

        if dropped > 0 {
            tracing::debug!("Skipped {dropped} results without job data or id");
        }
        Ok(jobs)
    }
}
