use crate::config::{PageErrorPolicy, RunConfig};
use crate::error::{ConfigError, PageError, SinkError};
use crate::extract::RecordExtractor;
use crate::providers::PageProvider;
use crate::results::{PageHalt, Record, RunResult};
use crate::sink::CsvSink;
use crate::utils::paginated_url;
use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;
use url::Url;

/// Walks the listing pages of one run, strictly one after another
pub struct Paginator {
    base_url: String,
    max_pages: u32,
    wait_timeout: Duration,
    page_delay: Duration,
    policy: PageErrorPolicy,
    extractor: RecordExtractor,
}

impl Paginator {
    pub fn new(config: &RunConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.base_url.clone(),
            max_pages: config.max_pages,
            wait_timeout: config.wait_timeout(),
            page_delay: config.page_delay(),
            policy: config.on_page_error,
            extractor: RecordExtractor::new(config.schema.clone())?,
        })
    }

    /// Visit pages `1..=max_pages`, appending each page's records to `sink`
    ///
    /// A page that fails to load is handled by the configured policy. Only a
    /// sink failure is returned as an error; page failures end up in the
    /// result.
    pub async fn run<P: PageProvider, W: Write>(
        &self,
        provider: &mut P,
        sink: &mut CsvSink<W>,
    ) -> Result<RunResult, SinkError> {
        let mut result = RunResult::default();

        for page in 1..=self.max_pages {
            let url = paginated_url(&self.base_url, page);
            ::log::info!("Scraping page {}...", page);

            match self.scrape_page_with_policy(provider, page, &url).await {
                Ok(records) => {
                    sink.append(&records)?;
                    ::log::info!("Kept {} records from page {}", records.len(), page);
                    result.records.extend(records);
                    result.pages_visited += 1;
                }
                Err(error) if self.policy == PageErrorPolicy::Skip => {
                    ::log::warn!("Skipping page {}: {}", page, error);
                    result.skipped_pages.push(page);
                }
                Err(error) => {
                    ::log::error!("Error loading page {}: {}", page, error);
                    result.halted = Some(PageHalt { page, url, error });
                    break;
                }
            }

            // Pause after every page, the last one included
            tokio::time::sleep(self.page_delay).await;
        }

        Ok(result)
    }

    /// Scrape one page, reloading it as often as the retry policy allows
    async fn scrape_page_with_policy<P: PageProvider>(
        &self,
        provider: &mut P,
        page: u32,
        url: &str,
    ) -> Result<Vec<Record>, PageError> {
        let retries = match self.policy {
            PageErrorPolicy::Retry { attempts } => attempts,
            PageErrorPolicy::FailFast | PageErrorPolicy::Skip => 0,
        };

        let mut attempt = 0;
        loop {
            match self.scrape_page(provider, page, url).await {
                Ok(records) => return Ok(records),
                Err(error) if attempt < retries => {
                    attempt += 1;
                    ::log::warn!(
                        "Page {} failed ({}), retrying ({}/{})",
                        page,
                        error,
                        attempt,
                        retries
                    );
                    tokio::time::sleep(self.page_delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn scrape_page<P: PageProvider>(
        &self,
        provider: &mut P,
        page: u32,
        url: &str,
    ) -> Result<Vec<Record>, PageError> {
        let schema = self.extractor.schema();

        provider.navigate(url).await?;
        provider
            .wait_for_selector(&schema.item, self.wait_timeout)
            .await?;
        ::log::debug!("Grid items loaded for page {}", page);

        let items = provider.find_all(&schema.item).await?;
        ::log::info!("Found {} items on page {}", items.len(), page);

        // Relative links are resolved against the page; an unparseable base
        // URL only means relative links cannot be resolved
        let page_url = Url::parse(url).ok();

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.extractor.extract(item, page_url.as_ref()).await {
                Ok(record) => {
                    if seen.insert(record.item_url.clone()) {
                        records.push(record);
                    } else {
                        ::log::debug!(
                            "Dropping duplicate item {} on page {}",
                            record.item_url,
                            page
                        );
                    }
                }
                Err(e) => {
                    ::log::warn!(
                        "Error extracting item {} on page {}: {}",
                        index + 1,
                        page,
                        e
                    );
                }
            }
        }

        Ok(records)
    }
}
