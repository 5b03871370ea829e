//! Paginates through a listing site, extracts one record per listed item
//! and saves the records as CSV.

pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod paginate;
pub mod providers;
pub mod results;
pub mod schema;
pub mod sink;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use config::{PageErrorPolicy, RunConfig};
pub use error::RunError;
pub use results::{Record, RunResult};

use paginate::Paginator;
use providers::{PageProvider, WebDriverPages};
use sink::CsvSink;

/// Run a full scrape against a live browser
///
/// The configuration is validated before any connection is made.
pub async fn run(config: &RunConfig) -> Result<RunResult, RunError> {
    config.validate()?;

    ::log::info!("Starting scrape of {}", config.base_url);
    let provider = WebDriverPages::connect(&config.webdriver_url, config.headless).await?;

    scrape_and_close(config, provider).await
}

/// Run a full scrape with an already acquired provider
///
/// The provider is closed before returning, whatever the outcome, including
/// an invalid configuration.
pub async fn run_with_provider<P: PageProvider>(
    config: &RunConfig,
    provider: P,
) -> Result<RunResult, RunError> {
    if let Err(e) = config.validate() {
        close_provider(provider).await;
        return Err(e.into());
    }

    scrape_and_close(config, provider).await
}

async fn scrape_and_close<P: PageProvider>(
    config: &RunConfig,
    mut provider: P,
) -> Result<RunResult, RunError> {
    let outcome = scrape(config, &mut provider).await;
    close_provider(provider).await;
    outcome
}

async fn close_provider<P: PageProvider>(provider: P) {
    if let Err(e) = provider.close().await {
        ::log::warn!("{}", e);
    }
}

/// Expects a validated configuration
async fn scrape<P: PageProvider>(config: &RunConfig, provider: &mut P) -> Result<RunResult, RunError> {
    let paginator = Paginator::new(config)?;

    let sink_error = |source| RunError::Sink {
        path: config.output_path.clone(),
        source,
    };
    let mut sink = CsvSink::create(&config.output_path).map_err(sink_error)?;

    let result = paginator.run(provider, &mut sink).await.map_err(sink_error)?;
    sink.finish().map_err(sink_error)?;

    ::log::info!(
        "Data saved to {} ({} records)",
        config.output_path.display(),
        result.records.len()
    );
    Ok(result)
}
