use clap::{Parser, ValueEnum};
use listing_scrape::RunConfig;
use listing_scrape::config::PageErrorPolicy;
use listing_scrape::error::ConfigError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-scrape")]
#[command(about = "Scrapes item records from a paginated listing into a CSV file")]
#[command(version)]
pub struct Args {
    /// Listing URL; must already contain a query string (e.g. ".../catalog?search_text=coat")
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,

    /// Number of pages to scrape
    #[arg(short = 'p', long)]
    pub max_pages: Option<u32>,

    /// CSV file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// What to do when a page fails to load
    #[arg(long, value_enum)]
    pub on_page_error: Option<PageErrorArg>,

    /// Extra attempts per page with --on-page-error retry [default: 1, or
    /// the config file's attempts]
    #[arg(long)]
    pub retries: Option<u32>,

    /// Pause after each page, in milliseconds
    #[arg(long)]
    pub page_delay_ms: Option<u64>,

    /// Seconds to wait for items to appear on a page
    #[arg(long)]
    pub wait_timeout: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PageErrorArg {
    FailFast,
    Skip,
    Retry,
}

impl Args {
    /// Merge the config file (if any), the environment and the flags
    pub fn into_run_config(self) -> Result<RunConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::new("", 1, ""),
        };

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }
        if let Some(webdriver_url) = self.webdriver_url {
            config.webdriver_url = webdriver_url;
        }

        config.headless |= self.headless;
        match (self.on_page_error, self.retries) {
            (Some(policy), retries) => {
                config.on_page_error = convert_policy(policy, retries, config.on_page_error);
            }
            // A bare --retries adjusts a retry policy from the config file
            (None, Some(retries)) => {
                if let PageErrorPolicy::Retry { attempts } = &mut config.on_page_error {
                    *attempts = retries;
                }
            }
            (None, None) => {}
        }
        if let Some(delay) = self.page_delay_ms {
            config.page_delay_ms = delay;
        }
        if let Some(wait) = self.wait_timeout {
            config.wait_timeout_secs = wait;
        }

        Ok(config)
    }
}

/// Convert from CLI argument policy to the run policy
///
/// Without `--retries` a retry policy keeps the attempts of `current`, so
/// naming the policy on the command line does not reset a config file value.
pub fn convert_policy(
    arg: PageErrorArg,
    retries: Option<u32>,
    current: PageErrorPolicy,
) -> PageErrorPolicy {
    match arg {
        PageErrorArg::FailFast => PageErrorPolicy::FailFast,
        PageErrorArg::Skip => PageErrorPolicy::Skip,
        PageErrorArg::Retry => {
            let attempts = retries.unwrap_or(match current {
                PageErrorPolicy::Retry { attempts } => attempts,
                PageErrorPolicy::FailFast | PageErrorPolicy::Skip => 1,
            });
            PageErrorPolicy::Retry { attempts }
        }
    }
}
