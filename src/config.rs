use crate::error::ConfigError;
use crate::schema::PageSchema;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What to do when a listing page fails to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PageErrorPolicy {
    /// Stop the run at the first page that fails
    #[default]
    FailFast,

    /// Log the failure and continue with the next page
    Skip,

    /// Reload the same page up to `attempts` more times, then stop the run
    Retry { attempts: u32 },
}

/// Parameters of a single scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Listing URL, already carrying at least one query parameter
    #[serde(default)]
    pub base_url: String,

    /// Number of pages to visit, starting from page 1
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// CSV file to write, replaced if it exists
    #[serde(default)]
    pub output_path: PathBuf,

    /// How long to wait for the first item to render on each page
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Pause after every page
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    #[serde(default)]
    pub on_page_error: PageErrorPolicy,

    /// Selectors for the listing markup
    #[serde(default)]
    pub schema: PageSchema,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Ask the browser to run without a window
    #[serde(default)]
    pub headless: bool,
}

fn default_max_pages() -> u32 {
    1
}

fn default_wait_timeout_secs() -> u64 {
    10
}

fn default_page_delay_ms() -> u64 {
    2000
}

/// Default value for webdriver_url
pub fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

impl RunConfig {
    /// Create a configuration with default settings for everything else
    pub fn new(base_url: &str, max_pages: u32, output_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.to_string(),
            max_pages,
            output_path: output_path.into(),
            wait_timeout_secs: default_wait_timeout_secs(),
            page_delay_ms: default_page_delay_ms(),
            on_page_error: PageErrorPolicy::default(),
            schema: PageSchema::default(),
            webdriver_url: default_webdriver_url(),
            headless: false,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let read_error = |source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(read_error)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(read_error)?;

        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject configurations a run cannot start with
    ///
    /// Only emptiness is checked; the base URL is not parsed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingOutputPath);
        }
        self.schema.validate()
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}
