use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Problems with the run parameters, reported before any network activity
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please provide a base URL")]
    MissingBaseUrl,

    #[error("Please provide an output file path")]
    MissingOutputPath,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid {name} selector '{selector}': {message}")]
    InvalidSelector {
        name: &'static str,
        selector: String,
        message: String,
    },

    #[error("Invalid item link pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Failure to load or query a listing page
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Could not connect to WebDriver at {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Failed to load {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("No element matching '{selector}' appeared within {}s", .waited.as_secs_f64())]
    Timeout { selector: String, waited: Duration },

    #[error("Query '{selector}' failed: {message}")]
    Query { selector: String, message: String },

    #[error("Failed to close browser session: {0}")]
    Close(String),
}

/// Failure to read something inside an item element
#[derive(Debug, Error)]
pub enum ElementError {
    #[error("no element matches '{0}'")]
    NotFound(String),

    #[error("invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("{0}")]
    Driver(String),
}

/// Why an item container produced no record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing {field}: {source}")]
    MissingField {
        field: &'static str,
        source: ElementError,
    },

    #[error("failed to list links: {0}")]
    Links(ElementError),

    #[error("no item link among {links_seen} links")]
    NoItemLink { links_seen: usize },

    #[error("link {position} has no readable target")]
    LinkWithoutTarget {
        position: usize,
        source: Option<ElementError>,
    },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Terminal failure of a whole run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] PageError),

    #[error("Failed to write {path}: {source}")]
    Sink { path: PathBuf, source: SinkError },
}
