pub mod snapshot;
pub mod webdriver;

pub use snapshot::{SnapshotElement, StaticPages};
pub use webdriver::{WebDriverElement, WebDriverPages};

use crate::error::{ElementError, PageError};
use async_trait::async_trait;
use std::time::Duration;

/// An element of a rendered page that can be queried further
#[async_trait]
pub trait ItemElement: Send + Sync + Sized {
    /// First descendant matching a CSS selector
    async fn find_first(&self, selector: &str) -> Result<Self, ElementError>;

    /// All descendants matching a CSS selector, in document order
    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, ElementError>;

    /// Text content of the element
    async fn text(&self) -> Result<String, ElementError>;

    /// Value of an attribute, `None` when the element does not carry it
    async fn attribute(&self, name: &str) -> Result<Option<String>, ElementError>;
}

/// Source of rendered listing pages
///
/// A provider holds one current document: `navigate` replaces it and the
/// query methods operate on it. A provider is owned by a single run and must
/// be released with `close`.
#[async_trait]
pub trait PageProvider: Send + Sized {
    type Element: ItemElement;

    /// Load a URL and make it the current document
    async fn navigate(&mut self, url: &str) -> Result<(), PageError>;

    /// Wait until at least one element matches `selector`
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration)
    -> Result<(), PageError>;

    /// All elements of the current document matching `selector`
    async fn find_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, PageError>;

    /// Release the underlying browser session
    async fn close(self) -> Result<(), PageError>;
}
