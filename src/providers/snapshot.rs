use crate::error::{ElementError, PageError};
use crate::providers::{ItemElement, PageProvider};
use crate::utils::normalize_whitespace;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a `StaticPages` provider was asked to do
#[derive(Debug, Default, Clone)]
pub struct ProviderLog {
    /// Every URL passed to `navigate`, in order
    pub navigations: Vec<String>,

    /// Whether `close` was called
    pub closed: bool,
}

/// Serves saved HTML snapshots instead of rendering pages live
///
/// A static document never changes, so the readiness wait either matches at
/// once or fails at once without sleeping.
#[derive(Debug, Default)]
pub struct StaticPages {
    pages: HashMap<String, Arc<str>>,
    current: Option<Arc<str>>,
    log: Arc<Mutex<ProviderLog>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the HTML returned for `url`
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Arc::from(html.into()));
        self
    }

    /// Shared handle on the navigation log, readable after the provider is consumed
    pub fn log(&self) -> Arc<Mutex<ProviderLog>> {
        Arc::clone(&self.log)
    }

    fn record(&self, update: impl FnOnce(&mut ProviderLog)) {
        if let Ok(mut log) = self.log.lock() {
            update(&mut log);
        }
    }

    fn current_page(&self, selector: &str) -> Result<&Arc<str>, PageError> {
        match &self.current {
            Some(page) => Ok(page),
            None => Err(PageError::Query {
                selector: selector.to_string(),
                message: "no page loaded".to_string(),
            }),
        }
    }
}

fn parse_page_selector(selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|e| PageError::Query {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl PageProvider for StaticPages {
    type Element = SnapshotElement;

    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.record(|log| log.navigations.push(url.to_string()));

        match self.pages.get(url) {
            Some(page) => {
                self.current = Some(Arc::clone(page));
                Ok(())
            }
            None => {
                self.current = None;
                Err(PageError::Navigation {
                    url: url.to_string(),
                    message: "no snapshot for this URL".to_string(),
                })
            }
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        wait: Duration,
    ) -> Result<(), PageError> {
        let parsed = parse_page_selector(selector)?;
        let document = Html::parse_document(self.current_page(selector)?);
        let found = document.select(&parsed).next().is_some();
        if found {
            Ok(())
        } else {
            Err(PageError::Timeout {
                selector: selector.to_string(),
                waited: wait,
            })
        }
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, PageError> {
        let parsed = parse_page_selector(selector)?;
        let page = self.current_page(selector)?;
        let document = Html::parse_document(page);

        let elements = document
            .tree
            .root()
            .descendants()
            .enumerate()
            .filter_map(|(index, node)| {
                let element = ElementRef::wrap(node)?;
                parsed
                    .matches(&element)
                    .then(|| SnapshotElement::new(page, index))
            })
            .collect();
        Ok(elements)
    }

    async fn close(self) -> Result<(), PageError> {
        self.record(|log| log.closed = true);
        Ok(())
    }
}

/// An element of a snapshot, addressed by its position in the page tree
///
/// The whole page is kept so queries see the element in its real context:
/// table rows stay inside their table and selectors may name ancestors.
/// Parsing is deterministic, so the position is stable across re-parses.
#[derive(Debug, Clone)]
pub struct SnapshotElement {
    page: Arc<str>,
    index: usize,
}

impl SnapshotElement {
    fn new(page: &Arc<str>, index: usize) -> Self {
        Self {
            page: Arc::clone(page),
            index,
        }
    }

    /// Run `f` on this element inside a fresh parse of its page
    fn with_element<T>(&self, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        let document = Html::parse_document(&self.page);
        let node = document.tree.root().descendants().nth(self.index)?;
        ElementRef::wrap(node).map(f)
    }

    /// Descendants of the element (never the element itself) matching `selector`
    fn select_descendants(&self, selector: &str) -> Result<Vec<SnapshotElement>, ElementError> {
        let parsed =
            Selector::parse(selector).map_err(|_| ElementError::InvalidSelector(selector.to_string()))?;
        let matches = self
            .with_element(|scope| {
                // Pre-order: the scope's subtree follows it contiguously
                scope
                    .descendants()
                    .enumerate()
                    .skip(1)
                    .filter_map(|(offset, node)| {
                        let element = ElementRef::wrap(node)?;
                        parsed
                            .matches(&element)
                            .then(|| SnapshotElement::new(&self.page, self.index + offset))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }
}

#[async_trait]
impl ItemElement for SnapshotElement {
    async fn find_first(&self, selector: &str) -> Result<Self, ElementError> {
        self.select_descendants(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| ElementError::NotFound(selector.to_string()))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, ElementError> {
        self.select_descendants(selector)
    }

    async fn text(&self) -> Result<String, ElementError> {
        Ok(self
            .with_element(|element| normalize_whitespace(&element.text().collect::<String>()))
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, ElementError> {
        Ok(self
            .with_element(|element| element.value().attr(name).map(str::to_string))
            .flatten())
    }
}
