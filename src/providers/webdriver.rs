use crate::error::{ElementError, PageError};
use crate::providers::{ItemElement, PageProvider};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// How often the readiness wait re-queries the page
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Endpoints tried when the configured WebDriver URL does not answer
const FALLBACK_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Pages rendered by a real browser through a WebDriver session
pub struct WebDriverPages {
    client: Client,
}

impl WebDriverPages {
    /// Open a browser session, trying common local endpoints if needed
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, PageError> {
        let first_error = match open_session(webdriver_url, headless).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
                e
            }
        };

        for url in FALLBACK_URLS.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = open_session(url, headless).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(PageError::Connect {
            url: webdriver_url.to_string(),
            message: first_error,
        })
    }
}

async fn open_session(url: &str, headless: bool) -> Result<Client, String> {
    let mut builder = ClientBuilder::native();
    if headless {
        let mut capabilities = serde_json::Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless=new"] }),
        );
        builder.capabilities(capabilities);
    }
    builder.connect(url).await.map_err(|e| e.to_string())
}

fn query_error(selector: &str, error: CmdError) -> PageError {
    PageError::Query {
        selector: selector.to_string(),
        message: error.to_string(),
    }
}

/// Re-query until the selector matches something
async fn poll_for_element(client: &Client, selector: &str) -> Result<(), PageError> {
    loop {
        let found = client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| query_error(selector, e))?;
        if !found.is_empty() {
            return Ok(());
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[async_trait]
impl PageProvider for WebDriverPages {
    type Element = WebDriverElement;

    async fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| PageError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        wait: Duration,
    ) -> Result<(), PageError> {
        match timeout(wait, poll_for_element(&self.client, selector)).await {
            Ok(result) => result,
            Err(_) => Err(PageError::Timeout {
                selector: selector.to_string(),
                waited: wait,
            }),
        }
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, PageError> {
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| query_error(selector, e))?;
        Ok(elements.into_iter().map(WebDriverElement).collect())
    }

    async fn close(self) -> Result<(), PageError> {
        self.client
            .close()
            .await
            .map_err(|e| PageError::Close(e.to_string()))
    }
}

/// An element living in the browser
#[derive(Debug, Clone)]
pub struct WebDriverElement(Element);

fn element_error(selector: &str, error: CmdError) -> ElementError {
    if error.is_no_such_element() {
        ElementError::NotFound(selector.to_string())
    } else {
        ElementError::Driver(error.to_string())
    }
}

#[async_trait]
impl ItemElement for WebDriverElement {
    async fn find_first(&self, selector: &str) -> Result<Self, ElementError> {
        self.0
            .find(Locator::Css(selector))
            .await
            .map(WebDriverElement)
            .map_err(|e| element_error(selector, e))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Self>, ElementError> {
        let elements = self
            .0
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| element_error(selector, e))?;
        Ok(elements.into_iter().map(WebDriverElement).collect())
    }

    async fn text(&self) -> Result<String, ElementError> {
        self.0
            .text()
            .await
            .map_err(|e| ElementError::Driver(e.to_string()))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, ElementError> {
        self.0
            .attr(name)
            .await
            .map_err(|e| ElementError::Driver(e.to_string()))
    }
}
