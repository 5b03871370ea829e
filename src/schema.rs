use crate::error::ConfigError;
use crate::filter::LinkFilter;
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// CSS selectors describing the markup of one listing layout
///
/// The defaults match the grid layout the scraper was written for. Another
/// layout can be supported by supplying a different schema in the config
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSchema {
    /// One element per listed item
    #[serde(default = "default_item")]
    pub item: String,

    /// Item title, relative to the item element
    #[serde(default = "default_title")]
    pub title: String,

    /// Displayed price, relative to the item element
    #[serde(default = "default_price")]
    pub price: String,

    /// Favourites counter text, relative to the item element
    #[serde(default = "default_favourites")]
    pub favourites: String,

    /// Hyperlinks inside the item element
    #[serde(default = "default_link")]
    pub link: String,

    /// Regex patterns a link target must match to be the item's own URL
    #[serde(default = "default_item_link_include")]
    pub item_link_include: Vec<String>,

    /// Regex patterns that disqualify a link target
    #[serde(default)]
    pub item_link_exclude: Vec<String>,
}

fn default_item() -> String {
    r#"[data-testid="grid-item"]"#.to_string()
}

fn default_title() -> String {
    r#"[data-testid*="description-title"]"#.to_string()
}

fn default_price() -> String {
    r#"[data-testid*="price-text"]"#.to_string()
}

fn default_favourites() -> String {
    r#"[data-testid*="favourite"] .web_ui__Text__caption"#.to_string()
}

fn default_link() -> String {
    "a".to_string()
}

fn default_item_link_include() -> Vec<String> {
    vec![regex::escape("/items/")]
}

impl Default for PageSchema {
    fn default() -> Self {
        Self {
            item: default_item(),
            title: default_title(),
            price: default_price(),
            favourites: default_favourites(),
            link: default_link(),
            item_link_include: default_item_link_include(),
            item_link_exclude: Vec::new(),
        }
    }
}

impl PageSchema {
    /// Check every selector and pattern before a run starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, selector) in self.named_selectors() {
            if let Err(e) = Selector::parse(selector) {
                return Err(ConfigError::InvalidSelector {
                    name,
                    selector: selector.clone(),
                    message: e.to_string(),
                });
            }
        }
        self.link_filter()?;
        Ok(())
    }

    /// Compile the item link patterns
    pub fn link_filter(&self) -> Result<LinkFilter, ConfigError> {
        Ok(LinkFilter::new(
            &self.item_link_include,
            &self.item_link_exclude,
        )?)
    }

    fn named_selectors(&self) -> [(&'static str, &String); 5] {
        [
            ("item", &self.item),
            ("title", &self.title),
            ("price", &self.price),
            ("favourites", &self.favourites),
            ("link", &self.link),
        ]
    }
}
