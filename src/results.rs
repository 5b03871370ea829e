use crate::error::PageError;
use serde::{Deserialize, Serialize};

/// One listed item as it appears in the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Title")]
    pub title: String,

    /// Price as displayed, currency included
    #[serde(rename = "Price")]
    pub price: String,

    #[serde(rename = "Favourites")]
    pub favourites_count: String,

    /// Absolute URL of the item's own page
    #[serde(rename = "Link")]
    pub item_url: String,
}

impl Record {
    pub fn new(title: String, price: String, favourites_count: String, item_url: String) -> Self {
        Self {
            title,
            price,
            favourites_count,
            item_url,
        }
    }
}

/// The page that stopped a run early
#[derive(Debug)]
pub struct PageHalt {
    pub page: u32,
    pub url: String,
    pub error: PageError,
}

/// Everything a run collected, in page order then document order
#[derive(Debug, Default)]
pub struct RunResult {
    pub records: Vec<Record>,

    /// Pages that loaded and were extracted
    pub pages_visited: u32,

    /// Pages given up on under the skip policy
    pub skipped_pages: Vec<u32>,

    /// Set when a page failure ended the run before `max_pages`
    pub halted: Option<PageHalt>,
}
