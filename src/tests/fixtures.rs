use crate::config::RunConfig;
use crate::providers::StaticPages;
use crate::utils::paginated_url;
use std::path::Path;

pub const BASE_URL: &str = "https://site.example/search?q=x";

/// Markup of one grid item with every field present
pub fn item(id: u32, title: &str, price: &str, favourites: &str) -> String {
    format!(
        r#"<div data-testid="grid-item">
            <div data-testid="product-item-id-{id}">
                <a href="/member/{id}" data-testid="owner">seller</a>
                <a href="/items/{id}-listing" data-testid="overlay-link">open</a>
                <p data-testid="product-item-id-{id}--description-title">{title}</p>
                <p data-testid="product-item-id-{id}--price-text">{price}</p>
                <button data-testid="product-item-id-{id}--favourite">
                    <span class="web_ui__Text__text web_ui__Text__caption">{favourites}</span>
                </button>
            </div>
        </div>"#
    )
}

/// An item whose only links lead away from item pages
pub fn item_without_item_link(id: u32) -> String {
    format!(
        r#"<div data-testid="grid-item">
            <a href="/member/{id}">seller</a>
            <a href="https://help.site.example/faq">help</a>
            <p data-testid="x--description-title">Orphan {id}</p>
            <p data-testid="x--price-text">1,00 €</p>
            <div data-testid="x--favourite"><span class="web_ui__Text__caption">0</span></div>
        </div>"#
    )
}

/// A complete item whose first anchor carries no target
pub fn item_with_bare_anchor(id: u32) -> String {
    format!(
        r#"<div data-testid="grid-item">
            <a name="slot-{id}">anchor</a>
            <a href="/items/{id}-listing">open</a>
            <p data-testid="x--description-title">Bare {id}</p>
            <p data-testid="x--price-text">2,00 €</p>
            <div data-testid="x--favourite"><span class="web_ui__Text__caption">0</span></div>
        </div>"#
    )
}

/// A sponsored slot in the grid, carrying no title
pub fn ad_slot() -> String {
    r#"<div data-testid="grid-item"><div class="ad"><a href="/items/999-sponsored">promo</a></div></div>"#
        .to_string()
}

pub fn page(items: &[String]) -> String {
    format!(
        "<html><body><main><div class=\"feed-grid\">{}</div></main></body></html>",
        items.join("\n")
    )
}

/// A page that rendered but never showed a grid
pub fn empty_page() -> String {
    "<html><body><p>Loading...</p></body></html>".to_string()
}

pub fn item_url(id: u32) -> String {
    format!("https://site.example/items/{}-listing", id)
}

/// Three valid items per page, ids starting at `first_id`
pub fn full_page(first_id: u32) -> String {
    let items: Vec<String> = (first_id..first_id + 3)
        .map(|id| item(id, &format!("Item {}", id), &format!("{},00 €", id), "2"))
        .collect();
    page(&items)
}

/// Provider serving `pages[i]` as page `i + 1`
pub fn provider(pages: &[String]) -> StaticPages {
    pages
        .iter()
        .enumerate()
        .fold(StaticPages::new(), |provider, (index, html)| {
            provider.with_page(paginated_url(BASE_URL, index as u32 + 1), html.clone())
        })
}

pub fn config(max_pages: u32, output_path: &Path) -> RunConfig {
    let mut config = RunConfig::new(BASE_URL, max_pages, output_path);
    config.page_delay_ms = 0;
    config
}
