use crate::error::{ConfigError, ExtractError};
use crate::filter::LinkFilter;
use crate::providers::ItemElement;
use crate::results::Record;
use crate::schema::PageSchema;
use crate::utils::resolve_link;
use url::Url;

/// Turns one item container into a `Record`
#[derive(Debug)]
pub struct RecordExtractor {
    schema: PageSchema,
    links: LinkFilter,
}

impl RecordExtractor {
    /// Build an extractor; selectors are checked by `PageSchema::validate`
    pub fn new(schema: PageSchema) -> Result<Self, ConfigError> {
        let links = schema.link_filter()?;
        Ok(Self { schema, links })
    }

    pub fn schema(&self) -> &PageSchema {
        &self.schema
    }

    /// Extract a record, or explain why the item is discarded
    ///
    /// Fields are read in order and the first missing one aborts the item.
    /// Relative link targets are resolved against `page_url`.
    pub async fn extract<E: ItemElement>(
        &self,
        item: &E,
        page_url: Option<&Url>,
    ) -> Result<Record, ExtractError> {
        let title = read_text(item, "title", &self.schema.title).await?;
        let price = read_text(item, "price", &self.schema.price).await?;
        let favourites = read_text(item, "favourites", &self.schema.favourites).await?;
        let item_url = self.find_item_link(item, page_url).await?;

        Ok(Record::new(title, price, favourites, item_url))
    }

    /// First link of the item whose resolved target the filter accepts
    async fn find_item_link<E: ItemElement>(
        &self,
        item: &E,
        page_url: Option<&Url>,
    ) -> Result<String, ExtractError> {
        let links = item
            .find_all(&self.schema.link)
            .await
            .map_err(ExtractError::Links)?;

        for (index, link) in links.iter().enumerate() {
            // A link without a target ahead of the item link marks the
            // markup as non-standard, so the whole item is dropped
            let href = match link.attribute("href").await {
                Ok(Some(href)) => href,
                Ok(None) => {
                    return Err(ExtractError::LinkWithoutTarget {
                        position: index + 1,
                        source: None,
                    });
                }
                Err(e) => {
                    return Err(ExtractError::LinkWithoutTarget {
                        position: index + 1,
                        source: Some(e),
                    });
                }
            };

            match resolve_link(page_url, &href) {
                Some(resolved) if self.links.accepts(&resolved) => return Ok(resolved),
                Some(_) => {}
                None => ::log::trace!("Could not resolve link target: {}", href),
            }
        }

        Err(ExtractError::NoItemLink {
            links_seen: links.len(),
        })
    }
}

async fn read_text<E: ItemElement>(
    item: &E,
    field: &'static str,
    selector: &str,
) -> Result<String, ExtractError> {
    let element = item
        .find_first(selector)
        .await
        .map_err(|source| ExtractError::MissingField { field, source })?;
    element
        .text()
        .await
        .map_err(|source| ExtractError::MissingField { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{PageProvider, SnapshotElement, StaticPages};

    const URL: &str = "https://site.example/catalog?q=x&page=1";

    async fn items(body: &str) -> Vec<SnapshotElement> {
        let html = format!("<html><body>{}</body></html>", body);
        let mut pages = StaticPages::new().with_page(URL, html);
        pages.navigate(URL).await.unwrap();
        pages.find_all(r#"[data-testid="grid-item"]"#).await.unwrap()
    }

    fn extractor() -> RecordExtractor {
        RecordExtractor::new(PageSchema::default()).unwrap()
    }

    fn page_url() -> Url {
        Url::parse(URL).unwrap()
    }

    const FIELDS: &str = r#"
        <p data-testid="item-42--description-title">Denim jacket</p>
        <p data-testid="item-42--price-text">12,50 €</p>
        <div data-testid="item-42--favourite"><span class="web_ui__Text__caption">7</span></div>
    "#;

    #[tokio::test]
    async fn test_complete_item() {
        let body = format!(
            r#"<div data-testid="grid-item">{}<a href="/member/9">seller</a><a href="/items/42-denim">open</a><a href="/items/43">other</a></div>"#,
            FIELDS
        );
        let items = items(&body).await;
        let record = extractor().extract(&items[0], Some(&page_url())).await.unwrap();

        assert_eq!(
            record,
            Record::new(
                "Denim jacket".to_string(),
                "12,50 €".to_string(),
                "7".to_string(),
                "https://site.example/items/42-denim".to_string(),
            )
        );
    }

    #[tokio::test]
    async fn test_item_without_item_link_is_discarded() {
        let body = format!(
            r#"<div data-testid="grid-item">{}<a href="/member/9">seller</a><a href="https://other.example/help">help</a></div>"#,
            FIELDS
        );
        let items = items(&body).await;
        let result = extractor().extract(&items[0], Some(&page_url())).await;

        assert!(matches!(
            result,
            Err(ExtractError::NoItemLink { links_seen: 2 })
        ));
    }

    #[tokio::test]
    async fn test_item_without_links_is_discarded() {
        let body = format!(r#"<div data-testid="grid-item">{}</div>"#, FIELDS);
        let items = items(&body).await;
        let result = extractor().extract(&items[0], Some(&page_url())).await;

        assert!(matches!(
            result,
            Err(ExtractError::NoItemLink { links_seen: 0 })
        ));
    }

    #[tokio::test]
    async fn test_missing_title_aborts_first() {
        // An ad slot: price and link present, no title
        let body = r#"<div data-testid="grid-item">
            <p data-testid="ad--price-text">Sponsored</p>
            <a href="/items/1">x</a>
        </div>"#;
        let items = items(body).await;
        let result = extractor().extract(&items[0], Some(&page_url())).await;

        match result {
            Err(ExtractError::MissingField { field, .. }) => assert_eq!(field, "title"),
            other => panic!("expected missing title, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_favourites_caption() {
        let body = r#"<div data-testid="grid-item">
            <p data-testid="x--description-title">Scarf</p>
            <p data-testid="x--price-text">3 €</p>
            <div data-testid="x--favourite"><span>7</span></div>
            <a href="/items/5">x</a>
        </div>"#;
        let items = items(body).await;
        let result = extractor().extract(&items[0], Some(&page_url())).await;

        match result {
            Err(ExtractError::MissingField { field, .. }) => assert_eq!(field, "favourites"),
            other => panic!("expected missing favourites, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_anchor_without_href_discards_item() {
        let body = format!(
            r#"<div data-testid="grid-item">{}<a name="top">anchor</a><a href="/items/8">open</a></div>"#,
            FIELDS
        );
        let items = items(&body).await;
        let result = extractor().extract(&items[0], Some(&page_url())).await;
        assert!(matches!(
            result,
            Err(ExtractError::LinkWithoutTarget {
                position: 1,
                source: None
            })
        ));
    }

    #[tokio::test]
    async fn test_anchor_without_href_after_item_link_is_ignored() {
        let body = format!(
            r#"<div data-testid="grid-item">{}<a href="/items/8">open</a><a name="top">anchor</a></div>"#,
            FIELDS
        );
        let items = items(&body).await;
        let record = extractor().extract(&items[0], Some(&page_url())).await.unwrap();
        assert_eq!(record.item_url, "https://site.example/items/8");
    }

    #[tokio::test]
    async fn test_relative_link_needs_page_url() {
        let body = format!(
            r#"<div data-testid="grid-item">{}<a href="/items/8">open</a></div>"#,
            FIELDS
        );
        let items = items(&body).await;
        let result = extractor().extract(&items[0], None).await;
        assert!(matches!(result, Err(ExtractError::NoItemLink { .. })));
    }

    #[tokio::test]
    async fn test_custom_schema() {
        let schema = PageSchema {
            title: ".name".to_string(),
            price: ".cost".to_string(),
            favourites: ".likes".to_string(),
            item_link_include: vec![r"/p/\d+$".to_string()],
            ..PageSchema::default()
        };
        let body = r#"<div data-testid="grid-item">
            <b class="name">Boots</b><i class="cost">40</i><u class="likes">1</u>
            <a href="/items/2">legacy</a><a href="/p/77">product</a>
        </div>"#;
        let items = items(body).await;
        let record = RecordExtractor::new(schema)
            .unwrap()
            .extract(&items[0], Some(&page_url()))
            .await
            .unwrap();

        assert_eq!(record.title, "Boots");
        assert_eq!(record.item_url, "https://site.example/p/77");
    }
}
