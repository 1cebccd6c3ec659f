//! Turning one rendered item page into an [`ItemRecord`].

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, instrument};
use url::Url;

use wikiharvest_mediawiki::{ParsedPage, WikiApi};
use wikiharvest_shared::{
    Cost, Description, ItemRecord, LayoutMode, Result, ScrapeConfig, WikiHarvestError,
};

use crate::cost::extract_cost;
use crate::description::extract_description;
use crate::table::{find_item_table, item_cells};

/// Category name prefix used by MediaWiki tracking categories.
const MAINTENANCE_PREFIX: &str = "pages using ";

/// Suffix of rarity categories (`Very Rare Items`).
const RARITY_SUFFIX: &str = " items";

/// Everything but ASCII letters, digits, `-._~` and the `/` subpage separator.
const TITLE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Options for per-page extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Pause after each render request.
    pub delay: Duration,
    /// How the item table's columns are located.
    pub layout: LayoutMode,
}

impl From<&ScrapeConfig> for ExtractOptions {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            delay: config.delay,
            layout: config.layout,
        }
    }
}

/// Fetch `title` and extract its record.
///
/// Fails only when the request fails or the page does not exist; a page
/// whose markup doesn't match expectations still yields a record.
#[instrument(skip_all, fields(title = %title))]
pub async fn extract_item<A: WikiApi>(
    api: &A,
    title: &str,
    opts: &ExtractOptions,
) -> Result<ItemRecord> {
    let response = api.render_page(title).await;
    tokio::time::sleep(opts.delay).await;

    let response = response?;
    let page = response
        .parse
        .ok_or_else(|| WikiHarvestError::missing_page(title, response.error_info))?;

    Ok(build_record(title, &page, api.base_url(), opts.layout))
}

/// Build a record from an already-fetched render result.
pub fn build_record(title: &str, page: &ParsedPage, base: &Url, layout: LayoutMode) -> ItemRecord {
    let categories = normalize_categories(&page.categories);
    let rarity = derive_rarity(&categories);

    let mut icon_reference = None;
    let mut description = Description::default();
    let mut cost = Cost::default();

    match find_item_table(&page.html) {
        Some(table) => {
            let cells = item_cells(&table, layout);
            icon_reference = cells
                .icon
                .and_then(|cell| cell.find("img"))
                .and_then(|img| img.attr("src"))
                .and_then(|src| resolve_url(base, src));
            if let Some(cell) = cells.description {
                description = extract_description(cell);
            }
            if let Some(cell) = cells.cost {
                cost = extract_cost(cell);
            }
        }
        None => debug!(title, "no item table on page"),
    }

    ItemRecord {
        title: title.to_string(),
        canonical_url: canonical_page_url(base, title),
        rarity,
        icon_reference,
        cost,
        description,
        categories,
    }
}

/// Underscores to spaces, trimmed; tracking categories dropped.
pub fn normalize_categories(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|c| c.replace('_', " ").trim().to_string())
        .filter(|c| !c.is_empty() && !c.to_lowercase().starts_with(MAINTENANCE_PREFIX))
        .collect()
}

/// Rarity from the first `<Rarity> Items` category.
pub fn derive_rarity(categories: &[String]) -> Option<String> {
    categories.iter().find_map(|c| {
        let lower = c.to_lowercase();
        if lower == "items" || !lower.ends_with(RARITY_SUFFIX) {
            return None;
        }
        let label = c[..c.len() - RARITY_SUFFIX.len()].trim();
        (!label.is_empty()).then(|| label.to_string())
    })
}

/// `<origin>/wiki/<Title_With_Underscores>`, percent-encoded except for
/// unreserved characters and `/`.
pub fn canonical_page_url(base: &Url, title: &str) -> String {
    let underscored = title.replace(' ', "_");
    format!(
        "{}/wiki/{}",
        base.origin().ascii_serialization(),
        utf8_percent_encode(&underscored, TITLE_ENCODE_SET)
    )
}

/// Make an image `src` absolute against the wiki origin.
pub fn resolve_url(base: &Url, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    base.join(src).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikiharvest_shared::Currency;

    fn base() -> Url {
        Url::parse("https://deadbydaylight.wiki.gg").unwrap()
    }

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    #[test]
    fn rarity_from_first_rarity_category() {
        let cats = vec![
            "Items".to_string(),
            "Very Rare Items".to_string(),
            "Survivor Items".to_string(),
        ];
        assert_eq!(derive_rarity(&cats).as_deref(), Some("Very Rare"));
        assert_eq!(derive_rarity(&["Items".to_string()]), None);
        assert_eq!(derive_rarity(&[]), None);
    }

    #[test]
    fn maintenance_categories_dropped() {
        let raw = vec![
            "Very_Rare_Items".to_string(),
            "Pages_using_DynamicPageList3_dplvar_parser_function".to_string(),
            "  ".to_string(),
            "Flashlights".to_string(),
        ];
        assert_eq!(
            normalize_categories(&raw),
            vec!["Very Rare Items".to_string(), "Flashlights".to_string()]
        );
    }

    #[test]
    fn canonical_url_encoding() {
        assert_eq!(
            canonical_page_url(&base(), "Very Rare Item"),
            "https://deadbydaylight.wiki.gg/wiki/Very_Rare_Item"
        );
        assert_eq!(
            canonical_page_url(&base(), "Flashlight #2?"),
            "https://deadbydaylight.wiki.gg/wiki/Flashlight_%232%3F"
        );
        assert_eq!(
            canonical_page_url(&base(), "Items/Archive"),
            "https://deadbydaylight.wiki.gg/wiki/Items/Archive"
        );
        assert_eq!(
            canonical_page_url(&base(), "Will O' Wisp"),
            "https://deadbydaylight.wiki.gg/wiki/Will_O%27_Wisp"
        );
        assert_eq!(
            canonical_page_url(&base(), "Rainbow Map (Event)"),
            "https://deadbydaylight.wiki.gg/wiki/Rainbow_Map_%28Event%29"
        );
        assert_eq!(
            canonical_page_url(&base(), "Key: Broken"),
            "https://deadbydaylight.wiki.gg/wiki/Key%3A_Broken"
        );
        assert_eq!(
            canonical_page_url(&base(), "Bread & Butter, Café"),
            "https://deadbydaylight.wiki.gg/wiki/Bread_%26_Butter%2C_Caf%C3%A9"
        );
    }

    #[test]
    fn icon_urls_are_absolute() {
        assert_eq!(
            resolve_url(&base(), "/images/a/ab/IconItems_flashlight.png").as_deref(),
            Some("https://deadbydaylight.wiki.gg/images/a/ab/IconItems_flashlight.png")
        );
        assert_eq!(
            resolve_url(&base(), "https://cdn.example/x.png").as_deref(),
            Some("https://cdn.example/x.png")
        );
        assert_eq!(resolve_url(&base(), "  "), None);
    }

    #[test]
    fn page_without_table_yields_partial_record() {
        let page = ParsedPage {
            html: "<div class=\"mw-parser-output\"><p>Just prose.</p></div>".into(),
            categories: vec!["Rare_Items".into()],
        };
        let record = build_record("Odd Page", &page, &base(), LayoutMode::Positional);

        assert_eq!(record.title, "Odd Page");
        assert_eq!(record.canonical_url, "https://deadbydaylight.wiki.gg/wiki/Odd_Page");
        assert_eq!(record.categories, vec!["Rare Items".to_string()]);
        assert_eq!(record.rarity.as_deref(), Some("Rare"));
        assert_eq!(record.icon_reference, None);
        assert_eq!(record.cost, Cost::default());
        assert_eq!(record.description.raw_text, None);
    }

    #[test]
    fn full_item_page_fixture() {
        let page = ParsedPage {
            html: load_fixture("item_page.html"),
            categories: vec![
                "Items".into(),
                "Uncommon_Items".into(),
                "Survivor_Items".into(),
                "Pages_using_Tabber".into(),
            ],
        };
        let record = build_record("Sport Flashlight", &page, &base(), LayoutMode::Positional);

        assert_eq!(record.rarity.as_deref(), Some("Uncommon"));
        assert_eq!(
            record.icon_reference.as_deref(),
            Some("https://deadbydaylight.wiki.gg/images/thumb/IconItems_sportFlashlight.png/96px-IconItems_sportFlashlight.png")
        );
        assert_eq!(
            record.cost,
            Cost {
                amount: Some(5500),
                currency: Some(Currency::Bloodpoints)
            }
        );
        assert_eq!(
            record.description.summary.as_deref(),
            Some("A lightweight Flashlight that helps you see in the dark.")
        );
        assert_eq!(record.description.effects.len(), 2);
        assert_eq!(
            record.description.effects[1],
            "Beam is 10% narrower than a standard Flashlight."
        );
        assert_eq!(
            record.description.flavor_text.as_deref(),
            Some("\"Light as a feather, bright as the sun.\"")
        );
        assert_eq!(record.categories.len(), 3);
    }

    #[test]
    fn fixture_in_header_mode_matches_positional() {
        let page = ParsedPage {
            html: load_fixture("item_page.html"),
            categories: vec![],
        };
        let positional = build_record("Sport Flashlight", &page, &base(), LayoutMode::Positional);
        let headers = build_record("Sport Flashlight", &page, &base(), LayoutMode::Headers);
        assert_eq!(positional, headers);
    }
}
