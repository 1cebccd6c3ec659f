//! Output data model: item records, error records, and the scrape document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cost
// ---------------------------------------------------------------------------

/// In-game currency an item is bought with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Bloodpoints,
    IridescentShards,
    AuricCells,
}

/// Price of an item. Both halves are independently optional; an all-`None`
/// cost means nothing could be read from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub amount: Option<u64>,
    pub currency: Option<Currency>,
}

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

/// Structured contents of an item's description cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Prose preceding the bulleted effects list (only set when a list exists).
    pub summary: Option<String>,
    /// One entry per list item, in document order.
    pub effects: Vec<String>,
    /// First quoted italic line found inside a paragraph.
    pub flavor_text: Option<String>,
    /// Whole cell text, normalized. Set whenever the cell exists.
    pub raw_text: Option<String>,
}

// ---------------------------------------------------------------------------
// ItemRecord
// ---------------------------------------------------------------------------

/// One successfully extracted item page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Page title on the wiki.
    pub title: String,
    /// Human-facing URL of the page.
    pub canonical_url: String,
    /// Rarity label derived from the `<Rarity> Items` category.
    pub rarity: Option<String>,
    /// Absolute URL of the item icon.
    pub icon_reference: Option<String>,
    pub cost: Cost,
    pub description: Description,
    /// Category names with maintenance categories removed.
    pub categories: Vec<String>,
}

/// A page that could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub title: String,
    pub error: String,
}

// ---------------------------------------------------------------------------
// ScrapeOutput
// ---------------------------------------------------------------------------

/// The single JSON document written at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOutput {
    /// Origin URL of the wiki that was scraped.
    pub source: String,
    /// When the run started.
    pub scraped_at: DateTime<Utc>,
    /// Number of entries in `items`.
    pub count: usize,
    pub items: Vec<ItemRecord>,
    pub errors: Vec<ErrorRecord>,
}

impl ScrapeOutput {
    /// Assemble the output document, deriving `count` from `items`.
    pub fn new(
        source: impl Into<String>,
        scraped_at: DateTime<Utc>,
        items: Vec<ItemRecord>,
        errors: Vec<ErrorRecord>,
    ) -> Self {
        Self {
            source: source.into(),
            scraped_at,
            count: items.len(),
            items,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_serializes_snake_case() {
        let json = serde_json::to_string(&Currency::IridescentShards).expect("serialize");
        assert_eq!(json, "\"iridescent_shards\"");
        let json = serde_json::to_string(&Currency::AuricCells).expect("serialize");
        assert_eq!(json, "\"auric_cells\"");
    }

    #[test]
    fn empty_cost_serializes_as_nulls() {
        let value = serde_json::to_value(Cost::default()).expect("serialize");
        assert_eq!(value, serde_json::json!({ "amount": null, "currency": null }));
    }

    #[test]
    fn output_count_tracks_items() {
        let item = ItemRecord {
            title: "Flashlight".into(),
            canonical_url: "https://wiki.example/wiki/Flashlight".into(),
            rarity: Some("Common".into()),
            icon_reference: None,
            cost: Cost::default(),
            description: Description::default(),
            categories: vec!["Common Items".into()],
        };
        let output = ScrapeOutput::new(
            "https://wiki.example",
            Utc::now(),
            vec![item],
            vec![ErrorRecord {
                title: "Broken".into(),
                error: "transport error: boom".into(),
            }],
        );
        assert_eq!(output.count, 1);

        let value = serde_json::to_value(&output).expect("serialize");
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["canonical_url"], "https://wiki.example/wiki/Flashlight");
        assert_eq!(value["errors"][0]["title"], "Broken");
        assert!(value["scraped_at"].as_str().is_some_and(|s| s.ends_with('Z')));
    }
}
