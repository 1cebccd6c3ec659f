//! Cost cell parsing: amount and currency.

use std::sync::LazyLock;

use regex::Regex;

use wikiharvest_shared::{Cost, Currency};

use crate::dom::Element;
use crate::text::collapse_whitespace;

/// First run of digits, thousands separators allowed.
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("amount regex"));

/// Keywords looked for in the cell's visible text, in priority order.
const TEXT_HINTS: &[(&str, Currency)] = &[
    ("bloodpoints", Currency::Bloodpoints),
    ("bp", Currency::Bloodpoints),
    ("iridescent shards", Currency::IridescentShards),
    ("shards", Currency::IridescentShards),
    ("auric cells", Currency::AuricCells),
    ("cells", Currency::AuricCells),
];

/// Parse a cost cell. Never fails: anything unreadable is left as `None`.
pub fn extract_cost(cell: &Element) -> Cost {
    let text = collapse_whitespace(&cell.text());

    let currency = currency_from_images(cell).or_else(|| currency_from_text(&text));
    let amount = AMOUNT_RE
        .find(&text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok());

    Cost { amount, currency }
}

/// Currency icons: the first `<img>` whose alt text or source path names a
/// currency decides.
fn currency_from_images(cell: &Element) -> Option<Currency> {
    cell.find_all("img").into_iter().find_map(|img| {
        let blob = format!(
            "{} {}",
            img.attr("alt").unwrap_or_default(),
            img.attr("src").unwrap_or_default()
        )
        .to_lowercase();

        if blob.contains("bloodpoints") {
            Some(Currency::Bloodpoints)
        } else if blob.contains("shards") {
            Some(Currency::IridescentShards)
        } else if blob.contains("auric") || blob.contains("cells") {
            Some(Currency::AuricCells)
        } else {
            None
        }
    })
}

fn currency_from_text(text: &str) -> Option<Currency> {
    let lower = text.to_lowercase();
    TEXT_HINTS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, currency)| *currency)
}
