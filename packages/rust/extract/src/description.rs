//! Description cell parsing: summary prose, bulleted effects, flavor quote.

use wikiharvest_shared::Description;

use crate::dom::{Element, Node};
use crate::text::normalize_text;

/// Split a description cell into its parts.
///
/// `raw_text` is always filled from the whole cell so nothing is lost when
/// the markup doesn't follow the usual prose / list / quote layout.
pub fn extract_description(cell: &Element) -> Description {
    let (summary, effects) = match cell.find("ul") {
        Some(list) => (summary_before(cell, list), list_effects(list)),
        None => (None, Vec::new()),
    };

    Description {
        summary,
        effects,
        flavor_text: flavor_text(cell),
        raw_text: normalize_text(&cell.text()),
    }
}

/// Text of the cell's children up to the one holding the list.
fn summary_before(cell: &Element, list: &Element) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    for child in &cell.children {
        if let Node::Element(el) = child {
            if el.contains(list) {
                break;
            }
        }
        if let Some(text) = normalize_text(&child.text()) {
            parts.push(text);
        }
    }

    normalize_text(&parts.join(" "))
}

fn list_effects(list: &Element) -> Vec<String> {
    list.find_all("li")
        .into_iter()
        .filter_map(|li| normalize_text(&li.text()))
        .collect()
}

/// First `<p> <i>` whose text carries a double quote, quotes kept as written.
fn flavor_text(cell: &Element) -> Option<String> {
    cell.find_all("p")
        .into_iter()
        .flat_map(|p| p.find_all("i"))
        .filter_map(|i| normalize_text(&i.text()))
        .find(|t| t.contains('"'))
}
