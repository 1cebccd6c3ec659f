//! Locating the item row and its icon / description / cost cells inside the
//! page's primary data table.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, warn};

use wikiharvest_shared::LayoutMode;

use crate::dom::Element;

/// The primary data table on an item page.
static ITEM_TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable").expect("table selector"));

/// Positional layout: icon, description, cost.
const POSITIONAL: ColumnMap = ColumnMap {
    icon: Some(0),
    description: Some(1),
    cost: Some(2),
};

/// Cells of the first data row, by role.
#[derive(Debug, Default)]
pub(crate) struct ItemCells<'a> {
    pub icon: Option<&'a Element>,
    pub description: Option<&'a Element>,
    pub cost: Option<&'a Element>,
}

/// Column index for each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    icon: Option<usize>,
    description: Option<usize>,
    cost: Option<usize>,
}

/// First `table.wikitable` in the rendered page, copied into the typed tree.
pub(crate) fn find_item_table(html: &str) -> Option<Element> {
    let doc = Html::parse_fragment(html);
    doc.select(&ITEM_TABLE_SEL).next().map(Element::from_ref)
}

/// Resolve the cells of the table's first data row.
pub(crate) fn item_cells(table: &Element, layout: LayoutMode) -> ItemCells<'_> {
    let Some(row) = data_row(table) else {
        debug!("item table has no data row");
        return ItemCells::default();
    };

    let columns = match layout {
        LayoutMode::Positional => POSITIONAL,
        LayoutMode::Headers => header_columns(table).unwrap_or(POSITIONAL),
    };

    let cells = row_cells(row);
    let pick = |index: Option<usize>| index.and_then(|i| cells.get(i).copied());

    ItemCells {
        icon: pick(columns.icon),
        description: pick(columns.description),
        cost: pick(columns.cost),
    }
}

/// First row following another row inside a `<tbody>`; for tables without
/// that structure, the second row overall.
fn data_row(table: &Element) -> Option<&Element> {
    let in_body = table.find_all("tbody").into_iter().find_map(|tbody| {
        let rows: Vec<&Element> = tbody.child_elements().collect();
        rows.windows(2)
            .find(|pair| pair[0].is("tr") && pair[1].is("tr"))
            .map(|pair| pair[1])
    });

    in_body.or_else(|| table.find_all("tr").get(1).copied())
}

/// Direct `td`/`th` children of a row.
fn row_cells(row: &Element) -> Vec<&Element> {
    row.child_elements()
        .filter(|c| c.is("td") || c.is("th"))
        .collect()
}

/// Map roles to columns from the header row's `<th>` text.
///
/// `None` when the first row carries no header cells, so the caller falls
/// back to positions.
fn header_columns(table: &Element) -> Option<ColumnMap> {
    let header = table.find("tr")?;
    let cells = row_cells(header);
    if !cells.iter().any(|c| c.is("th")) {
        return None;
    }

    let labels: Vec<String> = cells.iter().map(|c| c.text().to_lowercase()).collect();
    let position = |needles: &[&str]| {
        labels
            .iter()
            .position(|label| needles.iter().any(|n| label.contains(n)))
    };

    let columns = ColumnMap {
        icon: position(&["icon"]),
        description: position(&["description"]),
        cost: position(&["cost", "price"]),
    };

    if columns != POSITIONAL {
        warn!(
            headers = ?labels,
            icon = ?columns.icon,
            description = ?columns.description,
            cost = ?columns.cost,
            "item table headers differ from the positional layout"
        );
    }

    Some(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(html: &str) -> Element {
        find_item_table(html).expect("wikitable")
    }

    fn texts(cells: &ItemCells<'_>) -> (Option<String>, Option<String>, Option<String>) {
        (
            cells.icon.map(|c| c.text()),
            cells.description.map(|c| c.text()),
            cells.cost.map(|c| c.text()),
        )
    }

    #[test]
    fn finds_first_wikitable_only() {
        let html = r#"<table class="infobox"><tr><td>x</td></tr></table>
            <table class="wikitable sortable" id="first"><tr><th>a</th></tr></table>
            <table class="wikitable" id="second"></table>"#;
        assert_eq!(table(html).attr("id"), Some("first"));
        assert!(find_item_table("<p>no tables</p>").is_none());
    }

    #[test]
    fn second_row_in_body() {
        let t = table(
            r#"<table class="wikitable"><tbody>
                <tr><th>Icon</th><th>Description</th><th>Cost</th></tr>
                <tr><td>I</td><td>D</td><td>C</td></tr>
                <tr><td>I2</td><td>D2</td><td>C2</td></tr>
            </tbody></table>"#,
        );
        let cells = item_cells(&t, LayoutMode::Positional);
        assert_eq!(
            texts(&cells),
            (Some("I".into()), Some("D".into()), Some("C".into()))
        );
    }

    #[test]
    fn header_in_thead_falls_back_to_second_row_overall() {
        let t = table(
            r#"<table class="wikitable">
                <thead><tr><th>Icon</th><th>Description</th><th>Cost</th></tr></thead>
                <tbody><tr><td>I</td><td>D</td><td>C</td></tr></tbody>
            </table>"#,
        );
        let cells = item_cells(&t, LayoutMode::Positional);
        assert_eq!(cells.description.map(|c| c.text()).as_deref(), Some("D"));
    }

    #[test]
    fn single_row_table_has_no_cells() {
        let t = table(r#"<table class="wikitable"><tr><th>Icon</th></tr></table>"#);
        let cells = item_cells(&t, LayoutMode::Positional);
        assert!(cells.icon.is_none() && cells.description.is_none() && cells.cost.is_none());
    }

    #[test]
    fn short_row_leaves_missing_cells_empty() {
        let t = table(
            r#"<table class="wikitable"><tr><th>Icon</th></tr><tr><td>I</td><td>D</td></tr></table>"#,
        );
        let cells = item_cells(&t, LayoutMode::Positional);
        assert!(cells.icon.is_some());
        assert!(cells.description.is_some());
        assert!(cells.cost.is_none());
    }

    #[test]
    fn header_mode_follows_header_text() {
        let t = table(
            r#"<table class="wikitable">
                <tr><th>Price</th><th>Icon</th><th>Description</th></tr>
                <tr><td>C</td><td>I</td><td>D</td></tr>
            </table>"#,
        );

        let cells = item_cells(&t, LayoutMode::Headers);
        assert_eq!(
            texts(&cells),
            (Some("I".into()), Some("D".into()), Some("C".into()))
        );

        let positional = item_cells(&t, LayoutMode::Positional);
        assert_eq!(positional.icon.map(|c| c.text()).as_deref(), Some("C"));
    }

    #[test]
    fn header_mode_unknown_column_is_absent() {
        let t = table(
            r#"<table class="wikitable">
                <tr><th>Icon</th><th>Description</th><th>Notes</th></tr>
                <tr><td>I</td><td>D</td><td>N</td></tr>
            </table>"#,
        );
        let cells = item_cells(&t, LayoutMode::Headers);
        assert!(cells.cost.is_none());
        assert!(cells.icon.is_some());
    }

    #[test]
    fn header_mode_without_th_uses_positions() {
        let t = table(
            r#"<table class="wikitable">
                <tr><td>first</td></tr>
                <tr><td>I</td><td>D</td><td>C</td></tr>
            </table>"#,
        );
        let cells = item_cells(&t, LayoutMode::Headers);
        assert_eq!(cells.cost.map(|c| c.text()).as_deref(), Some("C"));
    }
}
