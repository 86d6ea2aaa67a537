use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::elements::normalized_text;
use crate::record::{Table, TableKind};

static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());

/// Header names that mark a table as parameter metadata.
const PARAMETER_FIELDS: &[&str] = &[
    "Field Name",
    "Description",
    "Valid Range",
    "Visibility",
    "Applies To",
];

/// Parameter if any header is a recognized field name.
pub fn classify(headers: &[String]) -> TableKind {
    if headers.iter().any(|h| PARAMETER_FIELDS.contains(&h.as_str())) {
        TableKind::Parameter
    } else {
        TableKind::Generic
    }
}

/// First row with cells is the header row, the rest are body rows.
pub fn extract_table(table: ElementRef) -> Table {
    let mut rows = table
        .select(&ROW_SEL)
        .map(|tr| {
            tr.select(&CELL_SEL)
                .map(normalized_text)
                .collect::<Vec<String>>()
        })
        .skip_while(Vec::is_empty);

    let headers = rows.next().unwrap_or_default();
    let rows: Vec<Vec<String>> = rows.collect();

    Table {
        kind: classify(&headers),
        headers,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn first_table(html: &str) -> Table {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("table").unwrap();
        extract_table(doc.select(&sel).next().unwrap())
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn field_name_header_is_parameter() {
        assert_eq!(classify(&strings(&["Field Name", "Value"])), TableKind::Parameter);
        assert_eq!(classify(&strings(&["Applies To"])), TableKind::Parameter);
    }

    #[test]
    fn unrelated_headers_are_generic() {
        assert_eq!(classify(&strings(&["Name", "Qty"])), TableKind::Generic);
        assert_eq!(classify(&strings(&["field name"])), TableKind::Generic);
        assert_eq!(classify(&[]), TableKind::Generic);
    }

    #[test]
    fn parameter_table_from_html() {
        let t = first_table(
            "<table><tr><th>Field Name</th><th>Valid Range</th></tr>\
             <tr><td>Depth</td><td>0 -  48</td></tr>\
             <tr><td>Height</td><td>0 - 96</td></tr></table>",
        );
        assert_eq!(t.kind, TableKind::Parameter);
        assert_eq!(t.headers, strings(&["Field Name", "Valid Range"]));
        assert_eq!(t.rows, vec![strings(&["Depth", "0 - 48"]), strings(&["Height", "0 - 96"])]);
    }

    #[test]
    fn leading_empty_rows_are_not_headers() {
        let t = first_table(
            "<table><tr></tr><tr><th>Field Name</th><th>Description</th></tr>\
             <tr><td>W</td><td>x</td></tr></table>",
        );
        assert_eq!(t.kind, TableKind::Parameter);
        assert_eq!(t.headers, strings(&["Field Name", "Description"]));
        assert_eq!(t.rows, vec![strings(&["W", "x"])]);
    }

    #[test]
    fn generic_table_with_td_header() {
        let t = first_table(
            "<table><tr><td>Name</td><td>Qty</td></tr><tr><td>Shelf</td><td>2</td></tr></table>",
        );
        assert_eq!(t.kind, TableKind::Generic);
        assert_eq!(t.headers, strings(&["Name", "Qty"]));
        assert_eq!(t.rows.len(), 1);
    }

    #[test]
    fn empty_table_is_generic() {
        let t = first_table("<table></table>");
        assert_eq!(t.kind, TableKind::Generic);
        assert!(t.headers.is_empty());
        assert!(t.rows.is_empty());
    }

    #[test]
    fn cell_text_is_whitespace_normalized() {
        let t = first_table("<table><tr><td>  Top\n   <b>Rail</b> </td></tr></table>");
        assert_eq!(t.headers, strings(&["Top Rail"]));
    }
}
