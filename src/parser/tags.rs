use std::collections::BTreeSet;

use crate::record::ContentElement;

/// Distinct whitespace tokens of every text element so far, sorted.
///
/// Callers pass only the current document's elements.
pub fn context_tags(elements: &[ContentElement]) -> Vec<String> {
    let tokens: BTreeSet<&str> = elements
        .iter()
        .filter_map(|e| match e {
            ContentElement::Text { body } => Some(body.as_str()),
            _ => None,
        })
        .flat_map(str::split_whitespace)
        .collect();

    tokens.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Table, TableKind};

    fn text(s: &str) -> ContentElement {
        ContentElement::Text { body: s.to_string() }
    }

    #[test]
    fn sorted_and_deduplicated() {
        let elements = vec![text("Open the Parts list"), text("Select a part")];
        assert_eq!(
            context_tags(&elements),
            vec!["Open", "Parts", "Select", "a", "list", "part", "the"]
        );
    }

    #[test]
    fn ignores_non_text_elements() {
        let elements = vec![
            ContentElement::Table(Table {
                kind: TableKind::Generic,
                headers: vec!["Hidden".into()],
                rows: vec![],
            }),
            text("Door  door"),
        ];
        assert_eq!(context_tags(&elements), vec!["Door", "door"]);
    }

    #[test]
    fn empty_without_text() {
        assert!(context_tags(&[]).is_empty());
    }
}
