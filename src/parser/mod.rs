pub mod elements;
pub mod links;
pub mod tables;
pub mod tags;

use crate::record::ContentElement;
use links::LinkPolicy;

/// Two-step conversion: html → raw elements → elements with links settled.
///
/// The first step is pure and safe to run in parallel; the second needs the
/// registry and runs on the caller's thread.
pub fn parse_document(html: &str) -> Vec<ContentElement> {
    elements::extract_elements(html)
}

pub fn settle_links(content: Vec<ContentElement>, policy: &LinkPolicy) -> Vec<ContentElement> {
    links::apply(content, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{LinkTarget, TableKind};
    use crate::registry::IdRegistry;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.htm", name)).unwrap()
    }

    /// Discriminant sequence, used to check reading order.
    fn kinds(content: &[ContentElement]) -> Vec<&'static str> {
        content
            .iter()
            .map(|e| match e {
                ContentElement::Text { .. } => "text",
                ContentElement::Image(_) => "image",
                ContentElement::Table(t) if t.kind == TableKind::Parameter => "parameter_table",
                ContentElement::Table(_) => "table",
                ContentElement::Link(_) => "link",
            })
            .collect()
    }

    #[test]
    fn door_styles_reading_order() {
        let content = parse_document(&fixture("Door_Styles"));
        assert_eq!(
            kinds(&content),
            vec![
                "text",            // h1
                "text",            // intro p (contains link)
                "link",            // link inside intro
                "image",
                "text",            // h2
                "parameter_table",
                "text",            // ul
                "text",            // li
                "text",            // li
                "link",            // link inside second li
            ]
        );
        match &content[0] {
            ContentElement::Text { body } => assert_eq!(body, "Door Styles"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn door_styles_image_tags_cover_preceding_text_only() {
        let content = parse_document(&fixture("Door_Styles"));
        let img = content
            .iter()
            .find_map(|e| match e {
                ContentElement::Image(img) => Some(img),
                _ => None,
            })
            .unwrap();
        assert_eq!(img.filename, "door_styles.gif");
        assert!(img.context_tags.contains(&"Door".to_string()));
        assert!(!img.context_tags.contains(&"Rail".to_string()));
    }

    #[test]
    fn resolve_policy_drops_unknown_links() {
        let mut reg = IdRegistry::new();
        let id = reg.resolve("Cabinet_Styles");
        let content = settle_links(parse_document(&fixture("Door_Styles")), &LinkPolicy::Resolve(&reg));

        let links: Vec<_> = content
            .iter()
            .filter_map(|e| match e {
                ContentElement::Link(l) => Some(l),
                _ => None,
            })
            .collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, LinkTarget::Resolved(id));
    }

    #[test]
    fn keep_raw_policy_keeps_every_link() {
        let content = settle_links(parse_document(&fixture("Door_Styles")), &LinkPolicy::KeepRaw);
        let hrefs: Vec<_> = content
            .iter()
            .filter_map(|e| match e {
                ContentElement::Link(l) => match &l.target {
                    LinkTarget::Raw(href) => Some(href.as_str()),
                    LinkTarget::Resolved(_) => None,
                },
                _ => None,
            })
            .collect();
        assert_eq!(hrefs, vec!["../Cabinets/Cabinet_Styles.htm", "Hinge_Options.htm"]);
    }
}
