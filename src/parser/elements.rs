use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::links::normalize_href;
use super::{tables, tags};
use crate::record::{ContentElement, Image, Link, LinkTarget, DESCRIPTION_PLACEHOLDER};

/// Every node kind that yields an element. Selection is in document order
/// and nested matches (a `li` inside a `ul`) are each visited.
static NODE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, ul, ol, li, table, img, a").unwrap()
});

/// Walk the document and emit one element per matched node.
///
/// Links come out with raw targets; resolution is a separate step so that
/// extraction can run without the registry.
pub fn extract_elements(html: &str) -> Vec<ContentElement> {
    let document = Html::parse_document(html);
    let mut elements = Vec::new();

    for node in document.select(&NODE_SEL) {
        if let Some(elem) = extract_node(node, &elements) {
            elements.push(elem);
        }
    }

    elements
}

fn extract_node(node: ElementRef, so_far: &[ContentElement]) -> Option<ContentElement> {
    let el = node.value();
    match el.name() {
        "img" => match el.attr("src") {
            Some(src) => Some(ContentElement::Image(Image {
                filename: image_filename(src).to_string(),
                description: DESCRIPTION_PLACEHOLDER.to_string(),
                context_tags: tags::context_tags(so_far),
            })),
            None => text_element(node),
        },
        "table" => Some(ContentElement::Table(tables::extract_table(node))),
        "a" => match el.attr("href") {
            Some(href) => Some(ContentElement::Link(Link {
                text: normalized_text(node),
                target: LinkTarget::Raw(normalize_href(href)),
                description: None,
            })),
            None => text_element(node),
        },
        _ => text_element(node),
    }
}

fn text_element(node: ElementRef) -> Option<ContentElement> {
    let body = normalized_text(node);
    if body.is_empty() {
        None
    } else {
        Some(ContentElement::Text { body })
    }
}

/// Final path segment of an image reference.
fn image_filename(src: &str) -> &str {
    src.rsplit(['/', '\\']).next().unwrap_or(src)
}

/// Text content with runs of whitespace collapsed to single spaces.
pub(crate) fn normalized_text(node: ElementRef) -> String {
    node.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
