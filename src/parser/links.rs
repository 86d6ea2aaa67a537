use std::path::Path;

use crate::record::{ContentElement, Link, LinkTarget, DESCRIPTION_PLACEHOLDER};
use crate::registry::IdRegistry;

/// What happens to links once a document is extracted.
pub enum LinkPolicy<'a> {
    /// Replace targets with registry identifiers; drop links that miss.
    Resolve(&'a IdRegistry),
    /// Keep the raw href as the target.
    KeepRaw,
}

/// Backslashes become forward slashes.
pub fn normalize_href(href: &str) -> String {
    href.replace('\\', "/")
}

/// Filename stem of a link target, e.g. `../Parts/Door.htm#top` → `Door`.
pub fn link_stem(href: &str) -> Option<&str> {
    Path::new(href).file_stem().and_then(|s| s.to_str())
}

pub fn apply(elements: Vec<ContentElement>, policy: &LinkPolicy) -> Vec<ContentElement> {
    let registry = match policy {
        LinkPolicy::KeepRaw => return elements,
        LinkPolicy::Resolve(registry) => registry,
    };

    elements
        .into_iter()
        .filter_map(|elem| match elem {
            ContentElement::Link(link) => resolve_link(link, registry).map(ContentElement::Link),
            other => Some(other),
        })
        .collect()
}

fn resolve_link(link: Link, registry: &IdRegistry) -> Option<Link> {
    let href = match link.target {
        LinkTarget::Raw(href) => href,
        resolved @ LinkTarget::Resolved(_) => {
            return Some(Link {
                target: resolved,
                ..link
            })
        }
    };
    let id = registry.lookup(link_stem(&href)?)?.clone();
    Some(Link {
        text: link.text,
        target: LinkTarget::Resolved(id),
        description: Some(DESCRIPTION_PLACEHOLDER.to_string()),
    })
}
