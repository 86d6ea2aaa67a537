//! Output record types and their JSON wire shape.
//!
//! `ContentElement` is the in-memory model; on the wire each element is an
//! object tagged by `"type"` with its payload under `"data"`, which is the
//! format downstream indexers already consume.

use serde::{Deserialize, Serialize};

use crate::registry::Identifier;

/// Stand-in for descriptions filled later by an external enrichment step.
pub const DESCRIPTION_PLACEHOLDER: &str = "[Placeholder for AI-generated description]";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SourceType {
    /// Built-in help files
    #[default]
    HelpFile,
    /// Paid user forum
    UserForum,
    /// Public community chat
    CommunityChat,
    /// Snippets shared online
    PublicSnippet,
    /// Any other source
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Generic,
    Parameter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub kind: TableKind,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub filename: String,
    pub description: String,
    pub context_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Resolved(Identifier),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub target: LinkTarget,
    /// Only present once the target is resolved.
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "wire::Element", into = "wire::Element")]
pub enum ContentElement {
    Text { body: String },
    Image(Image),
    Table(Table),
    Link(Link),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    pub title: String,
    pub content: Vec<ContentElement>,
    pub source_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub source_type: SourceType,
}

impl DocumentRecord {
    /// Pretty JSON with four-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Compact single-line JSON, without the trailing newline.
    pub fn to_ndjson_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

mod wire {
    use serde::{Deserialize, Serialize};

    use super::{ContentElement, Image, Link, LinkTarget, Table, TableKind};
    use crate::registry::Identifier;

    #[derive(Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum Element {
        Text {
            data: String,
        },
        Image {
            data: String,
            description: String,
            #[serde(default)]
            context_tags: Vec<String>,
        },
        Table {
            data: TableData,
        },
        ParameterTable {
            data: TableData,
        },
        Link {
            data: LinkData,
        },
    }

    #[derive(Serialize, Deserialize)]
    pub struct TableData {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    }

    #[derive(Serialize, Deserialize)]
    pub struct LinkData {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uuid: Option<Identifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    }

    impl From<ContentElement> for Element {
        fn from(elem: ContentElement) -> Self {
            match elem {
                ContentElement::Text { body } => Element::Text { data: body },
                ContentElement::Image(img) => Element::Image {
                    data: img.filename,
                    description: img.description,
                    context_tags: img.context_tags,
                },
                ContentElement::Table(table) => {
                    let data = TableData {
                        headers: table.headers,
                        rows: table.rows,
                    };
                    match table.kind {
                        TableKind::Generic => Element::Table { data },
                        TableKind::Parameter => Element::ParameterTable { data },
                    }
                }
                ContentElement::Link(link) => {
                    let (uuid, url) = match link.target {
                        LinkTarget::Resolved(id) => (Some(id), None),
                        LinkTarget::Raw(href) => (None, Some(href)),
                    };
                    Element::Link {
                        data: LinkData {
                            text: link.text,
                            uuid,
                            url,
                            description: link.description,
                        },
                    }
                }
            }
        }
    }

    impl From<Element> for ContentElement {
        fn from(elem: Element) -> Self {
            match elem {
                Element::Text { data } => ContentElement::Text { body: data },
                Element::Image {
                    data,
                    description,
                    context_tags,
                } => ContentElement::Image(Image {
                    filename: data,
                    description,
                    context_tags,
                }),
                Element::Table { data } => table(TableKind::Generic, data),
                Element::ParameterTable { data } => table(TableKind::Parameter, data),
                Element::Link { data } => {
                    let target = match data.uuid {
                        Some(id) => LinkTarget::Resolved(id),
                        None => LinkTarget::Raw(data.url.unwrap_or_default()),
                    };
                    ContentElement::Link(Link {
                        text: data.text,
                        target,
                        description: data.description,
                    })
                }
            }
        }
    }

    fn table(kind: TableKind, data: TableData) -> ContentElement {
        ContentElement::Table(Table {
            kind,
            headers: data.headers,
            rows: data.rows,
        })
    }
}
