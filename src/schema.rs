//! Exhibition document shape: known fields, defaults, embedded content blocks,
//! and the navigation projection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Document fields a client may set. Anything else is dropped before persistence.
pub const FIELDS: &[&str] = &[
    "navTitle",
    "title",
    "breadcrumbs",
    "heroImage",
    "heading",
    "mainContentImage",
    "contentSide",
    "contentBlocks",
    "buttonText",
    "buttonHref",
    "galleryTitle",
    "galleryImages",
];

/// Which side of the main content image the text column renders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSide {
    #[default]
    Left,
    Right,
}

impl ContentSide {
    pub const ALLOWED: &'static [&'static str] = &["left", "right"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(ContentSide::Left),
            "right" => Some(ContentSide::Right),
            _ => None,
        }
    }
}

/// One ordered unit of textual content embedded in an exhibition
/// (e.g. a "paragraph" or "listItem").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub type_: String,
    pub text: String,
}

/// Drop unknown keys and fill schema defaults: `contentSide` "left",
/// `galleryImages` [].
pub fn normalize(doc: &mut Map<String, Value>) {
    doc.retain(|k, _| FIELDS.contains(&k.as_str()));
    doc.entry("contentSide")
        .or_insert_with(|| Value::String("left".into()));
    doc.entry("galleryImages")
        .or_insert_with(|| Value::Array(Vec::new()));
}

/// Navigation projection of one record: identifier plus `navTitle`,
/// the latter omitted when the record has none.
pub fn nav_entry(id: Uuid, nav_title: Option<String>) -> Value {
    let mut obj = Map::new();
    obj.insert("_id".into(), Value::String(id.to_string()));
    if let Some(title) = nav_title {
        obj.insert("navTitle".into(), Value::String(title));
    }
    Value::Object(obj)
}
