//! Pure schema validation: a document in, field errors out. No store access.

use crate::schema::{ContentBlock, ContentSide};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field-level errors keyed by document field name.
pub type FieldErrors = BTreeMap<String, String>;

const REQUIRED_STRINGS: &[&str] = &["title", "heading", "heroImage", "mainContentImage"];

fn non_blank_string(v: Option<&Value>) -> bool {
    matches!(v, Some(Value::String(s)) if !s.trim().is_empty())
}

/// Fail-fast create checks, in presentation order. Returns the first problem
/// as the client-facing message, or None when the candidate is acceptable.
pub fn first_create_error(doc: &Map<String, Value>) -> Option<String> {
    if !non_blank_string(doc.get("title")) {
        return Some("Title is required.".into());
    }
    if !non_blank_string(doc.get("heading")) {
        return Some("Heading is required.".into());
    }
    if !non_blank_string(doc.get("heroImage")) {
        return Some("Hero Image is required.".into());
    }
    if !non_blank_string(doc.get("mainContentImage")) {
        return Some("Main Content Image is required.".into());
    }
    let first_block_text = doc
        .get("contentBlocks")
        .and_then(Value::as_array)
        .and_then(|blocks| blocks.first())
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str);
    if first_block_text.map_or(true, |t| t.trim().is_empty()) {
        return Some("At least one content block with text is required.".into());
    }
    None
}

/// Full-schema validation, used on the merged update document. Collects every
/// failing field rather than stopping at the first.
pub fn validate(doc: &Map<String, Value>) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in REQUIRED_STRINGS {
        if !non_blank_string(doc.get(*field)) {
            errors.insert((*field).into(), format!("{field} is required"));
        }
    }

    validate_content_blocks(doc.get("contentBlocks"), &mut errors);

    // Optional fields are checked only when present; null passes, as an
    // unset optional field would.
    if let Some(v) = doc.get("contentSide") {
        let ok = v.is_null() || v.as_str().and_then(ContentSide::parse).is_some();
        if !ok {
            errors.insert(
                "contentSide".into(),
                format!("contentSide must be one of: {}", ContentSide::ALLOWED.join(", ")),
            );
        }
    }

    if let Some(v) = doc.get("galleryImages") {
        let ok = v.is_null()
            || matches!(v, Value::Array(items) if items.iter().all(Value::is_string));
        if !ok {
            errors.insert(
                "galleryImages".into(),
                "galleryImages must be an array of image paths".into(),
            );
        }
    }

    errors
}

fn validate_content_blocks(value: Option<&Value>, errors: &mut FieldErrors) {
    let Some(value) = value else {
        errors.insert(
            "contentBlocks".into(),
            "at least one content block is required".into(),
        );
        return;
    };
    match serde_json::from_value::<Vec<ContentBlock>>(value.clone()) {
        Ok(blocks) if blocks.is_empty() => {
            errors.insert(
                "contentBlocks".into(),
                "at least one content block is required".into(),
            );
        }
        Ok(blocks) => {
            if let Some(i) = blocks.iter().position(|b| b.text.trim().is_empty()) {
                errors.insert(
                    "contentBlocks".into(),
                    format!("content block {i} has empty text"),
                );
            }
        }
        Err(_) => {
            errors.insert(
                "contentBlocks".into(),
                "contentBlocks must be an array of { type, text } blocks".into(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_doc() -> Map<String, Value> {
        match json!({
            "title": "Impressionists",
            "heading": "The collection",
            "heroImage": "/upload/hero.jpg",
            "mainContentImage": "/upload/main.jpg",
            "contentSide": "left",
            "contentBlocks": [{ "type": "paragraph", "text": "Opening text" }],
            "galleryImages": ["/upload/a.jpg"]
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn create_accepts_valid_doc() {
        assert_eq!(first_create_error(&valid_doc()), None);
    }

    #[test]
    fn create_requires_title_first() {
        let mut doc = valid_doc();
        doc.remove("title");
        doc.remove("heading");
        assert_eq!(first_create_error(&doc).as_deref(), Some("Title is required."));
        doc.insert("title".into(), json!("   "));
        assert_eq!(first_create_error(&doc).as_deref(), Some("Title is required."));
    }

    #[test]
    fn create_requires_heading() {
        let mut doc = valid_doc();
        doc.insert("heading".into(), json!(""));
        assert_eq!(first_create_error(&doc).as_deref(), Some("Heading is required."));
    }

    #[test]
    fn create_requires_uploaded_images() {
        let mut doc = valid_doc();
        doc.insert("heroImage".into(), Value::Null);
        assert_eq!(first_create_error(&doc).as_deref(), Some("Hero Image is required."));

        let mut doc = valid_doc();
        doc.remove("mainContentImage");
        assert_eq!(
            first_create_error(&doc).as_deref(),
            Some("Main Content Image is required.")
        );
    }

    #[test]
    fn create_requires_first_block_with_text() {
        let message = "At least one content block with text is required.";
        let mut doc = valid_doc();
        doc.insert("contentBlocks".into(), json!([]));
        assert_eq!(first_create_error(&doc).as_deref(), Some(message));

        doc.insert("contentBlocks".into(), json!([{ "type": "paragraph", "text": "  " }]));
        assert_eq!(first_create_error(&doc).as_deref(), Some(message));

        doc.remove("contentBlocks");
        assert_eq!(first_create_error(&doc).as_deref(), Some(message));
    }

    #[test]
    fn validate_accepts_valid_doc() {
        assert!(validate(&valid_doc()).is_empty());
    }

    #[test]
    fn validate_collects_all_missing_required_fields() {
        let errors = validate(&Map::new());
        for field in ["title", "heading", "heroImage", "mainContentImage", "contentBlocks"] {
            assert!(errors.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn validate_rejects_bad_content_side() {
        let mut doc = valid_doc();
        doc.insert("contentSide".into(), json!("middle"));
        let errors = validate(&doc);
        assert_eq!(
            errors.get("contentSide").map(String::as_str),
            Some("contentSide must be one of: left, right")
        );
    }

    #[test]
    fn validate_allows_null_content_side() {
        let mut doc = valid_doc();
        doc.insert("contentSide".into(), Value::Null);
        assert!(validate(&doc).is_empty());
    }

    #[test]
    fn validate_flags_any_blank_block_text() {
        let mut doc = valid_doc();
        doc.insert(
            "contentBlocks".into(),
            json!([
                { "type": "paragraph", "text": "fine" },
                { "type": "listItem", "text": "" }
            ]),
        );
        let errors = validate(&doc);
        assert_eq!(
            errors.get("contentBlocks").map(String::as_str),
            Some("content block 1 has empty text")
        );
    }

    #[test]
    fn validate_rejects_malformed_blocks() {
        let mut doc = valid_doc();
        doc.insert("contentBlocks".into(), json!([{ "text": "no type tag" }]));
        assert!(validate(&doc).contains_key("contentBlocks"));

        doc.insert("contentBlocks".into(), json!("not an array"));
        assert!(validate(&doc).contains_key("contentBlocks"));
    }

    #[test]
    fn validate_rejects_non_string_gallery_entries() {
        let mut doc = valid_doc();
        doc.insert("galleryImages".into(), json!(["/upload/a.jpg", 7]));
        assert!(validate(&doc).contains_key("galleryImages"));
    }
}
