//! Explicit partial-document merge for updates.

use serde_json::{Map, Value};

/// New document = base with only the patch's present keys overlaid.
/// Absent keys keep their stored value; present keys replace it wholesale
/// (arrays are replaced, never appended).
pub fn merge_documents(
    base: &Map<String, Value>,
    patch: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn absent_keys_keep_stored_values() {
        let base = obj(json!({
            "title": "Impressionists",
            "heroImage": "/upload/old-hero.jpg",
            "galleryImages": ["/upload/a.jpg", "/upload/b.jpg"]
        }));
        let patch = obj(json!({ "title": "Post-Impressionists" }));
        let merged = merge_documents(&base, &patch);
        assert_eq!(merged["title"], json!("Post-Impressionists"));
        assert_eq!(merged["heroImage"], json!("/upload/old-hero.jpg"));
        assert_eq!(merged["galleryImages"], json!(["/upload/a.jpg", "/upload/b.jpg"]));
    }

    #[test]
    fn arrays_are_replaced_wholesale() {
        let base = obj(json!({ "galleryImages": ["/upload/a.jpg", "/upload/b.jpg"] }));
        let patch = obj(json!({ "galleryImages": ["/upload/c.jpg"] }));
        let merged = merge_documents(&base, &patch);
        assert_eq!(merged["galleryImages"], json!(["/upload/c.jpg"]));
    }

    #[test]
    fn empty_patch_is_identity() {
        let base = obj(json!({ "title": "x", "heading": "y" }));
        let merged = merge_documents(&base, &Map::new());
        assert_eq!(Value::Object(merged), Value::Object(base));
    }
}
