//! Multipart intake: uploaded images to disk, text fields to one document patch.
//!
//! Contract for write requests: the body is `multipart/form-data`. A `data`
//! field must hold a JSON object and contributes its members as document
//! fields; any other text field contributes a string value (structured fields
//! such as `contentBlocks` therefore travel via `data`). Files are accepted
//! under `heroImage`, `mainContentImage` (one each) and `galleryImages`
//! (repeated). Files already written when a later field fails are not
//! cleaned up.

use crate::error::AppError;
use axum::extract::multipart::{Field, Multipart};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Route prefix the on-disk upload directory is served under.
pub const UPLOAD_ROUTE: &str = "/upload";

/// Most gallery images accepted in one request.
pub const MAX_GALLERY_IMAGES: usize = 100;

/// Writes uploaded files into one directory under generated names.
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create the upload directory if needed and return a store rooted there.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Internal(format!("create upload dir {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one uploaded file; returns the generated on-disk filename.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, AppError> {
        let filename = unique_filename(original_name);
        let path = self.root.join(&filename);
        tokio::fs::write(&path, data).await.map_err(|e| {
            AppError::Internal(format!("write upload {}: {}", path.display(), e))
        })?;
        tracing::debug!(file = %filename, bytes = data.len(), "stored upload");
        Ok(filename)
    }
}

/// Public path a stored filename is served under.
pub fn public_path(filename: &str) -> String {
    format!("{UPLOAD_ROUTE}/{filename}")
}

/// Unique on-disk name: UUID prefix plus the sanitized client name.
fn unique_filename(original: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_filename(original))
}

/// Keep ASCII alphanumerics, dot, dash and underscore; everything else,
/// including any path components the client sent, becomes '_'.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.' || c == '_') {
        "file".into()
    } else {
        cleaned
    }
}

/// Images stored from one request, already mapped to public paths.
#[derive(Debug, Default)]
pub struct UploadedImages {
    pub hero_image: Option<String>,
    pub main_content_image: Option<String>,
    pub gallery_images: Vec<String>,
}

/// Parsed write-request body: document fields plus this request's uploads.
#[derive(Debug, Default)]
pub struct ExhibitionBody {
    pub fields: Map<String, Value>,
    pub images: UploadedImages,
}

/// Drain the multipart stream, writing image files through `uploads` and
/// collecting everything else into one field map.
pub async fn read_exhibition_body(
    mut multipart: Multipart,
    uploads: &UploadStore,
) -> Result<ExhibitionBody, AppError> {
    let mut body = ExhibitionBody::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(format!("multipart: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "heroImage" => {
                body.images.hero_image = Some(store_file(field, uploads).await?);
            }
            "mainContentImage" => {
                body.images.main_content_image = Some(store_file(field, uploads).await?);
            }
            "galleryImages" => {
                if body.images.gallery_images.len() >= MAX_GALLERY_IMAGES {
                    return Err(AppError::Upload(format!(
                        "at most {MAX_GALLERY_IMAGES} gallery images per request"
                    )));
                }
                body.images.gallery_images.push(store_file(field, uploads).await?);
            }
            "data" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Upload(format!("read field 'data': {e}")))?;
                let value: Value = serde_json::from_str(&text).map_err(|e| {
                    AppError::Validation(format!("field 'data' is not valid JSON: {e}"))
                })?;
                match value {
                    Value::Object(members) => body.fields.extend(members),
                    _ => {
                        return Err(AppError::Validation(
                            "field 'data' must be a JSON object".into(),
                        ))
                    }
                }
            }
            _ => {
                if field.file_name().is_some() {
                    return Err(AppError::Upload(format!("unexpected file field '{name}'")));
                }
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Upload(format!("read field '{name}': {e}")))?;
                body.fields.insert(name, Value::String(text));
            }
        }
    }
    Ok(body)
}

async fn store_file(field: Field<'_>, uploads: &UploadStore) -> Result<String, AppError> {
    let original = field.file_name().unwrap_or("upload").to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Upload(format!("read upload '{original}': {e}")))?;
    let filename = uploads.save(&original, &data).await?;
    Ok(public_path(&filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_names() {
        assert_eq!(sanitize_filename("hero.jpg"), "hero.jpg");
        assert_eq!(sanitize_filename("main-image_2.png"), "main-image_2.png");
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\hero.jpg"), "hero.jpg");
    }

    #[test]
    fn sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
    }

    #[test]
    fn sanitize_never_yields_empty_or_dotfile_only() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("..."), "file");
    }

    #[test]
    fn unique_filenames_differ_but_keep_the_name() {
        let a = unique_filename("hero.jpg");
        let b = unique_filename("hero.jpg");
        assert_ne!(a, b);
        assert!(a.ends_with("-hero.jpg"));
    }

    #[test]
    fn public_path_prefixes_the_upload_route() {
        assert_eq!(public_path("abc-hero.jpg"), "/upload/abc-hero.jpg");
    }

    #[tokio::test]
    async fn save_writes_into_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads")).await.unwrap();
        let filename = store.save("hero.jpg", b"jpeg bytes").await.unwrap();
        let written = tokio::fs::read(store.root().join(&filename)).await.unwrap();
        assert_eq!(written, b"jpeg bytes");
    }
}
