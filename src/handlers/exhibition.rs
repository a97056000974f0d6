//! Exhibition CRUD handlers: create, list, read, nav projection, update, delete.

use crate::error::AppError;
use crate::schema;
use crate::service::{first_create_error, merge_documents, validate};
use crate::state::AppState;
use crate::upload::read_exhibition_body;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

const NOT_FOUND: &str = "Exhibition not found";

/// Store-assigned ids are UUIDs. Anything else is a malformed identifier and
/// surfaces as a server error, like any other store-level failure.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::Internal(format!("malformed exhibition id '{id}'")))
}

fn opt_string(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

fn string_array(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

/// POST /api/exhibitions
pub async fn create_exhibition(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let body = read_exhibition_body(multipart, &state.uploads).await?;
    let mut doc = body.fields;
    // Image paths come exclusively from this request's uploads; string values
    // smuggled in through `data` are discarded.
    doc.insert("heroImage".into(), opt_string(body.images.hero_image));
    doc.insert(
        "mainContentImage".into(),
        opt_string(body.images.main_content_image),
    );
    doc.insert(
        "galleryImages".into(),
        string_array(body.images.gallery_images),
    );

    if let Some(message) = first_create_error(&doc) {
        return Err(AppError::Validation(message));
    }
    // The fail-fast checks cover the headline fields; the rest of the schema
    // (contentSide enum, block shape) still has to hold before persistence.
    let errors = validate(&doc);
    if !errors.is_empty() {
        return Err(AppError::FieldValidation(errors));
    }
    schema::normalize(&mut doc);
    let created = state.store.insert(&doc).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/exhibitions
pub async fn list_exhibitions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/exhibitions/:id
pub async fn get_exhibition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(Json(record))
}

/// GET /api/exhibitions/nav/exhibitions
pub async fn nav_exhibitions(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.store.list_nav().await?))
}

/// PUT /api/exhibitions/:id
pub async fn update_exhibition(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let body = read_exhibition_body(multipart, &state.uploads).await?;
    let mut patch = body.fields;

    // Image fields are replaced only when new files arrived with this
    // request; otherwise the stored value survives the merge untouched.
    match body.images.hero_image {
        Some(path) => {
            patch.insert("heroImage".into(), Value::String(path));
        }
        None => {
            patch.remove("heroImage");
            tracing::warn!(%id, "no hero image uploaded; keeping stored value");
        }
    }
    match body.images.main_content_image {
        Some(path) => {
            patch.insert("mainContentImage".into(), Value::String(path));
        }
        None => {
            patch.remove("mainContentImage");
            tracing::warn!(%id, "no main content image uploaded; keeping stored value");
        }
    }
    if body.images.gallery_images.is_empty() {
        patch.remove("galleryImages");
        tracing::warn!(%id, "no gallery images uploaded; keeping stored values");
    } else {
        patch.insert(
            "galleryImages".into(),
            string_array(body.images.gallery_images),
        );
    }

    let base = state
        .store
        .find_document(id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    let mut merged = merge_documents(&base, &patch);
    let errors = validate(&merged);
    if !errors.is_empty() {
        return Err(AppError::FieldValidation(errors));
    }
    schema::normalize(&mut merged);

    let updated = state
        .store
        .update(id, &merged)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(Json(updated))
}

/// DELETE /api/exhibitions/:id
pub async fn delete_exhibition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(Json(json!({ "message": "Exhibition deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_uuids() {
        assert!(parse_id("00000000-0000-0000-0000-000000000000").is_ok());
    }

    #[test]
    fn parse_id_classifies_garbage_as_internal() {
        assert!(matches!(parse_id("not-a-uuid"), Err(AppError::Internal(_))));
    }

    #[test]
    fn opt_string_defaults_to_null() {
        assert_eq!(opt_string(None), Value::Null);
        assert_eq!(opt_string(Some("/upload/x.jpg".into())), json!("/upload/x.jpg"));
    }
}
