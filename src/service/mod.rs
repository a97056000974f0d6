//! Pure request services: schema validation and partial-document merge.

mod merge;
mod validation;

pub use merge::merge_documents;
pub use validation::{first_create_error, validate, FieldErrors};
