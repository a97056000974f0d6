//! Exhibition content API: CRUD over JSONB documents with image uploads.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod schema;
pub mod service;
pub mod state;
pub mod store;
pub mod upload;

pub use error::AppError;
pub use routes::{app, common_routes, exhibition_routes};
pub use schema::{ContentBlock, ContentSide};
pub use state::AppState;
pub use store::{ensure_database_exists, ExhibitionStore};
pub use upload::{UploadStore, UPLOAD_ROUTE};
