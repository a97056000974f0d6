//! Shared application state, cloned into every handler.

use crate::store::ExhibitionStore;
use crate::upload::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ExhibitionStore,
    pub uploads: UploadStore,
}
