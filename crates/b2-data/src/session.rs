//! Editing session lifecycle
//!
//! One session per uploaded manifest. The hosting application owns exactly
//! one (optional) session and replaces it wholesale on the next upload; a
//! replacement discards any unsaved edits, which is the intended behavior.

use uuid::Uuid;

use b2_core::services::UploadedManifest;

use crate::options::OptionCatalog;
use crate::store::RowStore;

/// Everything the editor needs for one uploaded manifest.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Distinguishes this session from its predecessor so views know to
    /// rebuild their control state
    pub id: Uuid,

    /// The authoritative rows and header order
    pub store: RowStore,

    /// Choice lists captured at session creation
    pub options: OptionCatalog,

    /// Name of the uploaded file, for display
    pub source_name: String,
}

impl EditSession {
    /// Build a session from a successful upload response.
    pub fn from_upload(
        source_name: impl Into<String>,
        manifest: UploadedManifest,
        options: OptionCatalog,
    ) -> Self {
        let mut store = RowStore::new();
        store.load(manifest.headers, manifest.data);
        Self {
            id: Uuid::new_v4(),
            store,
            options,
            source_name: source_name.into(),
        }
    }
}
