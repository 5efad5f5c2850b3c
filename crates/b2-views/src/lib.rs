//! Editor views for the manifest workspace

mod batch;
mod controls;
mod editor;
mod export;

pub use batch::{apply_to_all, BatchBar, BatchError};
pub use controls::{materialize, CellControl, ControlRegistry, MergeOutcome};
pub use editor::{EditorConfig, ManifestEditorView};
pub use export::build_save_request;

use std::sync::Arc;

use parking_lot::RwLock;

use b2_core::events::EventBus;
use b2_core::services::CarrierGateway;
use b2_data::EditSession;

/// Context passed to views during rendering and used by the app to drive
/// backend calls. Owned by the hosting application; the session slot is
/// replaced wholesale on each upload.
#[derive(Clone)]
pub struct EditorContext {
    /// Current editing session, if a manifest is loaded
    pub session: Arc<RwLock<Option<EditSession>>>,

    /// Backend collaborator for upload/options/save
    pub gateway: Arc<dyn CarrierGateway>,

    /// Event bus for manifest lifecycle notifications
    pub events: Arc<EventBus>,

    /// Tokio runtime handle for spawning backend calls
    pub runtime_handle: tokio::runtime::Handle,
}
