//! Contracts for the backend collaborators
//!
//! The editor never parses or generates spreadsheet bytes itself. Three
//! service calls cover the whole lifecycle: upload a file and get rows back,
//! fetch the per-column choice lists once at startup, and post the edited
//! rows to get the downloadable file. Everything here is the abstract
//! contract; `b2-data` provides the HTTP implementation.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row as it crosses the wire: column name to cell value, `__id` included.
pub type WireRecord = IndexMap<String, String>;

/// Successful upload response: the full header set plus one record per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedManifest {
    pub headers: Vec<String>,
    pub data: Vec<WireRecord>,
}

/// One entry of a choice list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Machine value written into the manifest cell
    pub value: String,
    /// Display label shown to the user
    pub text: String,
}

/// Column name to choice list, as returned by the option service
pub type OptionListing = IndexMap<String, Vec<ChoiceOption>>;

/// Request body for the save service: every header, every row, `__id` kept
/// for round-tripping (the service ignores headers it does not write).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub data: Vec<WireRecord>,
    pub headers: Vec<String>,
}

/// Result of a save call: CSV bytes plus the filename the service suggested.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// The backend the editor talks to.
///
/// Calls are awaited to completion with no retries and no timeouts; a hung
/// call leaves that action's busy indicator spinning.
#[async_trait::async_trait]
pub trait CarrierGateway: Send + Sync {
    /// Upload a manifest file and get the parsed rows back.
    async fn upload(&self, file: &Path) -> anyhow::Result<UploadedManifest>;

    /// Fetch the choice lists for dropdown columns.
    async fn options(&self) -> anyhow::Result<OptionListing>;

    /// Post the edited rows and receive the downloadable file.
    async fn save(&self, request: &SaveRequest) -> anyhow::Result<ExportedFile>;
}
