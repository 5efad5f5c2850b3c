//! Core functionality for the manifest editor
//!
//! This crate provides the column classification table, the lifecycle event
//! bus, and the contracts for the backend services the editor talks to.

pub mod events;
pub mod fields;
pub mod services;

// Re-export commonly used types
pub use events::EventBus;
pub use fields::{FieldCatalog, FieldClass, ROW_ID_FIELD, SHIP_DATE_FIELD};
pub use services::{
    CarrierGateway, ChoiceOption, ExportedFile, OptionListing, SaveRequest, UploadedManifest,
    WireRecord,
};
