//! Data model and backend gateway for the manifest editor

pub mod config;
pub mod gateway;
pub mod options;
pub mod row;
pub mod session;
pub mod store;

use thiserror::Error;

// Re-exports
pub use config::GatewayConfig;
pub use gateway::HttpGateway;
pub use options::OptionCatalog;
pub use row::{Row, RowId};
pub use session::EditSession;
pub use store::RowStore;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Server(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DataError {
    fn from(error: reqwest::Error) -> Self {
        DataError::Transport(error.to_string())
    }
}
