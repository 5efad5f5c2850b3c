//! User interface chrome for the manifest editor
//!
//! This crate provides the theme and the shell pieces around the editor
//! grid: menu-bar helpers, the status bar, and the error banner.

pub mod shell;
pub mod theme;

use std::time::Instant;

// Re-export commonly used types
pub use shell::{AppShell, ShellConfig};
pub use theme::{apply_theme, Theme};

/// UI state that persists across frames
pub struct UiState {
    /// Error messages to display, newest last
    pub error_messages: Vec<ErrorMessage>,

    /// Transient status line content
    pub status: Option<String>,

    /// Whether a backend call is in flight
    pub busy: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            error_messages: Vec::new(),
            status: None,
            busy: false,
        }
    }
}

impl UiState {
    /// Queue an error for the banner. Every reported failure goes through
    /// here so nothing is swallowed silently.
    pub fn report_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let title = title.into();
        let message = message.into();
        tracing::error!("{}: {}", title, message);
        self.error_messages.push(ErrorMessage {
            title,
            message,
            timestamp: Instant::now(),
        });
    }

    /// Replace the status line.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}

/// Error message to display
pub struct ErrorMessage {
    pub title: String,
    pub message: String,
    pub timestamp: Instant,
}
