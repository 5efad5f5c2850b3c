//! Main window chrome: status bar and error banner

use egui::{Color32, Context, RichText, TopBottomPanel};

use crate::UiState;

/// Application shell that renders the fixed chrome around the editor
pub struct AppShell;

/// Shell configuration
pub struct ShellConfig {
    pub show_status_bar: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            show_status_bar: true,
        }
    }
}

impl AppShell {
    /// Create a new app shell
    pub fn new() -> Self {
        Self
    }

    /// Dismissible error banner under the menu bar. Transport failures,
    /// server-reported errors and rejected inputs all surface here.
    pub fn error_banner(&self, ctx: &Context, state: &mut UiState) {
        if state.error_messages.is_empty() {
            return;
        }

        TopBottomPanel::top("error_banner").show(ctx, |ui| {
            let mut dismissed: Option<usize> = None;
            for (index, error) in state.error_messages.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("{}: {}", error.title, error.message))
                            .color(Color32::from_rgb(240, 120, 110)),
                    );
                    if ui.small_button("Dismiss").clicked() {
                        dismissed = Some(index);
                    }
                });
            }
            if let Some(index) = dismissed {
                state.error_messages.remove(index);
            }
        });
    }

    /// Bottom status bar: session summary on the left, busy indicator and
    /// the latest status message on the right.
    pub fn status_bar(&self, ctx: &Context, state: &UiState, summary: Option<&str>) {
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(summary) = summary {
                    ui.label(summary);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if state.busy {
                        ui.spinner();
                        ui.label("Working…");
                    }
                    if let Some(status) = &state.status {
                        ui.weak(status);
                    }
                });
            });
        });
    }
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}
