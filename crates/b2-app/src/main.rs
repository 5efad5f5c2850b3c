//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{self, Ui};
use parking_lot::RwLock;
use tracing::info;

use b2_core::events::{events as manifest_events, handler_from_fn, EventBus};
use b2_core::services::ExportedFile;
use b2_data::{EditSession, GatewayConfig, HttpGateway, OptionCatalog};
use b2_ui::{apply_theme, AppShell, Theme, UiState};
use b2_views::{build_save_request, BatchBar, EditorContext, ManifestEditorView};

/// Main application state
struct ManifestEditorApp {
    /// Shared context handed to views and backend tasks
    context: EditorContext,

    /// The editable grid
    editor: ManifestEditorView,

    /// Ship-date batch bar
    batch_bar: BatchBar,

    /// Window chrome (status bar, error banner)
    shell: AppShell,

    /// Cross-frame UI state, shared with backend tasks for error reporting
    ui_state: Arc<RwLock<UiState>>,

    /// Choice lists fetched once at startup
    options: Arc<RwLock<OptionCatalog>>,

    /// Export handed back by the save service, waiting for a download path
    pending_export: Arc<RwLock<Option<ExportedFile>>>,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,

    /// Egui context
    egui_ctx: egui::Context,
}

impl ManifestEditorApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Setup custom theme
        apply_theme(&cc.egui_ctx, &Theme::default());

        // Initialize tokio runtime
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let config = GatewayConfig::load();
        info!("Using backend at {}", config.base_url);
        let gateway = Arc::new(HttpGateway::new(&config));

        let ui_state = Arc::new(RwLock::new(UiState::default()));
        let options = Arc::new(RwLock::new(OptionCatalog::empty()));

        // Wire lifecycle events into the status line
        let events = Arc::new(EventBus::new());
        {
            let ui_state = ui_state.clone();
            events.subscribe::<manifest_events::ManifestLoaded>(handler_from_fn(move |event| {
                if let Some(loaded) = event
                    .as_any()
                    .downcast_ref::<manifest_events::ManifestLoaded>()
                {
                    ui_state.write().set_status(format!(
                        "{}: {} rows, {} columns",
                        loaded.source_name, loaded.row_count, loaded.column_count
                    ));
                }
            }));
        }
        {
            let ui_state = ui_state.clone();
            events.subscribe::<manifest_events::ManifestExported>(handler_from_fn(move |event| {
                if let Some(exported) = event
                    .as_any()
                    .downcast_ref::<manifest_events::ManifestExported>()
                {
                    ui_state.write().set_status(format!(
                        "Exported {} rows as {}",
                        exported.row_count, exported.filename
                    ));
                }
            }));
        }

        // Fetch the choice lists once; failure degrades dropdowns to empty
        // option sets but never blocks the editor.
        {
            let gateway = gateway.clone();
            let options = options.clone();
            let events = events.clone();
            let ui_state = ui_state.clone();
            let ctx = cc.egui_ctx.clone();
            runtime.spawn(async move {
                match gateway.options().await {
                    Ok(listing) => {
                        info!("Loaded choice lists for {} columns", listing.len());
                        *options.write() = OptionCatalog::new(listing);
                    }
                    Err(error) => {
                        events.publish(manifest_events::OptionsUnavailable {
                            error: error.to_string(),
                        });
                        ui_state
                            .write()
                            .report_error("Choice lists unavailable", error.to_string());
                    }
                }
                ctx.request_repaint();
            });
        }

        let context = EditorContext {
            session: Arc::new(RwLock::new(None)),
            gateway,
            events,
            runtime_handle: runtime.handle().clone(),
        };

        Self {
            context,
            editor: ManifestEditorView::new(),
            batch_bar: BatchBar::new(),
            shell: AppShell::new(),
            ui_state,
            options,
            pending_export: Arc::new(RwLock::new(None)),
            runtime,
            egui_ctx: cc.egui_ctx.clone(),
        }
    }

    /// Upload a manifest file and replace the session with the result.
    /// Any unsaved edits in the previous session are discarded.
    fn open_manifest(&self, path: PathBuf) {
        info!("Uploading manifest: {:?}", path);
        self.ui_state.write().busy = true;

        let source_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("manifest.csv")
            .to_string();
        let gateway = self.context.gateway.clone();
        let session_slot = self.context.session.clone();
        let events = self.context.events.clone();
        let options = self.options.clone();
        let ui_state = self.ui_state.clone();
        let ctx = self.egui_ctx.clone();
        let runtime = self.runtime.handle().clone();

        runtime.spawn(async move {
            match gateway.upload(&path).await {
                Ok(manifest) => {
                    let session = EditSession::from_upload(
                        source_name.as_str(),
                        manifest,
                        options.read().clone(),
                    );
                    let row_count = session.store.len();
                    let column_count = session.store.headers().len();
                    *session_slot.write() = Some(session);
                    events.publish(manifest_events::ManifestLoaded {
                        source_name,
                        row_count,
                        column_count,
                    });
                }
                Err(error) => {
                    events.publish(manifest_events::ManifestLoadFailed {
                        source_name,
                        error: error.to_string(),
                    });
                    ui_state
                        .write()
                        .report_error("Upload failed", error.to_string());
                }
            }
            ui_state.write().busy = false;
            ctx.request_repaint();
        });
    }

    /// Merge live edits, post them to the save service, and stash the
    /// returned file for the download step.
    fn save_manifest(&mut self) {
        let request = {
            let session = self.context.session.read();
            let Some(session) = session.as_ref() else {
                self.ui_state
                    .write()
                    .report_error("Save", "Upload a manifest first");
                return;
            };
            if session.store.is_empty() {
                self.ui_state.write().report_error("Save", "No rows to export");
                return;
            }

            let outcome = self.editor.materialize(&session.store);
            if !outcome.orphaned.is_empty() {
                tracing::warn!(
                    "{} control rows had no stored counterpart during merge",
                    outcome.orphaned.len()
                );
            }
            build_save_request(session.store.headers(), &outcome.rows)
        };

        self.ui_state.write().busy = true;

        let gateway = self.context.gateway.clone();
        let events = self.context.events.clone();
        let ui_state = self.ui_state.clone();
        let pending_export = self.pending_export.clone();
        let ctx = self.egui_ctx.clone();
        let row_count = request.data.len();

        self.context.runtime_handle.spawn(async move {
            match gateway.save(&request).await {
                Ok(file) => {
                    events.publish(manifest_events::ManifestExported {
                        filename: file.filename.clone(),
                        row_count,
                    });
                    *pending_export.write() = Some(file);
                }
                Err(error) => {
                    events.publish(manifest_events::ExportFailed {
                        error: error.to_string(),
                    });
                    ui_state
                        .write()
                        .report_error("Save failed", error.to_string());
                }
            }
            ui_state.write().busy = false;
            ctx.request_repaint();
        });
    }

    /// Offer a download location for an export returned by the save service.
    fn drain_pending_export(&mut self) {
        let Some(file) = self.pending_export.write().take() else {
            return;
        };

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&file.filename)
            .save_file()
        {
            match std::fs::write(&path, &file.bytes) {
                Ok(()) => {
                    info!("Wrote export to {:?}", path);
                    self.ui_state
                        .write()
                        .set_status(format!("Saved {}", path.display()));
                }
                Err(error) => {
                    self.ui_state
                        .write()
                        .report_error("Could not write file", error.to_string());
                }
            }
        } else {
            self.ui_state.write().set_status("Export discarded");
        }
    }

    /// Handle menu actions
    fn handle_menu(&mut self) {
        let ctx = self.egui_ctx.clone();
        egui::TopBottomPanel::top("menu_bar").show(&ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open manifest…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Spreadsheets", &["csv"])
                            .pick_file()
                        {
                            self.open_manifest(path);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Exit").clicked() {
                        self.egui_ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.ui_state.read().busy {
                        ui.spinner();
                    }
                });
            });
        });
    }

    /// Show welcome screen
    fn show_welcome_screen(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading(egui::RichText::new("B2 Manifest Editor").size(32.0).strong());
            ui.add_space(8.0);
            ui.label("Upload a shipment manifest to start editing");
            ui.add_space(24.0);
            if ui.button("📄 Open manifest…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Spreadsheets", &["csv"])
                    .pick_file()
                {
                    self.open_manifest(path);
                }
            }
        });
    }
}

impl eframe::App for ManifestEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Exports returned by the save service wait here for a download path
        self.drain_pending_export();

        // Menu bar
        self.handle_menu();

        // Error banner and status bar
        self.shell.error_banner(ctx, &mut self.ui_state.write());
        let summary = self.context.session.read().as_ref().map(|session| {
            format!(
                "{} — {} rows",
                session.source_name,
                session.store.len()
            )
        });
        self.shell
            .status_bar(ctx, &self.ui_state.read(), summary.as_deref());

        // Main content area
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.context.session.read().is_none() {
                self.show_welcome_screen(ui);
                return;
            }

            ui.horizontal(|ui| {
                self.batch_bar.ui(ui, self.editor.registry_mut());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("💾 Save & download").clicked() {
                        self.save_manifest();
                    }
                });
            });
            ui.separator();

            let context = self.context.clone();
            self.editor.ui(ui, &context);
        });
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting b2edit manifest editor");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "b2edit — shipment manifest editor",
        options,
        Box::new(|cc| Box::new(ManifestEditorApp::new(cc))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
