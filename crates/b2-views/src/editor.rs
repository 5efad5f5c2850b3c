//! The manifest editor grid
//!
//! Renders one row per uploaded record and one column per visible field,
//! dispatching each cell to the control matching its classification. All
//! widget state lives in the control registry, which `materialize` reads
//! back; the widgets here are plain views over that registry.

use chrono::NaiveDate;
use egui::Ui;
use egui_extras::DatePickerButton;

use b2_core::fields::{FieldCatalog, FieldClass};
use b2_core::services::ChoiceOption;
use b2_data::{EditSession, Row, RowStore};

use crate::controls::{materialize, CellControl, ControlRegistry, MergeOutcome};
use crate::EditorContext;

/// Configuration for the editor grid
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub striped_rows: bool,
    pub resizable_columns: bool,
    /// Cap on entries shown in a freeform suggestion popup
    pub max_suggestions: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            striped_rows: true,
            resizable_columns: true,
            max_suggestions: 10,
        }
    }
}

/// Editable grid over the current session's rows.
pub struct ManifestEditorView {
    pub config: EditorConfig,

    // State
    registry: ControlRegistry,
    loaded_session: Option<uuid::Uuid>,
}

impl ManifestEditorView {
    /// Create an editor with no session attached yet.
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            registry: ControlRegistry::default(),
            loaded_session: None,
        }
    }

    /// Live control registry, for the batch bar.
    pub fn registry_mut(&mut self) -> &mut ControlRegistry {
        &mut self.registry
    }

    /// Merge live edits into fresh copies of the stored rows.
    pub fn materialize(&self, store: &RowStore) -> MergeOutcome {
        materialize(store, &self.registry)
    }

    /// Render the grid for the current session, rebuilding the control
    /// registry whenever the session was replaced by a new upload.
    pub fn ui(&mut self, ui: &mut Ui, ctx: &EditorContext) {
        let session = ctx.session.read();
        let Some(session) = session.as_ref() else {
            return;
        };

        if self.loaded_session != Some(session.id) {
            self.registry = ControlRegistry::for_store(&session.store);
            self.loaded_session = Some(session.id);
            tracing::info!(
                "Editor bound to {} ({} rows, {} controls)",
                session.source_name,
                session.store.len(),
                self.registry.len()
            );
        }

        self.render_grid(ui, session);
    }

    fn render_grid(&mut self, ui: &mut Ui, session: &EditSession) {
        use egui_extras::{Column, TableBuilder};

        // Render only visible columns the upload actually carries.
        let visible: Vec<&'static str> = FieldCatalog::visible_fields()
            .iter()
            .copied()
            .filter(|column| session.store.headers().iter().any(|header| header == column))
            .collect();

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 2.0;
        let num_rows = session.store.len();

        let mut builder = TableBuilder::new(ui)
            .striped(self.config.striped_rows)
            .resizable(self.config.resizable_columns)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .vscroll(true);

        for _ in &visible {
            builder = builder.column(
                Column::initial(130.0)
                    .at_least(70.0)
                    .at_most(360.0)
                    .clip(true),
            );
        }

        builder
            .header(20.0, |mut header| {
                for column in &visible {
                    header.col(|ui| {
                        ui.strong(*column);
                    });
                }
            })
            .body(|body| {
                body.rows(text_height, num_rows, |row_index, mut table_row| {
                    let Some(row) = session.store.rows().get(row_index) else {
                        return;
                    };
                    for column in &visible {
                        table_row.col(|ui| {
                            self.render_cell(ui, session, row, column);
                        });
                    }
                });
            });
    }

    /// Render one cell, dispatching on the column's classification.
    fn render_cell(&mut self, ui: &mut Ui, session: &EditSession, row: &Row, column: &str) {
        let class = FieldCatalog::classify(column);
        if !class.is_editable() {
            ui.label(row.get(column));
            return;
        }

        let cell_id = egui::Id::new(("cell", row.id.as_str(), column));
        let max_suggestions = self.config.max_suggestions;
        let Some(control) = self.registry.get_mut(&row.id, column) else {
            // An editable cell without a control should not happen; render the
            // stored value read-only rather than invent edit state.
            ui.label(row.get(column));
            return;
        };

        match control {
            CellControl::Date(value) => {
                let picker_id = format!("date-{}-{}", row.id, column);
                date_cell(ui, &picker_id, value);
            }
            CellControl::Choice(selected) => {
                choice_cell(ui, cell_id, selected, session.options.options_for(column));
            }
            CellControl::Text(text) => {
                ui.add(egui::TextEdit::singleline(text).desired_width(f32::INFINITY));
            }
            CellControl::Freeform { .. } => {
                freeform_cell(
                    ui,
                    cell_id,
                    control,
                    session.options.options_for(column),
                    max_suggestions,
                );
            }
        }
    }
}

impl Default for ManifestEditorView {
    fn default() -> Self {
        Self::new()
    }
}

/// Date cell: a picker when a date is set, a placeholder button when empty.
fn date_cell(ui: &mut Ui, id_source: &str, value: &mut Option<NaiveDate>) {
    match value {
        Some(date) => {
            ui.add(DatePickerButton::new(date).id_source(id_source));
            if ui
                .small_button("✖")
                .on_hover_text("Clear the date")
                .clicked()
            {
                *value = None;
            }
        }
        None => {
            if ui.button("—").on_hover_text("Set a date").clicked() {
                *value = Some(chrono::Local::now().date_naive());
            }
        }
    }
}

/// Closed dropdown bound to the option list. An unmatched stored value is
/// shown raw and kept; picking an option overwrites it with that option's
/// machine value.
fn choice_cell(ui: &mut Ui, id: egui::Id, selected: &mut String, options: &[ChoiceOption]) {
    let display = options
        .iter()
        .find(|option| &option.value == selected)
        .map(|option| option.text.clone())
        .unwrap_or_else(|| selected.clone());

    egui::ComboBox::from_id_source(id)
        .selected_text(display)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(selected, option.value.clone(), &option.text);
            }
        });
}

/// Free-text cell with a suggestion popup. Focus clears the field (stashing
/// the old text), blur restores it if nothing was typed; suggestions fill the
/// field but never constrain it.
fn freeform_cell(
    ui: &mut Ui,
    id: egui::Id,
    control: &mut CellControl,
    options: &[ChoiceOption],
    max_suggestions: usize,
) {
    let edit_id = id.with("edit");
    let popup_id = id.with("suggestions");

    let response = {
        let CellControl::Freeform { text, .. } = &mut *control else {
            return;
        };
        ui.add(
            egui::TextEdit::singleline(text)
                .id(edit_id)
                .desired_width(f32::INFINITY),
        )
    };

    if response.gained_focus() {
        control.on_focus();
        ui.memory_mut(|memory| memory.open_popup(popup_id));
    }
    if response.lost_focus() {
        control.on_blur();
    }

    let suggestions: Vec<String> = {
        let CellControl::Freeform { text, .. } = &*control else {
            return;
        };
        let needle = text.to_lowercase();
        options
            .iter()
            .map(|option| option.text.as_str())
            .filter(|label| !label.is_empty())
            .filter(|label| needle.is_empty() || label.to_lowercase().contains(&needle))
            .take(max_suggestions)
            .map(str::to_string)
            .collect()
    };

    if suggestions.is_empty() {
        return;
    }

    let mut chosen: Option<String> = None;
    egui::popup_below_widget(ui, popup_id, &response, |ui| {
        ui.set_min_width(120.0);
        for suggestion in &suggestions {
            if ui.selectable_label(false, suggestion).clicked() {
                chosen = Some(suggestion.clone());
            }
        }
    });

    if let Some(choice) = chosen {
        if let CellControl::Freeform { text, restore } = control {
            *text = choice.clone();
            *restore = choice;
        }
        ui.memory_mut(|memory| memory.close_popup());
    }
}
