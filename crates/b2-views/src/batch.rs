//! Apply one value to a whole column of controls
//!
//! Batch apply works at the control layer, never on the row store: the value
//! is encoded exactly like a per-cell edit and written into every control
//! bound to the column, so the next merge picks it up together with manual
//! edits. Per-row edits already made to that column are overwritten.

use chrono::NaiveDate;
use egui::Ui;
use egui_extras::DatePickerButton;
use thiserror::Error;

use b2_core::fields::{FieldCatalog, FieldClass, SHIP_DATE_FIELD};

use crate::controls::{parse_control_date, CellControl, ControlRegistry};

/// Why a batch apply was rejected. All variants are user-facing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("Pick a value before applying it to all rows")]
    EmptyValue,

    #[error("{0:?} is not a valid date")]
    InvalidDate(String),

    #[error("{0:?} does not take batch edits")]
    NotEditable(String),
}

/// Write one value into every control bound to `column`, converting it the
/// same way the per-cell control would (dates arrive in `YYYY-MM-DD` control
/// form). Returns how many controls were overwritten.
pub fn apply_to_all(
    registry: &mut ControlRegistry,
    column: &str,
    raw: &str,
) -> Result<usize, BatchError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BatchError::EmptyValue);
    }

    let encoded = match FieldCatalog::classify(column) {
        FieldClass::Date => {
            let date =
                parse_control_date(raw).ok_or_else(|| BatchError::InvalidDate(raw.to_string()))?;
            CellControl::Date(Some(date))
        }
        FieldClass::Text => CellControl::Text(raw.to_string()),
        FieldClass::Choice => CellControl::Choice(raw.to_string()),
        FieldClass::FreeformChoice => CellControl::Freeform {
            text: raw.to_string(),
            restore: raw.to_string(),
        },
        FieldClass::ReadOnly | FieldClass::Hidden => {
            return Err(BatchError::NotEditable(column.to_string()));
        }
    };

    let mut applied = 0;
    for control in registry.column_controls_mut(column) {
        *control = encoded.clone();
        applied += 1;
    }

    tracing::info!("Batch applied {:?} to {} {} controls", raw, applied, column);
    Ok(applied)
}

/// Ship-date batch bar: pick a date, apply it to every row.
pub struct BatchBar {
    date: Option<NaiveDate>,
    feedback: Option<String>,
}

impl BatchBar {
    pub fn new() -> Self {
        Self {
            date: None,
            feedback: None,
        }
    }

    /// Render the bar and run the apply when requested.
    pub fn ui(&mut self, ui: &mut Ui, registry: &mut ControlRegistry) {
        ui.horizontal(|ui| {
            ui.label(format!("{SHIP_DATE_FIELD}:"));

            match &mut self.date {
                Some(date) => {
                    ui.add(DatePickerButton::new(date).id_source("batch-ship-date"));
                    if ui.small_button("✖").on_hover_text("Clear").clicked() {
                        self.date = None;
                    }
                }
                None => {
                    if ui.button("—").on_hover_text("Pick a date").clicked() {
                        self.date = Some(chrono::Local::now().date_naive());
                    }
                }
            }

            if ui.button("Apply to all rows").clicked() {
                let raw = self
                    .date
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                self.feedback = match apply_to_all(registry, SHIP_DATE_FIELD, &raw) {
                    Ok(applied) => Some(format!("Applied to {applied} rows")),
                    Err(error) => Some(error.to_string()),
                };
            }

            if let Some(feedback) = &self.feedback {
                ui.weak(feedback);
            }
        });
    }
}

impl Default for BatchBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use b2_core::fields::ROW_ID_FIELD;
    use b2_core::services::WireRecord;
    use b2_data::RowStore;

    fn record(pairs: &[(&str, &str)]) -> WireRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn store_with_dates() -> RowStore {
        let mut store = RowStore::new();
        store.load(
            vec!["出荷予定日".to_string(), "お届け先名".to_string()],
            vec![
                record(&[
                    (ROW_ID_FIELD, "r-1"),
                    ("出荷予定日", "2024/05/01"),
                    ("お届け先名", "山田太郎"),
                ]),
                record(&[
                    (ROW_ID_FIELD, "r-2"),
                    ("出荷予定日", ""),
                    ("お届け先名", "佐藤花子"),
                ]),
            ],
        );
        store
    }

    #[test]
    fn test_empty_value_is_rejected_without_changes() {
        let store = store_with_dates();
        let mut registry = ControlRegistry::for_store(&store);
        let before = registry.clone();

        assert_eq!(
            apply_to_all(&mut registry, SHIP_DATE_FIELD, "  "),
            Err(BatchError::EmptyValue)
        );
        assert_eq!(
            registry.get("r-1", SHIP_DATE_FIELD),
            before.get("r-1", SHIP_DATE_FIELD)
        );
        assert_eq!(
            registry.get("r-2", SHIP_DATE_FIELD),
            before.get("r-2", SHIP_DATE_FIELD)
        );
    }

    #[test]
    fn test_date_batch_overwrites_every_row() {
        let store = store_with_dates();
        let mut registry = ControlRegistry::for_store(&store);

        // A prior per-row edit gets overwritten like everything else.
        *registry.get_mut("r-2", SHIP_DATE_FIELD).unwrap() =
            CellControl::Date(NaiveDate::from_ymd_opt(2024, 1, 1));

        let applied = apply_to_all(&mut registry, SHIP_DATE_FIELD, "2024-05-02").unwrap();
        assert_eq!(applied, 2);
        for id in ["r-1", "r-2"] {
            assert_eq!(
                registry.get(id, SHIP_DATE_FIELD).unwrap().commit(),
                "2024/05/02"
            );
        }
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let store = store_with_dates();
        let mut registry = ControlRegistry::for_store(&store);
        assert_eq!(
            apply_to_all(&mut registry, SHIP_DATE_FIELD, "05/02/2024"),
            Err(BatchError::InvalidDate("05/02/2024".to_string()))
        );
    }

    #[test]
    fn test_text_batch_is_generic_over_columns() {
        let store = store_with_dates();
        let mut registry = ControlRegistry::for_store(&store);

        let applied = apply_to_all(&mut registry, "お届け先名", "同上").unwrap();
        assert_eq!(applied, 2);
        assert_eq!(registry.get("r-1", "お届け先名").unwrap().commit(), "同上");
    }

    #[test]
    fn test_read_only_column_is_rejected() {
        let store = store_with_dates();
        let mut registry = ControlRegistry::for_store(&store);
        assert_eq!(
            apply_to_all(&mut registry, "お客様管理番号", "X"),
            Err(BatchError::NotEditable("お客様管理番号".to_string()))
        );
    }
}
