//! Control layer backing the editable grid
//!
//! Every editable cell is backed by a `CellControl` held in a registry keyed
//! by row id and column name, built when a session is loaded. The registry is
//! the single source of truth for live edits: cell widgets mutate it, the
//! batch bar writes through it, and the merge step reads it back out. Values
//! are converted between the stored manifest form and the control form on the
//! way in and out, per column class.

use chrono::NaiveDate;
use indexmap::IndexMap;

use b2_core::fields::{FieldCatalog, FieldClass};
use b2_data::{Row, RowId, RowStore};

/// Stored manifest date format.
const STORED_DATE_FORMAT: &str = "%Y/%m/%d";

/// Control-side date format, as produced by date inputs.
const CONTROL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Live edit state for one editable cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellControl {
    /// Date picker state; `None` renders as an empty control
    Date(Option<NaiveDate>),

    /// Closed dropdown; holds the stored machine value verbatim, matched or not
    Choice(String),

    /// Free text with suggestions. `restore` backs the clear-on-focus rule:
    /// focusing stashes the text here and clears the input, and a blur that
    /// leaves the input empty puts the stash back.
    Freeform { text: String, restore: String },

    /// Plain text input
    Text(String),
}

impl CellControl {
    /// Seed a control from a stored cell value. Classes that never get a
    /// control return `None`.
    pub fn seed(class: FieldClass, stored: &str) -> Option<Self> {
        match class {
            FieldClass::Date => Some(Self::Date(parse_stored_date(stored))),
            FieldClass::Choice => Some(Self::Choice(stored.to_string())),
            FieldClass::FreeformChoice => Some(Self::Freeform {
                text: stored.to_string(),
                restore: stored.to_string(),
            }),
            FieldClass::Text => Some(Self::Text(stored.to_string())),
            FieldClass::ReadOnly | FieldClass::Hidden => None,
        }
    }

    /// Convert the control state back to the stored manifest form.
    pub fn commit(&self) -> String {
        match self {
            Self::Date(None) => String::new(),
            Self::Date(Some(date)) => date.format(STORED_DATE_FORMAT).to_string(),
            Self::Choice(value) => value.clone(),
            Self::Freeform { text, .. } => text.clone(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Focus entered a freeform control: stash the current text and clear it
    /// so the suggestion list is immediately usable without deleting first.
    pub fn on_focus(&mut self) {
        if let Self::Freeform { text, restore } = self {
            *restore = std::mem::take(text);
        }
    }

    /// Focus left a freeform control. A control still empty gets its previous
    /// value back, so focus-then-blur is a no-op; typed text stays committed
    /// and becomes the next restore point.
    pub fn on_blur(&mut self) {
        if let Self::Freeform { text, restore } = self {
            if text.is_empty() {
                *text = restore.clone();
            } else {
                *restore = text.clone();
            }
        }
    }
}

/// Parse a stored `YYYY/MM/DD` value. Empty or unparseable text seeds an
/// empty control, the way a date input treats an invalid initial value.
fn parse_stored_date(stored: &str) -> Option<NaiveDate> {
    if stored.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(stored, STORED_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::debug!("Unparseable stored date {:?}, seeding empty control", stored);
            None
        }
    }
}

/// Parse a control-side `YYYY-MM-DD` value (batch input form).
pub(crate) fn parse_control_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, CONTROL_DATE_FORMAT).ok()
}

/// Registry of live cell controls keyed by `(row id, column)`.
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    controls: IndexMap<(RowId, String), CellControl>,
}

impl ControlRegistry {
    /// Build the registry for a freshly loaded store: one control per row per
    /// visible editable column.
    pub fn for_store(store: &RowStore) -> Self {
        let mut registry = Self::default();
        for row in store.rows() {
            for &column in FieldCatalog::visible_fields() {
                let class = FieldCatalog::classify(column);
                if let Some(control) = CellControl::seed(class, row.get(column)) {
                    registry.insert(&row.id, column, control);
                }
            }
        }
        registry
    }

    pub fn insert(&mut self, row_id: &str, column: &str, control: CellControl) {
        self.controls
            .insert((row_id.to_string(), column.to_string()), control);
    }

    pub fn get(&self, row_id: &str, column: &str) -> Option<&CellControl> {
        self.controls.get(&(row_id.to_string(), column.to_string()))
    }

    pub fn get_mut(&mut self, row_id: &str, column: &str) -> Option<&mut CellControl> {
        self.controls
            .get_mut(&(row_id.to_string(), column.to_string()))
    }

    /// All controls bound to one column, across every row.
    pub fn column_controls_mut<'a>(
        &'a mut self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a mut CellControl> + 'a {
        self.controls
            .iter_mut()
            .filter(move |((_, bound), _)| bound == column)
            .map(|(_, control)| control)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(RowId, String), &CellControl)> {
        self.controls.iter()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

/// Result of a merge pass.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Rows in store order with live edits applied
    pub rows: Vec<Row>,
    /// Row ids whose controls had no backing stored row
    pub orphaned: Vec<RowId>,
}

/// Merge live control values into fresh copies of the stored rows.
///
/// Every registered control is committed into a clone of its row; columns
/// without a control (read-only, hidden) pass through from the stored
/// snapshot untouched. Controls bound to a row the store no longer knows
/// about indicate a desynchronization upstream; they are skipped and
/// reported, and the rest of the merge proceeds.
pub fn materialize(store: &RowStore, registry: &ControlRegistry) -> MergeOutcome {
    let mut edits: IndexMap<&str, Vec<(&str, String)>> = IndexMap::new();
    for ((row_id, column), control) in registry.iter() {
        edits
            .entry(row_id.as_str())
            .or_default()
            .push((column.as_str(), control.commit()));
    }

    let mut rows = Vec::with_capacity(store.len());
    for row in store.rows() {
        let mut merged = row.clone();
        if let Some(cells) = edits.shift_remove(row.id.as_str()) {
            for (column, value) in cells {
                merged.set(column, value);
            }
        }
        rows.push(merged);
    }

    let orphaned: Vec<RowId> = edits.keys().map(|id| id.to_string()).collect();
    for id in &orphaned {
        tracing::warn!(row_id = %id, "Control row has no matching stored row, skipping");
    }

    MergeOutcome { rows, orphaned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use b2_core::fields::ROW_ID_FIELD;
    use b2_core::services::WireRecord;

    fn record(pairs: &[(&str, &str)]) -> WireRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_store() -> RowStore {
        let headers = [
            "お客様管理番号",
            "出荷予定日",
            "送り状種類",
            "お届け先名",
            "品名１",
            "荷扱い１",
            "ご依頼主住所",
        ];
        let mut store = RowStore::new();
        store.load(
            headers.iter().map(|h| h.to_string()).collect(),
            vec![
                record(&[
                    (ROW_ID_FIELD, "r-1"),
                    ("お客様管理番号", "A-1"),
                    ("出荷予定日", "2024/05/01"),
                    ("送り状種類", "0"),
                    ("お届け先名", "山田太郎"),
                    ("品名１", "靴"),
                    ("荷扱い１", "ワレ物注意"),
                    ("ご依頼主住所", "東京都"),
                ]),
                record(&[
                    (ROW_ID_FIELD, "r-2"),
                    ("お客様管理番号", "A-2"),
                    ("出荷予定日", ""),
                    ("送り状種類", "9"),
                    ("お届け先名", "佐藤花子"),
                    ("品名１", "傘"),
                    ("荷扱い１", ""),
                    ("ご依頼主住所", "大阪府"),
                ]),
            ],
        );
        store
    }

    #[test]
    fn test_date_round_trip() {
        let control = CellControl::seed(FieldClass::Date, "2024/05/01").unwrap();
        assert_eq!(
            control,
            CellControl::Date(NaiveDate::from_ymd_opt(2024, 5, 1))
        );
        assert_eq!(control.commit(), "2024/05/01");
    }

    #[test]
    fn test_empty_date_stays_empty() {
        let control = CellControl::seed(FieldClass::Date, "").unwrap();
        assert_eq!(control, CellControl::Date(None));
        assert_eq!(control.commit(), "");
    }

    #[test]
    fn test_garbage_date_seeds_empty_control() {
        let control = CellControl::seed(FieldClass::Date, "not a date").unwrap();
        assert_eq!(control, CellControl::Date(None));
    }

    #[test]
    fn test_unmatched_choice_value_survives() {
        // "9" matches no option; the control must keep it rather than pick
        // some option's value.
        let control = CellControl::seed(FieldClass::Choice, "9").unwrap();
        assert_eq!(control.commit(), "9");
    }

    #[test]
    fn test_read_only_and_hidden_get_no_control() {
        assert!(CellControl::seed(FieldClass::ReadOnly, "A-1").is_none());
        assert!(CellControl::seed(FieldClass::Hidden, "東京都").is_none());
    }

    #[test]
    fn test_freeform_focus_then_blur_is_a_noop() {
        let mut control = CellControl::seed(FieldClass::FreeformChoice, "A").unwrap();
        control.on_focus();
        assert_eq!(control.commit(), "");
        control.on_blur();
        assert_eq!(control.commit(), "A");
    }

    #[test]
    fn test_freeform_typed_text_wins_over_restore() {
        let mut control = CellControl::seed(FieldClass::FreeformChoice, "A").unwrap();
        control.on_focus();
        if let CellControl::Freeform { text, .. } = &mut control {
            *text = "B".to_string();
        }
        control.on_blur();
        assert_eq!(control.commit(), "B");

        // The committed text is the new restore point.
        control.on_focus();
        control.on_blur();
        assert_eq!(control.commit(), "B");
    }

    #[test]
    fn test_registry_covers_editable_cells_only() {
        let store = sample_store();
        let registry = ControlRegistry::for_store(&store);

        assert!(registry.get("r-1", "出荷予定日").is_some());
        assert!(registry.get("r-1", "荷扱い１").is_some());
        // Read-only, hidden, and absent columns have no control.
        assert!(registry.get("r-1", "お客様管理番号").is_none());
        assert!(registry.get("r-1", "ご依頼主住所").is_none());
        assert!(registry.get("r-1", "お届け先電話番号").is_none());
    }

    #[test]
    fn test_materialize_merges_edits_by_row_id() {
        let store = sample_store();
        let mut registry = ControlRegistry::for_store(&store);

        *registry.get_mut("r-2", "お届け先名").unwrap() =
            CellControl::Text("田中一郎".to_string());
        *registry.get_mut("r-1", "出荷予定日").unwrap() =
            CellControl::Date(NaiveDate::from_ymd_opt(2024, 6, 2));

        let outcome = materialize(&store, &registry);
        assert!(outcome.orphaned.is_empty());
        assert_eq!(outcome.rows[0].get("出荷予定日"), "2024/06/02");
        assert_eq!(outcome.rows[0].get("お届け先名"), "山田太郎");
        assert_eq!(outcome.rows[1].get("お届け先名"), "田中一郎");
    }

    #[test]
    fn test_materialize_passes_untouched_columns_through() {
        let store = sample_store();
        let mut registry = ControlRegistry::for_store(&store);
        *registry.get_mut("r-1", "品名１").unwrap() = CellControl::Text("長靴".to_string());

        let outcome = materialize(&store, &registry);
        for (merged, original) in outcome.rows.iter().zip(store.rows()) {
            assert_eq!(merged.id, original.id);
            assert_eq!(merged.get("お客様管理番号"), original.get("お客様管理番号"));
            assert_eq!(merged.get("ご依頼主住所"), original.get("ご依頼主住所"));
        }
    }

    #[test]
    fn test_materialize_is_idempotent_without_edits() {
        let store = sample_store();
        let registry = ControlRegistry::for_store(&store);
        let first = materialize(&store, &registry);

        // Re-load the merged rows and merge again with no intervening edits.
        let mut reloaded = RowStore::new();
        reloaded.load(
            store.headers().to_vec(),
            first.rows.iter().map(Row::to_record).collect(),
        );
        let second = materialize(&reloaded, &ControlRegistry::for_store(&reloaded));

        assert_eq!(first.rows, second.rows);
    }

    #[test]
    fn test_materialize_skips_and_reports_orphaned_controls() {
        let store = sample_store();
        let mut registry = ControlRegistry::for_store(&store);
        registry.insert(
            "r-gone",
            "お届け先名",
            CellControl::Text("迷子".to_string()),
        );

        let outcome = materialize(&store, &registry);
        assert_eq!(outcome.orphaned, vec!["r-gone".to_string()]);
        // The remaining rows still merged.
        assert_eq!(outcome.rows.len(), store.len());
    }

    #[test]
    fn test_row_ids_stable_through_merge() {
        let store = sample_store();
        let registry = ControlRegistry::for_store(&store);
        let outcome = materialize(&store, &registry);
        let ids: Vec<_> = outcome.rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["r-1", "r-2"]);
    }
}
