//! Static classification of manifest columns
//!
//! The B2 manifest carries far more columns than the editor exposes. This
//! module is the single authority on which columns are rendered, which are
//! editable, and what kind of control each one gets. Uploaded files routinely
//! gain and lose columns between carrier format revisions, so unknown names
//! classify as hidden instead of failing.

/// Internal row-identity column. Round-tripped on every wire payload,
/// never rendered, never editable.
pub const ROW_ID_FIELD: &str = "__id";

/// The ship-date column targeted by the batch bar.
pub const SHIP_DATE_FIELD: &str = "出荷予定日";

/// Columns rendered in the editor, in display order.
const VISIBLE_FIELDS: [&str; 15] = [
    "お客様管理番号",
    "出荷予定日",
    "送り状種類",
    "お届け先名",
    "品名１",
    "お届け予定日",
    "配達時間帯",
    "お届け先電話番号",
    "お届け先郵便番号",
    "お届け先住所",
    "お届け先アパートマンション名",
    "お届け先会社・部門１",
    "お届け先会社・部門２",
    "荷扱い１",
    "荷扱い２",
];

/// Visible columns that display but never accept input.
const READ_ONLY_FIELDS: [&str; 1] = ["お客様管理番号"];

/// Columns stored as `YYYY/MM/DD` and edited through a date picker.
const DATE_FIELDS: [&str; 2] = ["出荷予定日", "お届け予定日"];

/// Columns whose legal values come from the option service.
const CHOICE_FIELDS: [&str; 2] = ["送り状種類", "配達時間帯"];

/// Handling-flag columns: suggestions from the option service, but any
/// typed text is accepted and stored verbatim.
const FREEFORM_CHOICE_FIELDS: [&str; 2] = ["荷扱い１", "荷扱い２"];

/// What kind of cell a column gets in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Not rendered; passed through unchanged on export
    Hidden,
    /// Rendered as plain text, never edited
    ReadOnly,
    /// Free-text input, stored verbatim
    Text,
    /// Date picker, converted between stored and control form
    Date,
    /// Closed dropdown bound to the option service
    Choice,
    /// Free-text input with a suggestion list that never constrains it
    FreeformChoice,
}

impl FieldClass {
    /// Whether a control for this class accepts user input.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            FieldClass::Text | FieldClass::Date | FieldClass::Choice | FieldClass::FreeformChoice
        )
    }

    /// Whether the column appears in the editor grid at all.
    pub fn is_visible(self) -> bool {
        !matches!(self, FieldClass::Hidden)
    }
}

/// Pure lookup from column name to classification.
pub struct FieldCatalog;

impl FieldCatalog {
    /// Classify a column by name. Unrecognized headers are hidden so that
    /// format drift in uploaded files cannot break the editor.
    pub fn classify(column: &str) -> FieldClass {
        if column == ROW_ID_FIELD {
            return FieldClass::Hidden;
        }
        if READ_ONLY_FIELDS.contains(&column) {
            return FieldClass::ReadOnly;
        }
        if DATE_FIELDS.contains(&column) {
            return FieldClass::Date;
        }
        if CHOICE_FIELDS.contains(&column) {
            return FieldClass::Choice;
        }
        if FREEFORM_CHOICE_FIELDS.contains(&column) {
            return FieldClass::FreeformChoice;
        }
        if VISIBLE_FIELDS.contains(&column) {
            return FieldClass::Text;
        }
        FieldClass::Hidden
    }

    /// Columns the editor renders, in display order.
    pub fn visible_fields() -> &'static [&'static str] {
        &VISIBLE_FIELDS
    }

    /// Visible columns whose controls accept input.
    pub fn editable_fields() -> impl Iterator<Item = &'static str> {
        VISIBLE_FIELDS
            .iter()
            .copied()
            .filter(|column| Self::classify(column).is_editable())
    }
}
