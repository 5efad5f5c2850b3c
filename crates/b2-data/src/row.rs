//! Row records carrying the full original column set
//!
//! A row keeps every column the upload returned, rendered or not, so that
//! export can reproduce the original shape byte-for-byte for anything the
//! user did not touch. Identity lives outside the cell map: `__id` is lifted
//! out on the way in and restored on the way out.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use b2_core::fields::ROW_ID_FIELD;
use b2_core::services::WireRecord;

/// Stable identifier for a row, assigned once at load time and never
/// regenerated. Opaque: usually a server-issued UUID string.
pub type RowId = String;

/// One shipment record: a stable id plus every original column's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Stable identity for the lifetime of the session
    pub id: RowId,

    /// Cell values keyed by column name, in original header order.
    /// Holds the full uploaded column set, including hidden columns.
    pub cells: IndexMap<String, String>,
}

impl Row {
    /// Build a row from a wire record, lifting `__id` out of the cells.
    /// Records that arrive without an id get a freshly generated one.
    pub fn from_record(mut record: WireRecord) -> Self {
        let id = record
            .shift_remove(ROW_ID_FIELD)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self { id, cells: record }
    }

    /// Rebuild the wire shape with `__id` restored for round-tripping.
    pub fn to_record(&self) -> WireRecord {
        let mut record = self.cells.clone();
        record.insert(ROW_ID_FIELD.to_string(), self.id.clone());
        record
    }

    /// Cell value for a column; absent columns read as empty.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    /// Overwrite one cell value.
    pub fn set(&mut self, column: &str, value: String) {
        if let Some(cell) = self.cells.get_mut(column) {
            *cell = value;
        } else {
            self.cells.insert(column.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> WireRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_record_lifts_id_out_of_cells() {
        let row = Row::from_record(record(&[
            ("お客様管理番号", "A-1"),
            (ROW_ID_FIELD, "abc-123"),
        ]));

        assert_eq!(row.id, "abc-123");
        assert!(!row.cells.contains_key(ROW_ID_FIELD));
        assert_eq!(row.get("お客様管理番号"), "A-1");
    }

    #[test]
    fn test_from_record_generates_id_when_missing() {
        let a = Row::from_record(record(&[("品名１", "靴")]));
        let b = Row::from_record(record(&[("品名１", "靴")]));

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_to_record_restores_id() {
        let row = Row::from_record(record(&[("品名１", "靴"), (ROW_ID_FIELD, "r-9")]));
        let wire = row.to_record();

        assert_eq!(wire.get(ROW_ID_FIELD).map(String::as_str), Some("r-9"));
        assert_eq!(wire.get("品名１").map(String::as_str), Some("靴"));
    }

    #[test]
    fn test_missing_column_reads_empty() {
        let row = Row::from_record(record(&[]));
        assert_eq!(row.get("配達時間帯"), "");
    }
}
