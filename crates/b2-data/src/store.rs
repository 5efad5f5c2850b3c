//! In-memory manifest store
//!
//! The authoritative dataset between upload and export. Populated wholesale
//! when an upload succeeds, mutated only by replacing it with the next
//! upload; the editor merges its edits into fresh copies of these rows, so
//! the stored snapshot stays valid for passthrough of untouched columns.

use b2_core::services::WireRecord;

use crate::row::Row;

/// Ordered rows plus the canonical full header order from the upload.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl RowStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store contents with a freshly uploaded manifest.
    /// Records without an `__id` get a fresh unique one.
    pub fn load(&mut self, headers: Vec<String>, records: Vec<WireRecord>) {
        self.rows = records.into_iter().map(Row::from_record).collect();
        self.headers = headers;
    }

    /// Full data for export: every original column, including ones that are
    /// never rendered.
    pub fn snapshot(&self) -> (&[String], &[Row]) {
        (&self.headers, &self.rows)
    }

    /// Canonical header order from the upload.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_by_id(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use b2_core::fields::ROW_ID_FIELD;

    fn record(pairs: &[(&str, &str)]) -> WireRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_load_preserves_server_ids() {
        let mut store = RowStore::new();
        store.load(
            headers(&["品名１"]),
            vec![
                record(&[("品名１", "靴"), (ROW_ID_FIELD, "r-1")]),
                record(&[("品名１", "傘"), (ROW_ID_FIELD, "r-2")]),
            ],
        );

        assert_eq!(store.len(), 2);
        assert!(store.row_by_id("r-1").is_some());
        assert!(store.row_by_id("r-2").is_some());
    }

    #[test]
    fn test_load_assigns_unique_ids_when_absent() {
        let mut store = RowStore::new();
        store.load(
            headers(&["品名１"]),
            vec![record(&[("品名１", "靴")]), record(&[("品名１", "傘")])],
        );

        let ids: Vec<_> = store.rows().iter().map(|row| row.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| !id.is_empty()));
    }

    #[test]
    fn test_load_replaces_prior_content() {
        let mut store = RowStore::new();
        store.load(
            headers(&["品名１"]),
            vec![record(&[("品名１", "靴"), (ROW_ID_FIELD, "old")])],
        );
        store.load(
            headers(&["お届け先名"]),
            vec![record(&[("お届け先名", "山田"), (ROW_ID_FIELD, "new")])],
        );

        assert_eq!(store.len(), 1);
        assert!(store.row_by_id("old").is_none());
        assert!(store.row_by_id("new").is_some());
        assert_eq!(store.headers(), headers(&["お届け先名"]).as_slice());
    }

    #[test]
    fn test_snapshot_includes_hidden_columns() {
        let mut store = RowStore::new();
        store.load(
            headers(&["品名１", "ご依頼主住所"]),
            vec![record(&[
                ("品名１", "靴"),
                ("ご依頼主住所", "東京都"),
                (ROW_ID_FIELD, "r-1"),
            ])],
        );

        let (snapshot_headers, rows) = store.snapshot();
        assert!(snapshot_headers.contains(&"ご依頼主住所".to_string()));
        assert_eq!(rows[0].get("ご依頼主住所"), "東京都");
    }
}
