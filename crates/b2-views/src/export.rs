//! Save-request assembly
//!
//! The save service writes a CSV from whatever records it receives, keyed by
//! the header list we send. The request therefore has to carry every header
//! from the original upload for every row, rendered or not, with `__id` kept
//! so identity survives a round trip through the backend.

use b2_core::fields::ROW_ID_FIELD;
use b2_core::services::{SaveRequest, WireRecord};
use b2_data::Row;

/// Assemble the save payload from the merged rows.
pub fn build_save_request(headers: &[String], rows: &[Row]) -> SaveRequest {
    let data = rows
        .iter()
        .map(|row| {
            let mut record = WireRecord::with_capacity(headers.len() + 1);
            for header in headers {
                record.insert(header.clone(), row.get(header).to_string());
            }
            record.insert(ROW_ID_FIELD.to_string(), row.id.clone());
            record
        })
        .collect();

    SaveRequest {
        data,
        headers: headers.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use b2_data::RowStore;

    fn loaded_store() -> RowStore {
        let headers = vec![
            "お客様管理番号".to_string(),
            "品名１".to_string(),
            "ご依頼主住所".to_string(),
        ];
        let record: WireRecord = [
            (ROW_ID_FIELD, "r-1"),
            ("お客様管理番号", "A-1"),
            ("品名１", "靴"),
            ("ご依頼主住所", "東京都"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut store = RowStore::new();
        store.load(headers, vec![record]);
        store
    }

    #[test]
    fn test_request_carries_every_header() {
        let store = loaded_store();
        let (headers, rows) = store.snapshot();
        let request = build_save_request(headers, rows);

        assert_eq!(request.headers, headers);
        let record = &request.data[0];
        for header in headers {
            assert!(record.contains_key(header), "missing {header}");
        }
        // Hidden columns ride along untouched.
        assert_eq!(
            record.get("ご依頼主住所").map(String::as_str),
            Some("東京都")
        );
    }

    #[test]
    fn test_request_keeps_row_identity() {
        let store = loaded_store();
        let (headers, rows) = store.snapshot();
        let request = build_save_request(headers, rows);

        assert_eq!(
            request.data[0].get(ROW_ID_FIELD).map(String::as_str),
            Some("r-1")
        );
        // `__id` is not part of the header list the service writes out.
        assert!(!request.headers.contains(&ROW_ID_FIELD.to_string()));
    }

    #[test]
    fn test_absent_cells_export_as_empty() {
        let headers = vec!["品名１".to_string(), "新しい列".to_string()];
        let row = Row::from_record(
            [("品名１".to_string(), "靴".to_string())]
                .into_iter()
                .collect(),
        );

        let request = build_save_request(&headers, &[row]);
        assert_eq!(
            request.data[0].get("新しい列").map(String::as_str),
            Some("")
        );
    }
}
