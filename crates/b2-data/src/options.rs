//! Per-column choice lists fetched once at startup
//!
//! The option service is queried a single time when the app starts; the
//! resulting catalog is immutable for the session. A failed fetch leaves the
//! catalog empty, which degrades choice fields to empty dropdowns instead of
//! blocking the editor.

use b2_core::services::{ChoiceOption, OptionListing};

/// Immutable mapping from column name to its ordered choice list.
#[derive(Debug, Clone, Default)]
pub struct OptionCatalog {
    listing: OptionListing,
}

impl OptionCatalog {
    /// Wrap an option-service response.
    pub fn new(listing: OptionListing) -> Self {
        Self { listing }
    }

    /// Catalog with no choices at all (option service unavailable).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Choice list for a column; columns without options get an empty slice.
    pub fn options_for(&self, column: &str) -> &[ChoiceOption] {
        self.listing.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Display label for a machine value. An unmatched value comes back
    /// verbatim; the catalog never substitutes a different option.
    pub fn label_for<'a>(&'a self, column: &str, value: &'a str) -> &'a str {
        self.options_for(column)
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.text.as_str())
            .unwrap_or(value)
    }

    pub fn has_options(&self, column: &str) -> bool {
        !self.options_for(column).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> OptionCatalog {
        let mut listing = OptionListing::new();
        listing.insert(
            "送り状種類".to_string(),
            vec![
                ChoiceOption {
                    value: "0".to_string(),
                    text: "0 : 発払い".to_string(),
                },
                ChoiceOption {
                    value: "A".to_string(),
                    text: "A : ネコポス".to_string(),
                },
            ],
        );
        OptionCatalog::new(listing)
    }

    #[test]
    fn test_options_preserve_order() {
        let catalog = catalog();
        let values: Vec<_> = catalog
            .options_for("送り状種類")
            .iter()
            .map(|option| option.value.as_str())
            .collect();
        assert_eq!(values, ["0", "A"]);
    }

    #[test]
    fn test_unknown_column_has_no_options() {
        let catalog = catalog();
        assert!(catalog.options_for("品名１").is_empty());
        assert!(!catalog.has_options("品名１"));
    }

    #[test]
    fn test_label_falls_back_to_raw_value() {
        let catalog = catalog();
        assert_eq!(catalog.label_for("送り状種類", "A"), "A : ネコポス");
        assert_eq!(catalog.label_for("送り状種類", "9"), "9");
    }
}
