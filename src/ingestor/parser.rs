//! Register and catalog worksheet parsing
//!
//! Columns in the register sheet are located by header name rather than by
//! position, so editors can reorder or insert columns without breaking the
//! import. Header matching ignores case, surrounding whitespace and the
//! difference between `_` and a space.
//!
//! A header that cannot be found is not an error: every flag read from it is
//! `false` and every name is absent. [`ColumnLayout::missing`] reports which
//! headers were not found so the caller can warn about it.

use std::collections::{HashMap, HashSet};

use crate::config::RegisterColumns;
use crate::gtin::normalize_padded;
use crate::models::RegisterEntry;

/// One worksheet as returned by a fetcher, header row first
pub type Rows = Vec<Vec<String>>;

/// Resolved header indexes for the register sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnLayout {
    pub uploaded_to_catalog: Option<usize>,
    pub uploaded_to_register: Option<usize>,
    pub name: Option<usize>,
}

impl ColumnLayout {
    pub fn resolve(headers: &[String], columns: &RegisterColumns) -> Self {
        Self {
            uploaded_to_catalog: find_column(headers, &columns.uploaded_to_catalog),
            uploaded_to_register: find_column(headers, &columns.uploaded_to_register),
            name: find_column(headers, &columns.name),
        }
    }

    /// Header names that were configured but not present in the sheet
    pub fn missing<'a>(&self, columns: &'a RegisterColumns) -> Vec<&'a str> {
        [
            (self.uploaded_to_catalog, columns.uploaded_to_catalog.as_str()),
            (self.uploaded_to_register, columns.uploaded_to_register.as_str()),
            (self.name, columns.name.as_str()),
        ]
        .into_iter()
        .filter_map(|(idx, name)| idx.is_none().then_some(name))
        .collect()
    }
}

/// Everything a refresh cycle extracts from the two worksheets
#[derive(Debug, Clone, Default)]
pub struct ParsedDataset {
    pub register: HashMap<String, RegisterEntry>,
    pub catalog: HashSet<String>,
    pub all_gtins: HashSet<String>,
    pub layout: ColumnLayout,
}

pub fn parse(
    register_rows: &[Vec<String>],
    catalog_rows: &[Vec<String>],
    columns: &RegisterColumns,
) -> ParsedDataset {
    let (register, layout) = parse_register(register_rows, columns);
    let catalog = parse_catalog(catalog_rows);
    // Both sets come from the catalog sheet today; they stay separate fields
    // so a second source can feed `all_gtins` later.
    let all_gtins = catalog.clone();

    ParsedDataset {
        register,
        catalog,
        all_gtins,
        layout,
    }
}

pub fn parse_register(
    rows: &[Vec<String>],
    columns: &RegisterColumns,
) -> (HashMap<String, RegisterEntry>, ColumnLayout) {
    let Some((headers, data)) = rows.split_first() else {
        return (HashMap::new(), ColumnLayout::default());
    };

    let layout = ColumnLayout::resolve(headers, columns);
    let mut register = HashMap::with_capacity(data.len());

    for row in data.iter().filter(|row| is_admitted(row)) {
        let entry = RegisterEntry {
            uploaded_to_catalog: cell_bool(row, layout.uploaded_to_catalog),
            uploaded_to_register: cell_bool(row, layout.uploaded_to_register),
            name: cell_str(row, layout.name),
        };
        // Later rows overwrite earlier ones with the same GTIN
        register.insert(normalize_padded(&row[0]), entry);
    }

    (register, layout)
}

pub fn parse_catalog(rows: &[Vec<String>]) -> HashSet<String> {
    rows.iter()
        .skip(1)
        .filter(|row| is_admitted(row))
        .map(|row| normalize_padded(&row[0]))
        .collect()
}

/// Canonical form used to compare header names
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace('_', " ")
}

pub fn find_column(headers: &[String], wanted: &str) -> Option<usize> {
    let wanted = normalize_header(wanted);
    headers
        .iter()
        .position(|header| normalize_header(header) == wanted)
}

pub fn cell_bool(row: &[String], idx: Option<usize>) -> bool {
    idx.and_then(|i| row.get(i))
        .is_some_and(|cell| cell.trim().to_uppercase() == "TRUE")
}

pub fn cell_str(row: &[String], idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
}

/// Rows without a GTIN in the first cell are ignored
fn is_admitted(row: &[String]) -> bool {
    row.first().is_some_and(|gtin| !gtin.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Rows {
        raw.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn register_sheet() -> Rows {
        rows(&[
            &["GTIN", "Uppladdad_i_Catalog", "Uppladdad_i_Register", "Golden_Standard_Name"],
            &["07300400192434", "TRUE", "FALSE", "Milk 1L"],
        ])
    }

    #[test]
    fn test_find_column_ignores_case_space_and_underscore() {
        let headers: Vec<String> = ["GTIN", " uppladdad i catalog ", "UPPLADDAD_I_REGISTER"]
            .iter()
            .map(|h| h.to_string())
            .collect();

        assert_eq!(find_column(&headers, "Uppladdad_i_Catalog"), Some(1));
        assert_eq!(find_column(&headers, "uppladdad i register"), Some(2));
        assert_eq!(find_column(&headers, "Golden_Standard_Name"), None);
    }

    #[test]
    fn test_cell_bool() {
        let row: Vec<String> = ["x", " true ", "FALSE", "yes", ""]
            .iter()
            .map(|c| c.to_string())
            .collect();

        assert!(cell_bool(&row, Some(1)));
        assert!(!cell_bool(&row, Some(2)));
        assert!(!cell_bool(&row, Some(3)));
        assert!(!cell_bool(&row, Some(4)));
        assert!(!cell_bool(&row, Some(99)));
        assert!(!cell_bool(&row, None));
    }

    #[test]
    fn test_cell_str() {
        let row: Vec<String> = ["x", "  Milk 1L ", "   "].iter().map(|c| c.to_string()).collect();

        assert_eq!(cell_str(&row, Some(1)), Some("Milk 1L".to_string()));
        assert_eq!(cell_str(&row, Some(2)), None);
        assert_eq!(cell_str(&row, Some(7)), None);
        assert_eq!(cell_str(&row, None), None);
    }

    #[test]
    fn test_parse_register_example_row() {
        let (register, layout) = parse_register(&register_sheet(), &RegisterColumns::default());

        assert_eq!(
            layout,
            ColumnLayout {
                uploaded_to_catalog: Some(1),
                uploaded_to_register: Some(2),
                name: Some(3),
            }
        );
        assert_eq!(
            register.get("07300400192434"),
            Some(&RegisterEntry {
                uploaded_to_catalog: true,
                uploaded_to_register: false,
                name: Some("Milk 1L".to_string()),
            })
        );
    }

    #[test]
    fn test_blank_gtin_rows_are_skipped() {
        let register = rows(&[
            &["GTIN", "Uppladdad_i_Catalog"],
            &[],
            &["   ", "TRUE"],
            &["", "TRUE"],
            &["123", "TRUE"],
        ]);
        let catalog = rows(&[&["GTIN"], &[" "], &[], &["456"]]);

        let dataset = parse(&register, &catalog, &RegisterColumns::default());

        assert_eq!(dataset.register.len(), 1);
        assert!(dataset.register.contains_key("00000000000123"));
        assert_eq!(dataset.catalog.len(), 1);
        assert!(dataset.catalog.contains("00000000000456"));
        assert_eq!(dataset.catalog, dataset.all_gtins);
    }

    #[test]
    fn test_missing_columns_default_to_false_and_absent() {
        let register = rows(&[&["GTIN", "Something else"], &["07300400192434", "TRUE"]]);
        let columns = RegisterColumns::default();

        let (entries, layout) = parse_register(&register, &columns);

        assert_eq!(
            entries.get("07300400192434"),
            Some(&RegisterEntry::default())
        );
        assert_eq!(
            layout.missing(&columns),
            vec!["Uppladdad_i_Catalog", "Uppladdad_i_Register", "Golden_Standard_Name"]
        );
    }

    #[test]
    fn test_short_rows_read_as_absent() {
        let register = rows(&[
            &["GTIN", "Uppladdad_i_Catalog", "Uppladdad_i_Register", "Golden_Standard_Name"],
            &["07300400192434", "TRUE"],
        ]);

        let (entries, _) = parse_register(&register, &RegisterColumns::default());
        let entry = &entries["07300400192434"];

        assert!(entry.uploaded_to_catalog);
        assert!(!entry.uploaded_to_register);
        assert_eq!(entry.name, None);
    }

    #[test]
    fn test_last_duplicate_row_wins() {
        let register = rows(&[
            &["GTIN", "Golden_Standard_Name"],
            &["7300400192434", "First"],
            &["07300400192434", "Second"],
        ]);

        let (entries, _) = parse_register(&register, &RegisterColumns::default());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries["07300400192434"].name.as_deref(), Some("Second"));
    }

    #[test]
    fn test_empty_sheets_parse_to_empty_dataset() {
        let dataset = parse(&[], &[], &RegisterColumns::default());

        assert!(dataset.register.is_empty());
        assert!(dataset.catalog.is_empty());
        assert!(dataset.all_gtins.is_empty());
        assert_eq!(dataset.layout, ColumnLayout::default());
    }

    #[test]
    fn test_custom_column_names() {
        let register = rows(&[
            &["EAN", "in_catalog", "in_register", "title"],
            &["1", "TRUE", "TRUE", "Bread"],
        ]);
        let columns = RegisterColumns {
            uploaded_to_catalog: "In Catalog".to_string(),
            uploaded_to_register: "In Register".to_string(),
            name: "Title".to_string(),
        };

        let (entries, layout) = parse_register(&register, &columns);

        assert!(layout.missing(&columns).is_empty());
        let entry = &entries["00000000000001"];
        assert!(entry.uploaded_to_catalog && entry.uploaded_to_register);
        assert_eq!(entry.name.as_deref(), Some("Bread"));
    }
}
