use std::path::Path;

use crate::tally::*;

/// The cells of a file, as text. The rows may be shorter or longer than the header.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// The values of one column. Rows that are too short give an empty value.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| cell(row, idx).unwrap_or(""))
    }

    /// The first column with exactly this name. Later columns with the same name are
    /// never selected by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// The first column whose name contains the given text, ignoring case.
    pub fn find_column_containing(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_lowercase();
        self.headers
            .iter()
            .position(|h| h.to_lowercase().contains(&needle))
    }
}

pub fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|s| s.as_str())
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Excel,
}

impl InputType {
    /// The explicit input type, or else the one suggested by the file extension.
    /// Anything that is not a spreadsheet is read as CSV.
    pub fn from_options(input_type: Option<&str>, path: &str) -> TallyResult<InputType> {
        match input_type {
            Some("csv") => Ok(InputType::Csv),
            Some("excel") => Ok(InputType::Excel),
            Some(name) => UnknownInputTypeSnafu { name }.fail(),
            None => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase());
                match ext.as_deref() {
                    Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods") => {
                        Ok(InputType::Excel)
                    }
                    _ => Ok(InputType::Csv),
                }
            }
        }
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            headers: vec!["Name".into(), "Order Products".into(), "Name".into()],
            rows: vec![
                vec!["a".into(), "x".into(), "c".into()],
                vec!["b".into()],
            ],
        }
    }

    #[test]
    fn short_rows_give_empty_values() {
        let t = table();
        let vals: Vec<&str> = t.column_values(1).collect();
        assert_eq!(vals, vec!["x", ""]);
        assert_eq!(cell(&t.rows[1], 2), None);
    }

    #[test]
    fn column_lookup() {
        let t = table();
        assert_eq!(t.column_index("Name"), Some(0));
        assert_eq!(t.column_index("name"), None);
        assert_eq!(t.find_column_containing("products"), Some(1));
        assert_eq!(t.find_column_containing("email"), None);
    }

    #[test]
    fn input_types() {
        assert_eq!(
            InputType::from_options(None, "data/form.XLSX").unwrap(),
            InputType::Excel
        );
        assert_eq!(
            InputType::from_options(None, "form.csv").unwrap(),
            InputType::Csv
        );
        assert_eq!(
            InputType::from_options(Some("csv"), "form.xlsx").unwrap(),
            InputType::Csv
        );
        assert_eq!(
            InputType::from_options(None, "legacy.xls").unwrap(),
            InputType::Excel
        );
        assert!(matches!(
            InputType::from_options(Some("ods"), "form.ods"),
            Err(TallyError::UnknownInputType { .. })
        ));
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/x/form.csv"), "form.csv");
        assert_eq!(simplify_file_name("form.csv"), "form.csv");
    }
}
