// Reading a worksheet of an Excel export.

use calamine::{open_workbook_auto, DataType, Range, Reader};
use snafu::prelude::*;

use crate::tally::io_common::Table;
use crate::tally::*;

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> BTallyResult<Table> {
    let wrange = get_range(path, worksheet_name)?;
    let mut iter = wrange.rows();
    let headers: Vec<String> = match iter.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => return Err(Box::new(TallyError::NoHeaders { path: path.to_string() })),
    };
    debug!("read_excel_table: headers: {:?}", headers);
    let rows: Vec<Vec<String>> = iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(Table { headers, rows })
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> BTallyResult<Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    // xlsx, xlsm, xls and ods are all recognized from the extension.
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;
    let range_r = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?,
        // Without a name, the first worksheet is used.
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?,
    };
    let wrange = range_r.context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}

/// The text of a cell, as it would appear in a CSV export.
pub fn cell_to_string(c: &DataType) -> String {
    match c {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        other => format!("{:?}", other),
    }
}
