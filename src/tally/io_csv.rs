// Primitives for reading CSV files.

use std::fs;

use encoding_rs::{UTF_8, WINDOWS_1252};
use snafu::prelude::*;

use crate::tally::io_common::Table;
use crate::tally::*;

/// The text encodings tried when reading a CSV file.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TextEncoding {
    /// UTF-8 with an optional byte order mark.
    Utf8Sig,
    Utf8,
    Cp1252,
    Latin1,
}

pub const DEFAULT_ENCODINGS: [TextEncoding; 4] = [
    TextEncoding::Utf8Sig,
    TextEncoding::Utf8,
    TextEncoding::Cp1252,
    TextEncoding::Latin1,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// Bytes that have no character assigned in Windows-1252.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

impl TextEncoding {
    pub fn from_name(name: &str) -> TallyResult<TextEncoding> {
        match name.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8-sig" | "utf8-sig" => Ok(TextEncoding::Utf8Sig),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "cp1252" | "windows-1252" => Ok(TextEncoding::Cp1252),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            _ => UnknownEncodingSnafu { name }.fail(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Cp1252 => "cp1252",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Decodes the bytes, or None if they are not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8Sig => {
                let stripped = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                TextEncoding::Utf8.decode(stripped)
            }
            TextEncoding::Utf8 => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|s| s.into_owned()),
            TextEncoding::Cp1252 => {
                if bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
                    return None;
                }
                WINDOWS_1252
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|s| s.into_owned())
            }
            // Every byte is the code point of the same value.
            TextEncoding::Latin1 => Some(bytes.iter().map(|b| *b as char).collect()),
        }
    }
}

/// Decodes with the first encoding that accepts the bytes.
pub fn decode_with_fallback(
    bytes: &[u8],
    encodings: &[TextEncoding],
) -> Option<(TextEncoding, String)> {
    encodings.iter().find_map(|enc| {
        let res = enc.decode(bytes);
        if res.is_none() {
            debug!("decode_with_fallback: not valid {}", enc.name());
        }
        res.map(|s| (*enc, s))
    })
}

pub fn read_csv_table(path: &str, encodings: &[TextEncoding]) -> BTallyResult<Table> {
    let bytes = fs::read(path).context(OpeningFileSnafu { path })?;
    let (encoding, text) = match decode_with_fallback(&bytes, encodings) {
        Some(x) => x,
        None => {
            let names: Vec<&str> = encodings.iter().map(|e| e.name()).collect();
            return Err(Box::new(TallyError::Decoding {
                path: path.to_string(),
                encodings: names.join(", "),
            }));
        }
    };
    info!("read_csv_table: {:?} decoded as {}", path, encoding.name());
    parse_csv(path, &text)
}

fn parse_csv(path: &str, text: &str) -> BTallyResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvParseSnafu { path })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, record_r) in rdr.records().enumerate() {
        let record = record_r.context(CsvParseSnafu { path })?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        debug!("parse_csv: row {}: {:?}", idx + 1, row);
        rows.push(row);
    }
    Ok(Table { headers, rows })
}
