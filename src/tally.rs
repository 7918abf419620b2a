use log::{debug, info, warn};

use column_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{BufRead, Write};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::tally::config_reader::*;
use crate::tally::io_common::*;
use crate::tally::prompt::Prompter;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;
pub mod prompt;
pub mod report;

#[derive(Debug, Snafu)]
pub enum TallyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not decode {path} with any of: {encodings}"))]
    Decoding { path: String, encodings: String },
    #[snafu(display("CSV parsing failed for {path}"))]
    CsvParse { source: csv::Error, path: String },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot find worksheet {name:?} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("The file {path} seems valid but has no headers"))]
    NoHeaders { path: String },
    #[snafu(display("The input was closed before a choice was made"))]
    PromptClosed {},
    #[snafu(display("Error reading from or writing to the terminal"))]
    Terminal { source: std::io::Error },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unknown encoding {name:?}"))]
    UnknownEncoding { name: String },
    #[snafu(display("Unknown input type {name:?}"))]
    UnknownInputType { name: String },
    #[snafu(display("The analysis could not complete"))]
    Analysis { source: TallyErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, TallyError>;
pub type BTallyResult<T> = Result<T, Box<TallyError>>;

/// Where to read the data from. Anything missing is asked interactively.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct InputSource {
    pub file: Option<String>,
    pub column: Option<String>,
    pub input_type: Option<String>,
    pub excel_worksheet_name: Option<String>,
}

/// What to do with the JSON summary of an analysis.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OutputTarget {
    /// A file path, or `stdout`.
    pub out: Option<String>,
    /// A summary to compare against.
    pub reference: Option<String>,
}

/// Reads the table, asking for the file if needed. Returns None if there is no file to
/// choose from.
fn load_table<R: BufRead, W: Write>(
    source: &InputSource,
    config: &TallyConfig,
    prompter: &mut Prompter<R, W>,
) -> BTallyResult<Option<(String, Table)>> {
    let path = match &source.file {
        Some(p) => p.clone(),
        None => {
            let candidates = prompt::list_input_files(".");
            match prompter.select_file(&candidates)? {
                Some(p) => p,
                None => return Ok(None),
            }
        }
    };
    prompter.say(&format!("\nAnalyzing {}...", path))?;

    let input_type = InputType::from_options(source.input_type.as_deref(), &path)?;
    info!("Attempting to read {:?} file {:?}", input_type, path);
    let table = match input_type {
        InputType::Csv => io_csv::read_csv_table(&path, &config.encodings()?)?,
        InputType::Excel => {
            io_excel::read_excel_table(&path, source.excel_worksheet_name.as_deref())?
        }
    };
    debug!(
        "load_table: headers: {:?} rows: {}",
        table.headers,
        table.rows.len()
    );
    if table.headers.is_empty() {
        return Err(Box::new(TallyError::NoHeaders { path }));
    }
    Ok(Some((path, table)))
}

fn compare_summaries(reference: &str, computed: &str) -> TallyResult<()> {
    if reference != computed {
        warn!("Found differences with the reference summary");
        print_diff(reference, computed, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

/// Writes the summary where requested and checks it against the reference, if any.
fn finish_summary<R: BufRead, W: Write>(
    summary_js: &JSValue,
    output: &OutputTarget,
    prompter: &mut Prompter<R, W>,
) -> BTallyResult<()> {
    let pretty_js = serde_json::to_string_pretty(summary_js).context(ParsingJsonSnafu {})?;
    match output.out.as_deref() {
        Some("stdout") => prompter.say(&pretty_js)?,
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, &pretty_js).context(WritingSummarySnafu { path })?;
        }
        None => {}
    }

    if let Some(reference_p) = &output.reference {
        let summary_ref = read_summary(reference_p)?;
        let pretty_js_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        compare_summaries(&pretty_js_ref, &pretty_js)?;
    }
    Ok(())
}

fn summary_config(analysis: &str, path: &str, columns: JSValue) -> JSValue {
    json!({
        "analysis": analysis,
        "file": simplify_file_name(path),
        "columns": columns,
    })
}

pub fn run_registrations<R: BufRead, W: Write>(
    source: &InputSource,
    output: &OutputTarget,
    config: &TallyConfig,
    prompter: &mut Prompter<R, W>,
) -> BTallyResult<()> {
    let (path, table) = match load_table(source, config, prompter)? {
        Some(x) => x,
        None => return Ok(()),
    };

    let column_idx = prompter.select_column(&table.headers, source.column.as_deref(), None, "")?;
    let column_name = table.headers[column_idx].clone();
    prompter.say(&format!("Analyzing column: '{}'", column_name))?;

    let summary = count_registrations(table.column_values(column_idx));
    info!(
        "run_registrations: {} registrations in {} rows",
        summary.total_registrations, summary.total_rows
    );

    report::write_registration_report(prompter.output(), &summary).context(TerminalSnafu {})?;

    let summary_js = json!({
        "config": summary_config("registrations", &path, json!([column_name])),
        "results": report::registration_summary_js(&summary),
    });
    finish_summary(&summary_js, output, prompter)
}

/// The committee column defaults to the fifth column of the form export.
const COMMITTEE_DEFAULT_INDEX: usize = 4;

pub fn run_committees<R: BufRead, W: Write>(
    source: &InputSource,
    products_column: Option<&str>,
    threshold: Option<u64>,
    output: &OutputTarget,
    config: &TallyConfig,
    prompter: &mut Prompter<R, W>,
) -> BTallyResult<()> {
    prompter.say("--- YPAA Committee Analyzer ---")?;
    let (path, table) = match load_table(source, config, prompter)? {
        Some(x) => x,
        None => return Ok(()),
    };

    let committee_idx = prompter.select_column(
        &table.headers,
        source.column.as_deref(),
        Some(COMMITTEE_DEFAULT_INDEX),
        " for committee data",
    )?;
    prompter.say(&format!(
        "Analyzing Committee Column: '{}'",
        table.headers[committee_idx]
    ))?;

    prompter.say("\n--- Select Products/Quantity Column ---")?;
    let products_idx = match products_column {
        Some(name) => match table.column_index(name) {
            Some(idx) => idx,
            None => {
                prompter.say(&format!(
                    "Warning: Column '{}' not found, selecting interactively.",
                    name
                ))?;
                prompter.select_column(&table.headers, None, None, "")?
            }
        },
        None => match table.find_column_containing("products") {
            Some(idx) => idx,
            None => prompter.select_column(
                &table.headers,
                None,
                None,
                " for registration counts",
            )?,
        },
    };
    prompter.say(&format!(
        "Using Products Column: '{}'",
        table.headers[products_idx]
    ))?;

    let rules = config.committee_rules();
    let mut tally = CommitteeTally::new(&rules);
    for row in table.rows.iter() {
        tally.add_row(cell(row, committee_idx), cell(row, products_idx));
    }
    let threshold = config.threshold(threshold);
    let summary = tally.summarize(threshold);
    info!(
        "run_committees: {} groups listed out of {}",
        summary.listed.len(),
        tally.counts().len()
    );

    report::write_committee_report(prompter.output(), &summary).context(TerminalSnafu {})?;

    let summary_js = json!({
        "config": summary_config(
            "committees",
            &path,
            json!([table.headers[committee_idx], table.headers[products_idx]])
        ),
        "results": report::committee_summary_js(&summary),
    });
    finish_summary(&summary_js, output, prompter)
}

pub fn run_similarity<R: BufRead, W: Write>(
    source: &InputSource,
    cutoff: Option<f64>,
    top: Option<usize>,
    output: &OutputTarget,
    config: &TallyConfig,
    prompter: &mut Prompter<R, W>,
) -> BTallyResult<()> {
    let (path, table) = match load_table(source, config, prompter)? {
        Some(x) => x,
        None => return Ok(()),
    };

    let column_idx = prompter.select_column(&table.headers, source.column.as_deref(), None, "")?;
    let column_name = table.headers[column_idx].clone();
    prompter.say(&format!("Analyzing column: '{}'", column_name))?;

    let rules = config.grouping_rules(cutoff, top);
    let summary =
        analyze_similarity(table.column_values(column_idx), &rules).context(AnalysisSnafu {})?;

    report::write_similarity_report(prompter.output(), &summary).context(TerminalSnafu {})?;

    let summary_js = json!({
        "config": summary_config("similarity", &path, json!([column_name])),
        "results": report::similarity_summary_js(&summary),
    });
    finish_summary(&summary_js, output, prompter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    /// The description of a test case, stored next to its data as `<case>_case.json`.
    #[derive(Debug, Clone, Deserialize)]
    struct TestCase {
        analysis: String,
        /// The data file of the case, `<case>.csv` by default.
        #[serde(rename = "inputFile")]
        input_file: Option<String>,
        #[serde(rename = "inputType")]
        input_type: Option<String>,
        #[serde(rename = "excelWorksheetName")]
        excel_worksheet_name: Option<String>,
        column: Option<String>,
        #[serde(rename = "productsColumn")]
        products_column: Option<String>,
        threshold: Option<u64>,
        cutoff: Option<f64>,
        #[serde(default)]
        settings: TallyConfig,
    }

    fn test_wrapper(case_name: &str) {
        let test_dir = option_env!("TALLY_TEST_DIR")
            .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"));
        info!("Running test {}", case_name);
        let case_p = format!("{}/{}/{}_case.json", test_dir, case_name, case_name);
        let case_str = fs::read_to_string(&case_p).unwrap();
        let case: TestCase = serde_json::from_str(&case_str).unwrap();

        let input_file = case
            .input_file
            .clone()
            .unwrap_or_else(|| format!("{}.csv", case_name));
        let source = InputSource {
            file: Some(format!("{}/{}/{}", test_dir, case_name, input_file)),
            column: case.column.clone(),
            input_type: case.input_type.clone(),
            excel_worksheet_name: case.excel_worksheet_name.clone(),
        };
        let output = OutputTarget {
            out: None,
            reference: Some(format!(
                "{}/{}/{}_expected_summary.json",
                test_dir, case_name, case_name
            )),
        };
        let mut prompter = Prompter::new(std::io::empty(), Vec::new());
        let res = match case.analysis.as_str() {
            "registrations" => run_registrations(&source, &output, &case.settings, &mut prompter),
            "committees" => run_committees(
                &source,
                case.products_column.as_deref(),
                case.threshold,
                &output,
                &case.settings,
                &mut prompter,
            ),
            "similarity" => run_similarity(
                &source,
                case.cutoff,
                None,
                &output,
                &case.settings,
                &mut prompter,
            ),
            x => panic!("unknown analysis {:?}", x),
        };
        if let Err(e) = res {
            eprintln!("An error occured {}", e);
            eprintln!("{}", String::from_utf8_lossy(prompter.output()));
            panic!("test case {} failed", case_name);
        }
    }

    #[test]
    fn registrations_basic() {
        test_wrapper("registrations_basic");
    }

    #[test]
    fn registrations_excel() {
        test_wrapper("registrations_excel");
    }

    #[test]
    fn registrations_cp1252() {
        test_wrapper("registrations_cp1252");
    }

    #[test]
    fn committees_weighted() {
        test_wrapper("committees_weighted");
    }

    #[test]
    fn committees_custom_aliases() {
        test_wrapper("committees_custom_aliases");
    }

    #[test]
    fn similarity_names() {
        test_wrapper("similarity_names");
    }

    #[test]
    fn missing_column_without_input() {
        let source = InputSource {
            file: Some(format!(
                "{}/tests/data/registrations_basic/registrations_basic.csv",
                env!("CARGO_MANIFEST_DIR")
            )),
            column: Some("No such column".to_string()),
            ..InputSource::default()
        };
        let mut prompter = Prompter::new(std::io::empty(), Vec::new());
        let res = run_registrations(
            &source,
            &OutputTarget::default(),
            &TallyConfig::default(),
            &mut prompter,
        );
        assert!(matches!(res.map_err(|e| *e), Err(TallyError::PromptClosed {})));
        let printed = String::from_utf8_lossy(prompter.output()).to_string();
        assert!(printed.contains("Error: Column 'No such column' not found."));
        assert!(printed.contains("Available columns:"));
    }

    #[test]
    fn column_chosen_interactively() {
        let source = InputSource {
            file: Some(format!(
                "{}/tests/data/similarity_names/similarity_names.csv",
                env!("CARGO_MANIFEST_DIR")
            )),
            ..InputSource::default()
        };
        let mut prompter = Prompter::new("\nnope\n2\n".as_bytes(), Vec::new());
        let output = OutputTarget {
            out: Some("stdout".to_string()),
            reference: None,
        };
        run_similarity(
            &source,
            None,
            None,
            &output,
            &TallyConfig::default(),
            &mut prompter,
        )
        .unwrap();
        let printed = String::from_utf8_lossy(prompter.output()).to_string();
        assert!(printed.contains("Column name not found or invalid number. Please try again."));
        assert!(printed.contains("\"analysis\": \"similarity\""));
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let reference_p = dir.path().join("reference.json");
        fs::write(&reference_p, "{\"config\": {}, \"results\": {}}").unwrap();
        let source = InputSource {
            file: Some(format!(
                "{}/tests/data/registrations_basic/registrations_basic.csv",
                env!("CARGO_MANIFEST_DIR")
            )),
            column: Some("Products".to_string()),
            ..InputSource::default()
        };
        let output = OutputTarget {
            out: Some(dir.path().join("out.json").display().to_string()),
            reference: Some(reference_p.display().to_string()),
        };
        let mut prompter = Prompter::new(std::io::empty(), Vec::new());
        let res = run_registrations(&source, &output, &TallyConfig::default(), &mut prompter);
        assert!(matches!(res.map_err(|e| *e), Err(TallyError::Whatever { .. })));
        // The summary is still written before the comparison.
        let written = fs::read_to_string(dir.path().join("out.json")).unwrap();
        assert!(written.contains("\"analysis\": \"registrations\""));
    }
}
