use clap::{Parser, Subcommand};

/// Counts registrations, committees and look-alike values in the columns of form exports.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the encodings to try, extra committee aliases and
    /// answers, and default values for the thresholds.
    #[clap(long, value_parser, global = true)]
    pub config: Option<String>,

    /// (file path) A reference file containing the JSON summary of the analysis. If provided,
    /// coltally will check that the computed summary matches the reference.
    #[clap(short, long, value_parser, global = true)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the analysis will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser, global = true)]
    pub out: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// (file path or empty) The file to analyze. If not provided, the CSV and Excel files of the
    /// current directory are listed for selection.
    #[clap(short, long, value_parser)]
    pub file: Option<String>,

    /// (column name or empty) The column to analyze. If not provided or not found, the columns
    /// are listed for selection.
    #[clap(short, long, value_parser)]
    pub column: Option<String>,

    /// ('csv', 'excel' or empty) The type of the input. By default, it is deduced from the
    /// extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. By default, the
    /// first worksheet is used.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Counts the registrations of a products column, by type and by price.
    Registrations {
        #[clap(flatten)]
        input: InputArgs,
    },
    /// Counts the YPAA committees named in a free text column, weighted by the number of
    /// registrations of each row.
    Committees {
        #[clap(flatten)]
        input: InputArgs,

        /// (column name or empty) The column with the products and quantities. By default, the
        /// first column whose name contains 'products'.
        #[clap(short, long, value_parser)]
        products_column: Option<String>,

        /// (default 2) Minimum weighted count for a committee to be listed.
        #[clap(short, long, value_parser)]
        threshold: Option<u64>,
    },
    /// Counts the exact duplicates of a column and groups the values that look alike.
    Similarity {
        #[clap(flatten)]
        input: InputArgs,

        /// (default 0.8) Similarity ratio above which two values are grouped together.
        #[clap(long, value_parser)]
        cutoff: Option<f64>,

        /// (default 10) Number of exact matches to display.
        #[clap(long, value_parser)]
        top: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn committees_arguments() {
        let args = Args::parse_from([
            "coltally",
            "committees",
            "-f",
            "form.csv",
            "-p",
            "Order Products",
            "-t",
            "3",
            "-o",
            "stdout",
        ]);
        assert_eq!(args.out.as_deref(), Some("stdout"));
        match args.command {
            Command::Committees {
                input,
                products_column,
                threshold,
            } => {
                assert_eq!(input.file.as_deref(), Some("form.csv"));
                assert_eq!(input.column, None);
                assert_eq!(products_column.as_deref(), Some("Order Products"));
                assert_eq!(threshold, Some(3));
            }
            c => panic!("unexpected command {:?}", c),
        }
    }

    #[test]
    fn similarity_arguments() {
        let args = Args::parse_from([
            "coltally",
            "--verbose",
            "similarity",
            "-c",
            "City",
            "--cutoff",
            "0.7",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Similarity { input, cutoff, top } => {
                assert_eq!(input.column.as_deref(), Some("City"));
                assert_eq!(cutoff, Some(0.7));
                assert_eq!(top, None);
            }
            c => panic!("unexpected command {:?}", c),
        }
    }
}
