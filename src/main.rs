use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

use std::io;

mod args;
mod tally;

use crate::args::{Args, Command, InputArgs};
use crate::tally::config_reader::{read_config, TallyConfig};
use crate::tally::prompt::Prompter;
use crate::tally::*;

fn input_source(input: &InputArgs) -> InputSource {
    InputSource {
        file: input.file.clone(),
        column: input.column.clone(),
        input_type: input.input_type.clone(),
        excel_worksheet_name: input.excel_worksheet_name.clone(),
    }
}

fn run(args: &Args) -> BTallyResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => TallyConfig::default(),
    };
    let output = OutputTarget {
        out: args.out.clone(),
        reference: args.reference.clone(),
    };

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    match &args.command {
        Command::Registrations { input } => {
            run_registrations(&input_source(input), &output, &config, &mut prompter)
        }
        Command::Committees {
            input,
            products_column,
            threshold,
        } => run_committees(
            &input_source(input),
            products_column.as_deref(),
            *threshold,
            &output,
            &config,
            &mut prompter,
        ),
        Command::Similarity { input, cutoff, top } => run_similarity(
            &input_source(input),
            *cutoff,
            *top,
            &output,
            &config,
            &mut prompter,
        ),
    }
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    debug!("main: args: {:?}", args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        for cause in ErrorCompat::iter_chain(e.as_ref()).skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
