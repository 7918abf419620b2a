// Interactive selection of the input file and of the columns.

use std::io::{BufRead, Write};

use snafu::prelude::*;

use crate::tally::*;

/// The extensions of the files offered for analysis.
const INPUT_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

/// The CSV and Excel files of a directory, in alphabetical order.
pub fn list_input_files(dir: &str) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for ext in INPUT_EXTENSIONS.iter() {
        let pattern = if dir == "." {
            format!("*.{}", ext)
        } else {
            format!("{}/*.{}", glob::Pattern::escape(dir), ext)
        };
        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("list_input_files: invalid pattern {:?}: {}", pattern, e);
                continue;
            }
        };
        for entry in paths.flatten() {
            res.push(entry.display().to_string());
        }
    }
    debug!("list_input_files: {:?}", res);
    res
}

/// Asks questions on one stream and reads the answers from another.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Prompter<R, W> {
        Prompter { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn say(&mut self, line: &str) -> BTallyResult<()> {
        writeln!(self.output, "{}", line).context(TerminalSnafu {})?;
        Ok(())
    }

    /// Prints the question and returns the trimmed answer.
    fn ask(&mut self, question: &str) -> BTallyResult<String> {
        write!(self.output, "{}", question).context(TerminalSnafu {})?;
        self.output.flush().context(TerminalSnafu {})?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context(TerminalSnafu {})?;
        if n == 0 {
            return Err(Box::new(TallyError::PromptClosed {}));
        }
        Ok(line.trim().to_string())
    }

    /// Lets the user pick one of the files. None when there is nothing to pick.
    pub fn select_file(&mut self, files: &[String]) -> BTallyResult<Option<String>> {
        if files.is_empty() {
            self.say("No CSV or Excel files found in the current directory.")?;
            return Ok(None);
        }
        self.say("Found the following files:")?;
        for (i, f) in files.iter().enumerate() {
            self.say(&format!("{}. {}", i + 1, f))?;
        }

        let question = format!(
            "\nEnter the number of the file to analyze (1-{}): ",
            files.len()
        );
        loop {
            let choice = self.ask(&question)?;
            if choice.is_empty() {
                continue;
            }
            match choice.parse::<i64>() {
                Ok(n) if n >= 1 && n as usize <= files.len() => {
                    return Ok(Some(files[n as usize - 1].clone()));
                }
                Ok(_) => self.say("Invalid number. Please try again.")?,
                Err(_) => self.say("Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Returns the index of a column.
    ///
    /// A requested name that matches a header exactly is used without asking.
    /// Otherwise the columns are listed and the user answers with a 1-based number
    /// or a column name. An empty answer picks `default_idx` (0-based) if it is valid.
    pub fn select_column(
        &mut self,
        headers: &[String],
        requested: Option<&str>,
        default_idx: Option<usize>,
        prompt_suffix: &str,
    ) -> BTallyResult<usize> {
        if let Some(name) = requested {
            // Duplicated headers resolve to the first column of that name.
            if let Some(idx) = headers.iter().position(|h| h == name) {
                return Ok(idx);
            }
            self.say(&format!("Error: Column '{}' not found.", name))?;
        }

        self.say("\nAvailable columns:")?;
        for (idx, col) in headers.iter().enumerate() {
            self.say(&format!("{}. {}", idx + 1, col))?;
        }

        let default_idx = default_idx.filter(|idx| *idx < headers.len());
        let default_msg = match default_idx {
            Some(idx) => format!(" (default {})", idx + 1),
            None => String::new(),
        };
        let question = format!(
            "\nEnter column name or number{}{}: ",
            default_msg, prompt_suffix
        );

        loop {
            let answer = self.ask(&question)?;
            if answer.is_empty() {
                match default_idx {
                    Some(idx) => return Ok(idx),
                    None => continue,
                }
            }

            if answer.chars().all(|c| c.is_ascii_digit()) {
                match answer.parse::<usize>() {
                    Ok(n) if n >= 1 && n <= headers.len() => return Ok(n - 1),
                    _ => {
                        self.say(&format!("Number must be between 1 and {}.", headers.len()))?;
                        continue;
                    }
                }
            }

            if let Some(idx) = headers.iter().position(|h| h.trim() == answer) {
                return Ok(idx);
            }
            self.say("Column name not found or invalid number. Please try again.")?;
        }
    }
}
