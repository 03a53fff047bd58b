// Input layer: a small `Console` abstraction plus the prompt sequences
// the operations need. The interactive console uses `dialoguer`; when
// stdin is piped (scripts, tests) a plain line reader is used instead.

use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::record::RecordFields;

/// Where prompts are answered and results are printed.
pub trait Console {
    /// Show `prompt` and read one line of input, without the line ending.
    /// End of input reads as an empty line.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Print one line of output.
    fn say(&mut self, line: &str) -> io::Result<()>;

    /// Progress indicator shown while a store call is in flight.
    fn progress(&self, _message: &str) -> ProgressBar {
        ProgressBar::hidden()
    }
}

/// Terminal console backed by `dialoguer` prompts and an `indicatif`
/// spinner.
#[derive(Default)]
pub struct TermConsole;

impl Console for TermConsole {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout(), "{line}")
    }

    fn progress(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }
}

/// Line-oriented console over any reader/writer pair.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

impl LineConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}

/// Prompt for the editable fields of a record.
///
/// A revenue that does not parse is reported and replaced by `0.0`; the
/// user is not asked again.
pub fn collect_fields<C: Console + ?Sized>(console: &mut C) -> io::Result<RecordFields> {
    let name = console.ask("Insert the name")?;
    let raw = console.ask("Insert the revenue value")?;
    let revenue = match parse_revenue(&raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(input = %raw, error = %e, "revenue did not parse, using 0");
            console.say(&format!("Error parsing revenue: {e}"))?;
            0.0
        }
    };
    Ok(RecordFields::new(name, revenue))
}

/// Prompt for a record id. Only surrounding whitespace is removed; the
/// format is checked by the operation that uses it.
pub fn collect_id<C: Console + ?Sized>(console: &mut C) -> io::Result<String> {
    Ok(console.ask("What is the record ID?")?.trim().to_string())
}

pub fn parse_revenue(raw: &str) -> Result<f64, std::num::ParseFloatError> {
    raw.trim().parse::<f64>()
}
