use std::io::{BufRead, Write};

use colored::Colorize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::commands::{CommandTable, Invocation, Outcome};
use crate::navigator::Navigator;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Interactive prompt loop reading commands from `reader` and writing results to `writer`.
pub struct Shell<R, W> {
    reader: R,
    writer: W,
    table: CommandTable,
    color: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(reader: R, writer: W, color: bool) -> Self {
        Self {
            reader,
            writer,
            table: CommandTable::standard(),
            color,
        }
    }

    /// Runs until `q` or end of input. Only I/O failures end the session early.
    pub fn run(&mut self, navigator: &mut Navigator<'_>) -> Result<(), ShellError> {
        let mut buffer = Vec::new();
        loop {
            self.prompt(navigator)?;

            buffer.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut buffer)
                .context(ReadSnafu)?;
            if read == 0 {
                debug!("End of input reached");
                self.writer.write_all(b"\n").context(WriteSnafu)?;
                break;
            }

            // Input from a terminal in another encoding must not end the session
            let line = String::from_utf8_lossy(&buffer);
            let Some(invocation) = Invocation::parse(&line) else {
                continue;
            };
            let outcome = self.table.dispatch(navigator, &invocation);
            if outcome == Outcome::Quit {
                break;
            }
            self.emit(outcome)?;
        }

        info!(
            "Session ended at '{}', {} levels below the root",
            navigator.pwd(),
            navigator.depth()
        );
        self.writer.flush().context(WriteSnafu)
    }

    fn prompt(&mut self, navigator: &Navigator<'_>) -> Result<(), ShellError> {
        let name = navigator.current().name();
        if self.color {
            write!(self.writer, "{}>", name.bold()).context(WriteSnafu)?;
        } else {
            write!(self.writer, "{name}>").context(WriteSnafu)?;
        }
        self.writer.flush().context(WriteSnafu)
    }

    fn emit(&mut self, outcome: Outcome) -> Result<(), ShellError> {
        match outcome {
            Outcome::Print(text) => writeln!(self.writer, "{text}"),
            Outcome::Report(text) if self.color => writeln!(self.writer, "{}", text.as_str().red()),
            Outcome::Report(text) => writeln!(self.writer, "{text}"),
            Outcome::Clear => write!(self.writer, "{CLEAR_SCREEN}"),
            Outcome::Nothing | Outcome::Quit => Ok(()),
        }
        .context(WriteSnafu)
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.writer
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read user input"))]
    ReadError { source: std::io::Error },
    #[snafu(display("Failed to write to the terminal"))]
    WriteError { source: std::io::Error },
}
