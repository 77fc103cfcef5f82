use std::fmt::Write as _;

use hashlink::LinkedHashMap;
use tracing::debug;

use crate::commands::{Invocation, Outcome};
use crate::navigator::Navigator;

pub type Handler = fn(&CommandTable, &mut Navigator<'_>, Option<&str>) -> Outcome;

#[derive(Debug, Clone, Copy)]
pub struct CommandEntry {
    handler: Handler,
    /// Placeholder shown in usage, present only for commands that need an argument
    argument: Option<&'static str>,
    summary: &'static str,
}

/// Maps command names to the navigator operation they run, in registration order.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: LinkedHashMap<&'static str, CommandEntry>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &'static str,
        argument: Option<&'static str>,
        summary: &'static str,
        handler: Handler,
    ) -> &mut Self {
        self.entries.insert(
            name,
            CommandEntry {
                handler,
                argument,
                summary,
            },
        );
        self
    }

    /// The commands understood by the interactive shell.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table
            .register("list", None, "list entries of the current directory", list)
            .register("listall", None, "show the full tree below the current directory", list_all)
            .register("chdir", Some("<directory>"), "enter a child directory", chdir)
            .register("up", None, "return to the previous directory", up)
            .register("count", None, "count files in the current directory", count)
            .register("countall", None, "count files below the current directory", count_all)
            .register("find", Some("<name>"), "search the tree below the current directory", find)
            .register("pwd", None, "show the path of the current directory", pwd)
            .register("clear", None, "clear the screen", clear)
            .register("help", None, "show this help", help)
            .register("q", None, "quit", quit);
        table
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn dispatch(&self, navigator: &mut Navigator<'_>, invocation: &Invocation<'_>) -> Outcome {
        let Some(entry) = self.entries.get(invocation.name.as_str()) else {
            debug!("Unknown command '{}'", invocation.name);
            return Outcome::Report("Invalid command".to_string());
        };

        if let (Some(placeholder), None) = (entry.argument, invocation.argument) {
            return Outcome::Report(format!("Usage: {} {}", invocation.name, placeholder));
        }

        debug!(
            "Dispatching '{}' with argument {:?}",
            invocation.name, invocation.argument
        );
        (entry.handler)(self, navigator, invocation.argument)
    }

    fn help_text(&self) -> String {
        let mut out = String::new();
        for (name, entry) in &self.entries {
            let usage = match entry.argument {
                Some(placeholder) => format!("{name} {placeholder}"),
                None => name.to_string(),
            };
            let _ = writeln!(out, "{usage:<18}{}", entry.summary);
        }
        out.truncate(out.trim_end().len());
        out
    }
}

fn list(_: &CommandTable, navigator: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    Outcome::Print(navigator.list())
}

fn list_all(_: &CommandTable, navigator: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    let mut rendered = navigator.list_all();
    rendered.truncate(rendered.trim_end().len());
    Outcome::Print(rendered)
}

fn chdir(_: &CommandTable, navigator: &mut Navigator<'_>, argument: Option<&str>) -> Outcome {
    match navigator.chdir(argument.unwrap_or_default()) {
        Ok(()) => Outcome::Nothing,
        Err(error) => Outcome::Report(error.to_string()),
    }
}

fn up(_: &CommandTable, navigator: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    if !navigator.up() {
        debug!("Already at the top, ignoring 'up'");
    }
    Outcome::Nothing
}

fn count(_: &CommandTable, navigator: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    Outcome::Print(format!("Count {}", navigator.count_current()))
}

fn count_all(_: &CommandTable, navigator: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    Outcome::Print(format!("Count {}", navigator.count_all()))
}

fn find(_: &CommandTable, navigator: &mut Navigator<'_>, argument: Option<&str>) -> Outcome {
    let paths = navigator.find(argument.unwrap_or_default());
    if paths.is_empty() {
        Outcome::Report("No matches found".to_string())
    } else {
        Outcome::Print(paths.join("\n"))
    }
}

fn pwd(_: &CommandTable, navigator: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    Outcome::Print(navigator.pwd())
}

fn clear(_: &CommandTable, _: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    Outcome::Clear
}

fn help(table: &CommandTable, _: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    Outcome::Print(table.help_text())
}

fn quit(_: &CommandTable, _: &mut Navigator<'_>, _: Option<&str>) -> Outcome {
    Outcome::Quit
}
