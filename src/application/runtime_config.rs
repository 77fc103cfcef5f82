use std::path::PathBuf;

use supports_color::Stream;

use crate::cli::Cli;
use crate::filesystem::IndentPolicy;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub description: PathBuf,
    pub indent_policy: IndentPolicy,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let indent_policy = if cli.strict_indent {
            IndentPolicy::Strict
        } else {
            IndentPolicy::Lenient
        };

        Self {
            description: cli.description,
            indent_policy,
            color: !cli.no_color && supports_color::on(Stream::Stdout).is_some(),
        }
    }
}
