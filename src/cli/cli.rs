use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Navigate a directory tree described in a text file")]
pub struct Cli {
    /// The tree description file
    #[clap(default_value = "directory.dat")]
    pub description: PathBuf,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Skip lines whose indentation is not a multiple of three instead of rounding down
    #[clap(long)]
    pub strict_indent: bool,

    /// Never style the prompt or messages
    #[clap(long)]
    pub no_color: bool,
}
