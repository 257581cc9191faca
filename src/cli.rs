use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fmtwrite::FormatKind;

#[derive(Parser, Debug)]
#[command(name = "fmtwrite", version, about = "Write formatted artifacts to disk")]
pub struct Cli {
    /// TOML file with default format, print width and prettier command.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an output directory (and its parents) if it is missing.
    Mkdir { dir: PathBuf },
    /// Format text and write it to `<DIR>/<NAME>`, printing the path written.
    Write(WriteArgs),
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    pub dir: PathBuf,
    pub name: String,
    #[arg(long = "format", short = 'F', value_enum)]
    pub format: Option<FormatKind>,
    #[arg(long = "print-width", short = 'w')]
    pub print_width: Option<usize>,
    /// Read contents from this file instead of stdin (`-` also means stdin).
    #[arg(long = "input", short = 'i')]
    pub input: Option<PathBuf>,
    /// Create `<DIR>` first when it does not exist.
    #[arg(long = "mkdir", default_value_t = false)]
    pub mkdir: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
