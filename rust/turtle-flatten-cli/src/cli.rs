use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use turtle_flatten::FlattenConfig;

#[derive(Debug, Parser)]
#[command(name = "turtle-flatten")]
#[command(bin_name = "turtle-flatten")]
#[command(about = "Flatten nested Turtle statements", long_about = None)]
pub struct TurtleFlattenCli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a Turtle document into flattened lines
    Convert(ConvertArgs),
    /// Export previously converted output as CSV
    Csv(CsvArgs),
    /// Print unique-value statistics of previously converted output
    Stats(StatsArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Turtle document to convert
    pub input: PathBuf,

    /// Where to write the converted lines [default: <INPUT>.converted.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with conversion settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Object prefix marking a statement node. Repeatable; replaces the
    /// configured list.
    #[arg(long = "statement-prefix", value_name = "PREFIX")]
    pub statement_prefixes: Vec<String>,

    /// Predicate prefix whose objects are always followed. Repeatable;
    /// replaces the configured list.
    #[arg(long = "qualifier-prefix", value_name = "PREFIX")]
    pub qualifier_prefixes: Vec<String>,

    /// Longest predicate chain a line may carry
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Flatten subjects on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Give up if the conversion takes longer than this
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Also export the converted lines as CSV
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Also print unique-value statistics
    #[arg(long)]
    pub stats: bool,
}

impl ConvertArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut path = self.input.clone().into_os_string();
            path.push(".converted.txt");
            PathBuf::from(path)
        })
    }

    /// Apply command line overrides on top of `config`.
    pub fn apply_to(&self, config: &mut FlattenConfig) {
        if !self.statement_prefixes.is_empty() {
            config.statement_prefixes = self.statement_prefixes.clone();
        }
        if !self.qualifier_prefixes.is_empty() {
            config.qualifier_prefixes = self.qualifier_prefixes.clone();
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        config.parallel |= self.parallel;
    }
}

#[derive(Debug, Args)]
pub struct CsvArgs {
    /// Converted file to export
    pub input: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,

    /// Field delimiter, a single ASCII character
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Converted file to analyze
    pub input: PathBuf,
}
