use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use turtle_flatten::ConvertError;

/// Errors surfaced by the command line front end.
///
/// Unlike the structural problems a conversion recovers from, all of these
/// abort the command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file '{}'", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("CSV export to '{}' failed", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv_async::Error,
    },

    #[error("delimiter '{0}' is not a single ASCII character")]
    Delimiter(char),

    #[error("conversion did not finish within {0:?}")]
    Timeout(Duration),

    #[error("conversion task failed")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CliError>;
