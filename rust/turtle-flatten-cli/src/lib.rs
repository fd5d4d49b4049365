//! # turtle-flatten-cli
//!
//! Command line front end for [`turtle_flatten`]. Reads a Turtle document,
//! writes the flattened lines next to it, and can export them as CSV or
//! summarize their unique values.
//!
//! ## Usage
//!
//! ```bash
//! turtle-flatten convert dump.ttl                  # writes dump.ttl.converted.txt
//! turtle-flatten convert dump.ttl --parallel --csv dump.csv --stats
//! turtle-flatten csv dump.ttl.converted.txt -o dump.csv --delimiter ';'
//! turtle-flatten stats dump.ttl.converted.txt
//! ```
//!
//! Settings can be loaded from a JSON file with `--config`; any field left
//! out keeps its default:
//!
//! ```json
//! { "statement_prefixes": ["s:", "v:"], "max_depth": 16 }
//! ```
//!
//! Log output goes to stderr and is controlled with `RUST_LOG`.

mod cli;
pub use cli::*;

mod error;
pub use error::*;

mod export;
pub use export::*;

mod run;
pub use run::*;

mod stats;
pub use stats::*;
