//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `synth` | Render the full deployment template |
//! | `graph` | Show resources and edges in creation order |
//! | `outputs` | Show the projected stack outputs |
//! | `validate` | Resolve a document and report the effective settings |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for diagnostics on stderr:
//! ```bash
//! stackplan --verbose synth deploy.toml
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod synth;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
