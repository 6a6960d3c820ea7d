//! # scout-cli
//!
//! Command-line client for a security-intelligence API.
//!
//! ## Features
//!
//! - **Lookups and search**: host details, paginated search, facet aggregation
//! - **Output negotiation**: every command declares the formats it can render;
//!   short-only commands keep their own default even when the saved
//!   preference is a data format
//! - **Formats**: JSON, YAML, NDJSON, short summaries, handlebars templates
//! - **Streaming**: `search --streaming` prints each match as it arrives
//! - **Progress**: a spinner on stderr while requests are in flight

pub mod cli;
pub mod config;
pub mod exit_code;
pub mod logging;
pub mod output;
pub mod progress;
pub mod stream;

pub use cli::run;
