//! Core types for the scout security-intelligence client.
//!
//! - **Types**: typed views of the API responses the CLI renders
//! - **Errors**: [`ApiError`] and the crate-wide [`Result`] alias
//!
//! # Example
//!
//! ```rust,ignore
//! use scout_core::{Host, Result};
//!
//! fn summarize(host: &Host) -> Result<()> {
//!     println!("{} has {} open ports", host.ip_str, host.ports.len());
//!     Ok(())
//! }
//! ```

mod error;
pub mod types;

pub use error::{ApiError, Result};
pub use types::*;
