//! HTTP client for the security-intelligence API.
//!
//! The entry point is [`Client`]; endpoint groups hang off it
//! (`client.host()`, `client.search()`, `client.certificates()`, `client.dns()`,
//! `client.account()`, `client.org()`).

mod client;
mod config;
pub mod api;

pub use client::{Client, ClientBuilder};
pub use config::RetryConfig;
pub use scout_core::{ApiError, Result};
