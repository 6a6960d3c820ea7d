//! Command implementations.

pub mod aggregate;
pub mod certificate;
pub mod completion;
pub mod config;
pub mod credits;
pub mod domain;
pub mod org;
pub mod search;
pub mod view;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use scout_client::Client;

use super::tree::CommandNode;
use crate::config::Config;
use crate::output::{OutputFormat, Outputs, Printer};
use crate::progress::ProgressOptions;
use crate::stream::{Emitter, Sink, StreamGuard};

/// No API key from the flag, the environment or the config file.
#[derive(Debug, thiserror::Error)]
#[error(
    "API key required.\n\n\
     Set it with one of:\n  \
     1. --api-key <KEY>\n  \
     2. SCOUT_API_KEY environment variable\n  \
     3. scout config set api_key <KEY>"
)]
pub struct MissingApiKey;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// API key, if one was configured anywhere
    pub api_key: Option<String>,

    /// Base URL override
    pub api_url: Option<String>,

    pub timeout: Duration,

    /// Renders single-shot results in the resolved format
    pub printer: Printer,

    pub progress: ProgressOptions,

    pub show_tips: bool,

    emitter: Option<Emitter>,
}

impl Context {
    pub const fn new(
        api_key: Option<String>,
        api_url: Option<String>,
        timeout: Duration,
        printer: Printer,
        progress: ProgressOptions,
        show_tips: bool,
    ) -> Self {
        Self {
            api_key,
            api_url,
            timeout,
            printer,
            progress,
            show_tips,
            emitter: None,
        }
    }

    /// Get the API key, returning an error if not set.
    pub fn require_api_key(&self) -> Result<&str, MissingApiKey> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or(MissingApiKey)
    }

    /// Create an API client with the configured key, URL and timeout.
    pub fn client(&self) -> Result<Client> {
        let key = self.require_api_key()?;
        let mut builder = Client::builder(key).timeout(self.timeout);
        if let Some(url) = &self.api_url {
            builder = builder.base_url(url.clone());
        }
        Ok(builder.build()?)
    }

    /// Present while a stream is active; commands emit records through it
    /// instead of printing once.
    pub const fn emitter(&self) -> Option<&Emitter> {
        self.emitter.as_ref()
    }

    pub const fn format(&self) -> OutputFormat {
        self.printer.format()
    }

    /// Start streaming to stdout when `enabled`. Disabled hands back the
    /// context untouched with an inactive guard.
    pub fn begin_streaming(self, enabled: bool) -> (Self, StreamGuard) {
        self.begin_streaming_to(enabled, Box::new(std::io::stdout()))
    }

    pub fn begin_streaming_to(mut self, enabled: bool, sink: Sink) -> (Self, StreamGuard) {
        let (emitter, guard) = StreamGuard::start(enabled, sink);
        if emitter.is_some() {
            self.emitter = emitter;
        }
        (self, guard)
    }

    /// Print a hint to stderr, unless tips are turned off or output is meant for machines.
    pub fn tip(&self, message: &str) {
        if self.show_tips && self.format() == OutputFormat::Short {
            let _ = writeln!(std::io::stderr(), "{}", format!("Tip: {message}").dimmed());
        }
    }
}

/// Every command with its output declaration, rooted at the program node.
pub fn catalog() -> CommandNode {
    CommandNode::new("scout", Outputs::DATA_ONLY)
        .child(CommandNode::new("view", view::OUTPUTS))
        .child(CommandNode::new("certificate", certificate::OUTPUTS))
        .child(CommandNode::new("domain", domain::OUTPUTS))
        .child(CommandNode::new("search", search::OUTPUTS))
        .child(CommandNode::new("aggregate", aggregate::OUTPUTS))
        .child(CommandNode::new("credits", credits::OUTPUTS))
        .child(CommandNode::new("org", Outputs::DATA_ONLY).child(CommandNode::new("details", org::DETAILS)))
        .child(CommandNode::new("completion", completion::OUTPUTS))
        .child(
            CommandNode::new("config", Outputs::DATA_ONLY)
                .child(CommandNode::new("show", config::SHOW))
                .child(CommandNode::new("set", config::SET))
                .child(CommandNode::new("path", config::PATH)),
        )
}

/// Template for the command at `path`: the `--template` flag, or
/// `<config dir>/templates/<path joined by '_'>.hbs`.
pub fn template_path(flag: Option<&str>, path: &[&str]) -> Result<PathBuf> {
    if let Some(flag) = flag {
        return Ok(PathBuf::from(shellexpand::tilde(flag).into_owned()));
    }
    Ok(Config::templates_dir()?.join(format!("{}.hbs", path.join("_"))))
}
