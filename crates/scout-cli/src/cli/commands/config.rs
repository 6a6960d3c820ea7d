//! `scout config` - CLI configuration management.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::Context;
use crate::cli::args::ConfigCommands;
use crate::config::Config;
use crate::output::{OutputType, Outputs, Short};

pub const SHOW: Outputs = Outputs::new(OutputType::Short, &[OutputType::Data, OutputType::Short]);
pub const SET: Outputs = Outputs::new(OutputType::Short, &[OutputType::Short]);
pub const PATH: Outputs = Outputs::new(OutputType::Short, &[OutputType::Short]);

/// Configuration as shown to the user, with the API key masked.
#[derive(Debug, Serialize)]
struct ConfigView {
    path: String,
    api_key: Option<String>,
    output_format: String,
    spinner: bool,
    show_tips: bool,
    timeout_secs: u64,
    api_url: Option<String>,
}

impl ConfigView {
    fn new(config: &Config, path: String) -> Self {
        Self {
            path,
            api_key: config.masked_api_key(),
            output_format: config.output_format.clone(),
            spinner: config.spinner,
            show_tips: config.show_tips,
            timeout_secs: config.timeout_secs,
            api_url: config.api_url.clone(),
        }
    }
}

impl Short for ConfigView {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", "Current Configuration:".bold())?;
        writeln!(out, "{}", self.path.dimmed())?;
        writeln!(out)?;

        let not_set = || "(not set)".dimmed().to_string();
        let rows = [
            ("api_key", self.api_key.clone().unwrap_or_else(not_set)),
            ("output_format", self.output_format.clone()),
            ("spinner", self.spinner.to_string()),
            ("show_tips", self.show_tips.to_string()),
            ("timeout", format!("{}s", self.timeout_secs)),
            ("api_url", self.api_url.clone().unwrap_or_else(not_set)),
        ];
        for (key, value) in rows {
            writeln!(out, "  {} {}", format!("{key}:").bold(), value)?;
        }
        Ok(())
    }
}

/// `config` is the file as loaded; entries that failed to parse already hold
/// their defaults.
pub fn execute(ctx: &Context, config: Config, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(ctx, &config),
        ConfigCommands::Set { key, value } => set(config, &key, &value),
        ConfigCommands::Path => path(),
    }
}

fn show(ctx: &Context, config: &Config) -> Result<()> {
    let view = ConfigView::new(config, Config::path()?.display().to_string());
    ctx.printer.print_data(&view)
}

fn set(mut config: Config, key: &str, value: &str) -> Result<()> {
    config.set(key, value)?;
    let path = config.save()?;

    let shown = if key == "api_key" { "(hidden)" } else { value };
    println!("{} {} set to {}.", "Success:".green().bold(), key, shown.cyan());
    tracing::debug!(path = %path.display(), key, "config saved");
    Ok(())
}

fn path() -> Result<()> {
    println!("{}", Config::path()?.display());
    Ok(())
}
