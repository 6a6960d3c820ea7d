//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;
pub mod tree;

use std::time::Duration;

use anyhow::{anyhow, Result};
use args::{Cli, Commands};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::debug;

use crate::config::Config;
use crate::exit_code::ExitCode;
use crate::output::{resolve, validate, FormatError, OutputFormat, Printer, OUTPUT_FORMAT_KEY};
use crate::progress::ProgressOptions;
use tree::CommandTree;

/// Run the CLI application.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match execute(cli).await {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            // Format errors were already reported along with the usage line
            if err.downcast_ref::<FormatError>().is_none() {
                eprintln!("{} {err:#}", "Error:".red().bold());
            }
            ExitCode::from_error(&err)
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    // config commands must run on a damaged file
    let config = if matches!(cli.command, Commands::Config { .. }) {
        Config::load_lenient()?
    } else {
        Config::load()?
    };
    let path = cli.command.path();

    let tree = CommandTree::new(&config.output_format, commands::catalog());
    let node = tree
        .find(&path)
        .ok_or_else(|| anyhow!("no such command: {}", path.join(" ")))?;
    let persisted = tree
        .lookup(&path, OUTPUT_FORMAT_KEY)
        .unwrap_or(config.output_format.as_str());

    let requested = resolve(persisted, node.outputs.default, cli.output_format.as_deref());
    let format = match validate(&requested, node.outputs.supported) {
        Ok(format) => format,
        Err(err) => {
            report_format_error(&err, &path);
            return Err(err.into());
        }
    };
    debug!(command = %path.join(" "), %format, "output format resolved");

    let template = if format == OutputFormat::Template {
        Some(commands::template_path(cli.template.as_deref(), &path)?)
    } else {
        None
    };

    let progress = ProgressOptions {
        spinner: config.spinner && !cli.no_spinner && console::Term::stderr().is_term(),
    };
    let ctx = commands::Context::new(
        cli.api_key.or_else(|| config.api_key.clone()),
        cli.api_url.or_else(|| config.api_url.clone()),
        Duration::from_secs(config.timeout_secs),
        Printer::new(format, template),
        progress,
        config.show_tips,
    );

    match cli.command {
        Commands::View(args) => commands::view::execute(ctx, args).await,
        Commands::Certificate(args) => commands::certificate::execute(ctx, args).await,
        Commands::Domain(args) => commands::domain::execute(ctx, args).await,
        Commands::Search(args) => commands::search::execute(ctx, args).await,
        Commands::Aggregate(args) => commands::aggregate::execute(ctx, args).await,
        Commands::Credits => commands::credits::execute(ctx).await,
        Commands::Org { command } => commands::org::execute(ctx, command).await,
        Commands::Completion { shell } => commands::completion::execute(shell),
        Commands::Config { command } => commands::config::execute(&ctx, config, command),
    }
}

fn report_format_error(err: &FormatError, path: &[&str]) {
    eprintln!("{}", err.title().red().bold());
    eprintln!("{err}");
    if err.prints_usage() {
        if let Some(usage) = usage_for(path) {
            eprintln!();
            eprintln!("{usage}");
        }
    }
}

/// Usage line of the subcommand at `path`.
fn usage_for(path: &[&str]) -> Option<String> {
    let mut root = Cli::command();
    root.build();
    let mut cmd = &mut root;
    for name in path {
        cmd = cmd.find_subcommand_mut(name)?;
    }
    Some(cmd.render_usage().to_string())
}
