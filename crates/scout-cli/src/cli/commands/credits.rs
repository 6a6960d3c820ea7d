//! `scout credits` - Remaining query and scan credits.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use scout_core::Credits;

use super::Context;
use crate::output::{OutputType, Outputs, Short};
use crate::progress::with_progress;

pub const OUTPUTS: Outputs = Outputs::new(OutputType::Short, &[OutputType::Data, OutputType::Short]);

/// Below this share of the monthly allowance the balance is highlighted.
const LOW_RATIO: f64 = 0.1;

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    let credits = with_progress(ctx.progress, Some("Checking credits"), |_| async move {
        Ok(client.account().credits().await?)
    })
    .await?;

    ctx.printer.print_data(&credits)?;

    if credits.query_credits <= 0 {
        ctx.tip("out of query credits; `scout aggregate` still works since counting is free");
    }
    Ok(())
}

impl Short for Credits {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        let low = self.query_ratio().is_some_and(|r| r < LOW_RATIO) || self.query_credits <= 0;
        let query = self.query_credits.to_string();
        let query = if low { query.red().bold() } else { query.green().bold() };

        writeln!(out, "{} {}", "Query credits:".bold(), query)?;
        writeln!(out, "{} {}", "Scan credits: ".bold(), self.scan_credits)?;
        if let Some(plan) = &self.plan {
            writeln!(out, "{} {}", "Plan:         ".bold(), plan.cyan())?;
        }
        if let Some(limit) = self.usage_limits.as_ref().and_then(|l| l.query_credits) {
            writeln!(out, "{}", format!("Monthly query allowance: {limit}").dimmed())?;
        }
        Ok(())
    }
}
