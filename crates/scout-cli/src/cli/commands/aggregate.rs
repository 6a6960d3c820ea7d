//! `scout aggregate` - Count matches for a query, broken down by one field.
//!
//! Uses the count endpoint, which costs no query credits.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use scout_core::Bucket;
use serde::Serialize;

use super::Context;
use crate::cli::args::AggregateArgs;
use crate::output::{OutputType, Outputs, Short};
use crate::progress::with_progress;

pub const OUTPUTS: Outputs = Outputs::new(
    OutputType::Short,
    &[OutputType::Data, OutputType::Short, OutputType::Template],
);

const BAR_WIDTH: usize = 40;

/// Facet counts for one field.
#[derive(Debug, Serialize)]
pub struct Breakdown {
    pub query: String,
    pub field: String,
    pub total: u64,
    pub buckets: Vec<Bucket>,
}

pub async fn execute(ctx: Context, args: AggregateArgs) -> Result<()> {
    let client = ctx.client()?;
    let facet = format!("{}:{}", args.field, args.buckets);
    let query = args.query.clone();

    let aggregation = with_progress(ctx.progress, Some("Counting"), |progress| async move {
        progress.message("count", format!("Counting by {facet}")).await;
        Ok(client.search().count(query).facet(facet).send().await?)
    })
    .await?;

    let mut facets = aggregation.facets;
    let breakdown = Breakdown {
        buckets: facets.remove(&args.field).unwrap_or_default(),
        query: args.query,
        field: args.field,
        total: aggregation.total,
    };
    ctx.printer.print_data(&breakdown)?;

    if breakdown.buckets.is_empty() && breakdown.total > 0 {
        ctx.tip("no buckets came back; check the field name (e.g. country, port, org, product)");
    }
    Ok(())
}

impl Short for Breakdown {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "{} {} {}",
            "Total:".bold(),
            self.total.to_string().cyan(),
            format!("({})", self.query).dimmed()
        )?;
        if self.buckets.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(out, "{}", format!("By {}:", self.field).bold().underline())?;

        let labels: Vec<String> = self.buckets.iter().map(Bucket::label).collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = self.buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);

        for (label, bucket) in labels.iter().zip(&self.buckets) {
            writeln!(
                out,
                "  {label:<label_width$}  {} {}",
                bar(bucket.count, max).green(),
                bucket.count
            )?;
        }
        Ok(())
    }
}

/// A bar of up to `BAR_WIDTH` blocks, at least one for any nonzero count.
fn bar(count: u64, max: u64) -> String {
    let width = usize::try_from(count.saturating_mul(BAR_WIDTH as u64) / max).unwrap_or(BAR_WIDTH);
    let width = if count > 0 { width.max(1) } else { 0 };
    "█".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn breakdown() -> Breakdown {
        Breakdown {
            query: "nginx".into(),
            field: "country".into(),
            total: 300,
            buckets: serde_json::from_value(json!([
                { "value": "US", "count": 200 },
                { "value": "DE", "count": 100 },
                { "value": 8080, "count": 1 }
            ]))
            .unwrap(),
        }
    }

    #[test]
    fn test_bar_scales_to_the_largest_bucket() {
        assert_eq!(bar(200, 200).chars().count(), BAR_WIDTH);
        assert_eq!(bar(100, 200).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(1, 200).chars().count(), 1);
        assert_eq!(bar(0, 200), "");
    }

    #[test]
    fn test_short_chart() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        breakdown().render_short(&mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with("Total: 300 (nginx)"));
        assert!(out.contains("By country:"));
        let us = out.lines().find(|l| l.trim_start().starts_with("US")).unwrap();
        assert!(us.ends_with(" 200"));
        assert!(out.contains("8080"));
    }

    #[test]
    fn test_data_shape() {
        let value = serde_json::to_value(breakdown()).unwrap();
        assert_eq!(value["field"], "country");
        assert_eq!(value["buckets"][0]["value"], "US");
    }
}
