//! `scout domain` - Subdomains and DNS records of a web property.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use scout_core::Domain;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::DomainArgs;
use crate::output::{Outputs, Short};
use crate::progress::with_progress;

pub const OUTPUTS: Outputs = Outputs::ANY;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

pub async fn execute(ctx: Context, args: DomainArgs) -> Result<()> {
    let client = ctx.client()?;
    let initial = format!("Looking up {}", args.domain);
    let domain = with_progress(ctx.progress, Some(initial.as_str()), |_| async move {
        Ok(client.dns().domain(&args.domain).await?)
    })
    .await?;

    ctx.printer.print_data(&domain)?;

    if domain.more {
        ctx.tip("the API holds more records for this domain than it returned");
    }
    Ok(())
}

impl Short for Domain {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{} {}", "Domain:".bold(), self.domain.cyan().bold())?;
        if !self.tags.is_empty() {
            writeln!(out, "  {} {}", "Tags:".bold(), self.tags.join(", "))?;
        }
        writeln!(out, "  {} {}", "Subdomains:".bold(), self.subdomains.len())?;

        writeln!(out)?;
        if self.records.is_empty() {
            return writeln!(out, "{}", "No DNS records.".dimmed());
        }
        let rows: Vec<RecordRow> = self
            .records
            .iter()
            .map(|r| RecordRow {
                name: r.name(&self.domain),
                record_type: r.record_type.clone(),
                value: r.value.clone(),
                last_seen: r.last_seen.clone().unwrap_or_default(),
            })
            .collect();
        writeln!(out, "{}", Table::new(&rows).with(Style::rounded()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(domain: &Domain) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        domain.render_short(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_short_lists_records() {
        let domain: Domain = serde_json::from_value(serde_json::json!({
            "domain": "example.org",
            "tags": ["dmarc"],
            "subdomains": ["www", "mail"],
            "data": [
                { "subdomain": "", "type": "MX", "value": "mail.example.org" },
                { "subdomain": "www", "type": "A", "value": "192.0.2.1", "last_seen": "2024-05-01" }
            ]
        }))
        .unwrap();

        let out = short(&domain);
        assert!(out.contains("Domain: example.org"));
        assert!(out.contains("Tags: dmarc"));
        assert!(out.contains("Subdomains: 2"));
        assert!(out.contains("www.example.org"));
        assert!(out.contains("2024-05-01"));
    }

    #[test]
    fn test_short_without_records() {
        let domain: Domain = serde_json::from_value(serde_json::json!({ "domain": "example.net" })).unwrap();
        assert!(short(&domain).contains("No DNS records."));
    }
}
