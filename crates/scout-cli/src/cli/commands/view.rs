//! `scout view` - Look up everything known about an IP address.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use scout_core::Host;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::ViewArgs;
use crate::output::{Outputs, Short};
use crate::progress::with_progress;

pub const OUTPUTS: Outputs = Outputs::ANY;

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Protocol")]
    transport: String,
    #[tabled(rename = "Service")]
    product: String,
    #[tabled(rename = "Version")]
    version: String,
}

pub async fn execute(ctx: Context, args: ViewArgs) -> Result<()> {
    let client = ctx.client()?;
    let initial = format!("Looking up {}", args.ip);

    let host = with_progress(ctx.progress, Some(initial.as_str()), |progress| async move {
        progress.message("lookup", format!("Fetching {}", args.ip)).await;
        let host = if args.history || args.minify {
            client
                .host()
                .with_options(&args.ip)
                .history(args.history)
                .minify(args.minify)
                .send()
                .await?
        } else {
            client.host().lookup(&args.ip).await?
        };
        progress.message("render", format!("{} open ports", host.ports.len())).await;
        Ok(host)
    })
    .await?;

    ctx.printer.print_data(&host)?;

    if host.is_vulnerable() {
        ctx.tip("pass -O json to get the full list of vulnerabilities with every banner");
    }
    Ok(())
}

impl Short for Host {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{} {}", "Host:".bold(), self.ip_str.cyan().bold())?;
        writeln!(out)?;

        let fields = [
            ("Organization:", self.org.as_deref()),
            ("ASN:", self.asn.as_deref()),
            ("ISP:", self.isp.as_deref()),
            ("OS:", self.os.as_deref()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                writeln!(out, "  {} {}", label.bold(), value)?;
            }
        }

        let location = self.location.label();
        if !location.is_empty() {
            writeln!(out, "  {} {}", "Location:".bold(), location)?;
        }
        if !self.hostnames.is_empty() {
            writeln!(out, "  {} {}", "Hostnames:".bold(), self.hostnames.join(", "))?;
        }
        if !self.tags.is_empty() {
            writeln!(out, "  {} {}", "Tags:".bold(), self.tags.join(", "))?;
        }

        if !self.ports.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "Open Ports:".bold().underline())?;

            // Minified lookups carry ports but no banners
            let rows: Vec<PortRow> = if self.services.is_empty() {
                self.ports
                    .iter()
                    .map(|port| PortRow {
                        port: *port,
                        transport: "tcp".to_string(),
                        product: String::new(),
                        version: String::new(),
                    })
                    .collect()
            } else {
                self.services
                    .iter()
                    .map(|svc| PortRow {
                        port: svc.port,
                        transport: svc.transport.to_string(),
                        product: svc.product.clone().unwrap_or_default(),
                        version: svc.version.clone().unwrap_or_default(),
                    })
                    .collect()
            };
            writeln!(out, "{}", Table::new(&rows).with(Style::rounded()))?;
        }

        writeln!(out)?;
        if self.vulns.is_empty() {
            writeln!(out, "{} {}", "Vulnerabilities:".bold(), "None detected".green())?;
        } else {
            writeln!(out, "{}", "Vulnerabilities:".bold().red())?;
            for vuln in &self.vulns {
                writeln!(out, "  {} {}", "-".red(), vuln)?;
            }
        }

        if let Some(update) = &self.last_update {
            writeln!(out)?;
            writeln!(out, "{}", format!("Last updated: {update}").dimmed())?;
        }
        Ok(())
    }
}
