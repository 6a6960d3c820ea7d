//! `scout certificate` - Look up a TLS certificate by fingerprint.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use scout_core::CertificateReport;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::CertificateArgs;
use crate::output::{Outputs, Short};
use crate::progress::with_progress;

pub const OUTPUTS: Outputs = Outputs::ANY;

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Hostnames")]
    hostnames: String,
}

pub async fn execute(ctx: Context, args: CertificateArgs) -> Result<()> {
    let client = ctx.client()?;
    let report = with_progress(ctx.progress, Some("Looking up certificate"), |progress| async move {
        progress.message("lookup", format!("Searching for {}", args.fingerprint)).await;
        Ok(client.certificates().lookup(&args.fingerprint).await?)
    })
    .await?;

    ctx.printer.print_data(&report)?;

    if report.total > report.hosts.len() as u64 {
        ctx.tip("`scout search ssl.cert.fingerprint:<sha256> --pages N` lists every service");
    }
    Ok(())
}

impl Short for CertificateReport {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        let cert = &self.certificate;
        let name = cert.common_name().unwrap_or("(no subject)");
        writeln!(out, "{} {}", "Certificate:".bold(), name.cyan().bold())?;
        writeln!(out, "  {} {}", "SHA-256:".bold(), cert.fingerprint.sha256)?;

        let issuer = cert.issuer_label();
        if !issuer.is_empty() {
            writeln!(out, "  {} {}", "Issuer:".bold(), issuer)?;
        }
        if let Some(alg) = &cert.sig_alg {
            writeln!(out, "  {} {}", "Signature:".bold(), alg)?;
        }
        if let (Some(issued), Some(expires)) = (&cert.issued, &cert.expires) {
            writeln!(out, "  {} {} to {}", "Valid:".bold(), issued, expires)?;
        }
        if cert.expired {
            writeln!(out, "  {}", "Expired".red().bold())?;
        }

        writeln!(out)?;
        writeln!(out, "{}", format!("Served by ({} total):", self.total).bold().underline())?;
        let rows: Vec<HostRow> = self
            .hosts
            .iter()
            .map(|h| HostRow {
                ip: h.ip_str.clone(),
                port: h.port,
                hostnames: h.hostnames.join(", "),
            })
            .collect();
        writeln!(out, "{}", Table::new(&rows).with(Style::rounded()))
    }
}
