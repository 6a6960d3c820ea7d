//! `scout org` - Organization account.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use scout_core::{Member, Organization};
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::OrgCommands;
use crate::output::{Outputs, Short};
use crate::progress::with_progress;

pub const DETAILS: Outputs = Outputs::ANY;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: &'static str,
}

pub async fn execute(ctx: Context, command: OrgCommands) -> Result<()> {
    match command {
        OrgCommands::Details => details(ctx).await,
    }
}

async fn details(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    let org = with_progress(ctx.progress, Some("Fetching organization"), |_| async move {
        Ok(client.org().details().await?)
    })
    .await?;

    ctx.printer.print_data(&org)?;
    Ok(())
}

fn rows<'a>(members: &'a [Member], role: &'static str) -> impl Iterator<Item = MemberRow> + 'a {
    members.iter().map(move |m| MemberRow {
        username: m.username.clone(),
        email: m.email.clone().unwrap_or_default(),
        role,
    })
}

impl Short for Organization {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        let name = self.name.as_deref().unwrap_or("(unnamed)");
        writeln!(out, "{} {}", "Organization:".bold(), name.cyan().bold())?;
        if let Some(id) = &self.id {
            writeln!(out, "  {} {}", "ID:".bold(), id)?;
        }
        if let Some(created) = &self.created {
            writeln!(out, "  {} {}", "Created:".bold(), created)?;
        }
        if let Some(upgrade) = &self.upgrade_type {
            writeln!(out, "  {} {}", "Plan:".bold(), upgrade)?;
        }
        if !self.domains.is_empty() {
            writeln!(out, "  {} {}", "Domains:".bold(), self.domains.join(", "))?;
        }

        writeln!(out)?;
        writeln!(out, "{}", format!("Members ({}):", self.headcount()).bold().underline())?;
        let members: Vec<MemberRow> = rows(&self.admins, "admin").chain(rows(&self.members, "member")).collect();
        if members.is_empty() {
            writeln!(out, "  {}", "none".dimmed())?;
        } else {
            writeln!(out, "{}", Table::new(&members).with(Style::rounded()))?;
        }
        Ok(())
    }
}
