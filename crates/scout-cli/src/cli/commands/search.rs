//! `scout search` - Search for hosts matching a query.
//!
//! Results are fetched page by page. With `--streaming` every match is written
//! as soon as its page arrives; otherwise all pages are collected and printed
//! once at the end.

use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use futures_util::StreamExt;
use scout_client::Client;
use scout_core::{Bucket, Match, SearchPage};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::SearchArgs;
use crate::exit_code::UsageError;
use crate::output::{OutputFormat, OutputType, Outputs, Short};
use crate::progress::{with_progress, Publisher};
use crate::stream::Emitter;

pub const OUTPUTS: Outputs = Outputs::ANY;

/// Everything collected over all fetched pages.
#[derive(Debug, Default, Serialize)]
pub struct SearchResults {
    pub total: u64,
    pub matches: Vec<Match>,
    pub facets: BTreeMap<String, Vec<Bucket>>,
}

/// The match list alone, so NDJSON output gets one line per match.
#[derive(Serialize)]
#[serde(transparent)]
struct Matches<'a>(&'a [Match]);

impl Short for Matches<'_> {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        write_match_table(out, self.0)
    }
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Organization")]
    org: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Location")]
    location: String,
}

pub async fn execute(ctx: Context, args: SearchArgs) -> Result<()> {
    if args.streaming && ctx.format().output_type() != OutputType::Data {
        return Err(UsageError(format!(
            "--streaming writes one JSON object per line and cannot be combined with --output-format {}",
            ctx.format()
        ))
        .into());
    }

    let client = ctx.client()?;
    let (ctx, mut stream) = ctx.begin_streaming(args.streaming);

    let initial = format!("Searching for {}", args.query);
    let result = with_progress(ctx.progress, Some(initial.as_str()), |progress| {
        fetch(&client, &args, ctx.emitter(), progress)
    })
    .await;
    stream.stop(result.as_ref().err()).await;
    let results = result?;

    if ctx.emitter().is_none() {
        if ctx.format() == OutputFormat::Ndjson {
            ctx.printer.print_data(&Matches(&results.matches))?;
        } else {
            ctx.printer.print_data(&results)?;
        }
    }

    let fetched = results.matches.len() as u64;
    if ctx.emitter().is_none() && results.total > fetched && fetched > 0 {
        ctx.tip(&format!(
            "showing {fetched} of {} results; use --pages to fetch more",
            results.total
        ));
    }
    Ok(())
}

/// Walk the result pages. Matches go to `emitter` when streaming, otherwise
/// they are collected.
async fn fetch(
    client: &Client,
    args: &SearchArgs,
    emitter: Option<&Emitter>,
    progress: Publisher,
) -> Result<SearchResults> {
    let mut results = SearchResults::default();
    let pages = client
        .search()
        .query(args.query.as_str())
        .facets(args.facets.iter().cloned())
        .minify(args.minify)
        .pages(args.pages);
    futures_util::pin_mut!(pages);

    let mut fetched = 0u32;
    while let Some(page) = pages.next().await {
        let page = page?;
        fetched += 1;

        progress
            .message("page", page_status(fetched, args.pages, &page))
            .await;

        results.total = page.total;
        if results.facets.is_empty() {
            results.facets = page.facets;
        }
        match emitter {
            Some(emitter) => {
                for hit in &page.matches {
                    emitter.emit(hit).await;
                }
            }
            None => results.matches.extend(page.matches),
        }
    }

    Ok(results)
}

/// "Page 2/5: 100 matches". The denominator is the pages the query needs,
/// capped at `--pages`, and never below the pages already fetched.
fn page_status(fetched: u32, max_pages: u32, page: &SearchPage) -> String {
    let expected = page
        .page_count()
        .min(u64::from(max_pages))
        .max(u64::from(fetched));
    format!("Page {fetched}/{expected}: {} matches", page.matches.len())
}

fn write_match_table(out: &mut dyn Write, matches: &[Match]) -> io::Result<()> {
    if matches.is_empty() {
        return writeln!(out, "{}", "No matches.".dimmed());
    }
    let rows: Vec<MatchRow> = matches
        .iter()
        .map(|m| MatchRow {
            ip: m.ip_str.clone(),
            port: m.port,
            org: m.org.clone().unwrap_or_default(),
            product: m.product.clone().unwrap_or_default(),
            location: m.location.label(),
        })
        .collect();
    writeln!(out, "{}", Table::new(&rows).with(Style::rounded()))
}

impl Short for SearchResults {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{} {}", "Total results:".bold(), self.total.to_string().cyan())?;
        writeln!(out)?;
        write_match_table(out, &self.matches)?;

        for (facet, buckets) in &self.facets {
            writeln!(out)?;
            writeln!(out, "{}", format!("Top {facet}:").bold())?;
            for bucket in buckets {
                writeln!(out, "  {:<30} {}", bucket.label(), bucket.count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results() -> SearchResults {
        serde_json::from_value::<scout_core::SearchPage>(json!({
            "total": 2,
            "matches": [
                { "ip_str": "192.0.2.1", "port": 80, "org": "Acme", "product": "nginx" },
                { "ip_str": "192.0.2.2", "port": 443 }
            ],
            "facets": { "country": [ { "value": "US", "count": 2 } ] }
        }))
        .map(|page| SearchResults {
            total: page.total,
            matches: page.matches,
            facets: page.facets,
        })
        .unwrap()
    }

    #[test]
    fn test_short_has_table_and_facets() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        results().render_short(&mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("Total results: 2"));
        assert!(out.contains("192.0.2.1"));
        assert!(out.contains("nginx"));
        assert!(out.contains("Top country:"));
        assert!(out.contains("US"));
    }

    #[test]
    fn test_page_status() {
        let page = |total: u64| SearchPage {
            matches: results().matches,
            total,
            facets: BTreeMap::new(),
        };
        assert_eq!(page_status(1, 3, &page(1000)), "Page 1/3: 2 matches");
        assert_eq!(page_status(1, 3, &page(150)), "Page 1/2: 2 matches");
        // total reported as 0 next to real matches
        assert_eq!(page_status(1, 3, &page(0)), "Page 1/1: 2 matches");
        assert_eq!(page_status(2, 3, &page(0)), "Page 2/2: 2 matches");
    }

    #[test]
    fn test_ndjson_prints_one_match_per_line() {
        let results = results();
        let printer = crate::output::Printer::new(OutputFormat::Ndjson, None);
        let mut buf = Vec::new();
        printer.write_data(&mut buf, &Matches(&results.matches)).unwrap();

        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["ip_str"], "192.0.2.1");
    }
}
