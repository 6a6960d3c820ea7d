//! Command-line argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

/// Command-line client for security-intelligence lookups.
///
/// Look up hosts, search exposed services, aggregate facets and check your
/// account, with output as JSON, YAML, NDJSON, a short summary or your own
/// template.
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API key (or set SCOUT_API_KEY)
    #[arg(short = 'k', long, env = "SCOUT_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format: json, yaml, ndjson, short or template
    #[arg(short = 'O', long = "output-format", value_name = "FORMAT", global = true)]
    pub output_format: Option<String>,

    /// Template file used by the template output format
    #[arg(long, value_name = "PATH", global = true)]
    pub template: Option<String>,

    /// Do not show a progress spinner
    #[arg(long, global = true)]
    pub no_spinner: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// API base URL
    #[arg(long, env = "SCOUT_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up everything known about an IP address
    View(ViewArgs),

    /// Look up a TLS certificate and the services presenting it
    Certificate(CertificateArgs),

    /// Look up a web property: subdomains and DNS records of a domain
    Domain(DomainArgs),

    /// Search for hosts matching a query
    Search(SearchArgs),

    /// Count matches for a query, broken down by a field
    Aggregate(AggregateArgs),

    /// Show remaining query and scan credits
    Credits,

    /// Organization account
    Org {
        #[command(subcommand)]
        command: OrgCommands,
    },

    /// Generate a shell completion script
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    /// Names from the program down to the invoked subcommand, e.g. `["org", "details"]`.
    pub fn path(&self) -> Vec<&'static str> {
        match self {
            Self::View(_) => vec!["view"],
            Self::Certificate(_) => vec!["certificate"],
            Self::Domain(_) => vec!["domain"],
            Self::Search(_) => vec!["search"],
            Self::Aggregate(_) => vec!["aggregate"],
            Self::Credits => vec!["credits"],
            Self::Org { command } => match command {
                OrgCommands::Details => vec!["org", "details"],
            },
            Self::Completion { .. } => vec!["completion"],
            Self::Config { command } => match command {
                ConfigCommands::Show => vec!["config", "show"],
                ConfigCommands::Set { .. } => vec!["config", "set"],
                ConfigCommands::Path => vec!["config", "path"],
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// IP address to look up
    pub ip: String,

    /// Include historical banners
    #[arg(long)]
    pub history: bool,

    /// Only return ports and general host information
    #[arg(long)]
    pub minify: bool,
}

#[derive(Args, Debug)]
pub struct CertificateArgs {
    /// SHA-256 fingerprint of the certificate, hex encoded
    pub fingerprint: String,
}

#[derive(Args, Debug)]
pub struct DomainArgs {
    /// Domain name (e.g. example.org)
    pub domain: String,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query (e.g. "nginx country:DE port:443")
    pub query: String,

    /// Maximum number of result pages to fetch
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Facets to summarize, comma separated (e.g. "port,country:5")
    #[arg(long, value_delimiter = ',')]
    pub facets: Vec<String>,

    /// Only return general host information
    #[arg(long)]
    pub minify: bool,

    /// Print each match as soon as it arrives, one JSON object per line
    #[arg(long)]
    pub streaming: bool,
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Search query
    pub query: String,

    /// Field to break the results down by (e.g. country, port, org)
    pub field: String,

    /// Number of buckets to return
    #[arg(long, default_value_t = 10)]
    pub buckets: u32,
}

#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// Show organization name, members and monitored domains
    Details,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (api_key, output_format, spinner, show_tips, timeout)
        key: String,
        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_format_is_captured_after_subcommand() {
        let cli = Cli::parse_from(["scout", "credits", "-O", "json"]);
        assert_eq!(cli.output_format.as_deref(), Some("json"));

        let cli = Cli::parse_from(["scout", "credits"]);
        assert_eq!(cli.output_format, None);
    }

    #[test]
    fn test_paths() {
        let cli = Cli::parse_from(["scout", "org", "details"]);
        assert_eq!(cli.command.path(), ["org", "details"]);

        let cli = Cli::parse_from(["scout", "config", "set", "spinner", "false"]);
        assert_eq!(cli.command.path(), ["config", "set"]);
    }

    #[test]
    fn test_lookup_commands() {
        let cli = Cli::parse_from(["scout", "certificate", "ab12", "-O", "yaml"]);
        assert_eq!(cli.command.path(), ["certificate"]);
        assert_eq!(cli.output_format.as_deref(), Some("yaml"));

        let cli = Cli::parse_from(["scout", "domain", "example.org"]);
        let Commands::Domain(args) = cli.command else {
            panic!("expected domain");
        };
        assert_eq!(args.domain, "example.org");
    }

    #[test]
    fn test_search_facets_split_on_commas() {
        let cli = Cli::parse_from(["scout", "search", "nginx", "--facets", "port,country:5", "--pages", "3"]);
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.facets, ["port", "country:5"]);
        assert_eq!(args.pages, 3);
        assert!(!args.streaming);
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["scout", "-vv", "credits"]);
        assert_eq!(cli.verbose, 2);
    }
}
