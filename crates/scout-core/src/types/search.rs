use super::{Location, Ssl, Transport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One page of `/shodan/host/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub matches: Vec<Match>,

    /// Total results for the query across all pages
    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub facets: BTreeMap<String, Vec<Bucket>>,
}

impl SearchPage {
    /// Results the API returns per page
    pub const PAGE_SIZE: u64 = 100;

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of pages needed to cover `total`
    #[must_use]
    pub const fn page_count(&self) -> u64 {
        self.total.div_ceil(Self::PAGE_SIZE)
    }
}

/// A single service banner matching a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub ip_str: String,

    pub port: u16,

    #[serde(default)]
    pub transport: Transport,

    #[serde(default)]
    pub hostnames: Vec<String>,

    #[serde(default)]
    pub org: Option<String>,

    #[serde(default)]
    pub product: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(flatten)]
    pub location: Location,

    #[serde(default)]
    pub timestamp: Option<String>,

    /// Present on TLS services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<Ssl>,
}

/// One facet bucket: a value and how many results carry it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    /// Facet values are strings or numbers depending on the field
    pub value: serde_json::Value,

    pub count: u64,
}

impl Bucket {
    /// The value as display text, without JSON quoting
    #[must_use]
    pub fn label(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Result of `/shodan/host/count`: totals plus facet buckets, no matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregation {
    pub total: u64,

    #[serde(default)]
    pub facets: BTreeMap<String, Vec<Bucket>>,
}
