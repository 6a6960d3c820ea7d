use super::{Match, SearchPage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// TLS details attached to a banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ssl {
    pub cert: Certificate,
}

/// An X.509 certificate as the crawlers saw it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub fingerprint: Fingerprint,

    /// Distinguished name parts keyed by attribute (`CN`, `O`, ...)
    #[serde(default)]
    pub subject: BTreeMap<String, String>,

    #[serde(default)]
    pub issuer: BTreeMap<String, String>,

    /// Serials routinely overflow 64 bits, so they stay raw JSON
    #[serde(default)]
    pub serial: Option<serde_json::Value>,

    /// Validity start, `YYYYMMDDhhmmssZ`
    #[serde(default)]
    pub issued: Option<String>,

    #[serde(default)]
    pub expires: Option<String>,

    #[serde(default)]
    pub expired: bool,

    #[serde(default)]
    pub sig_alg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    pub sha256: String,

    #[serde(default)]
    pub sha1: Option<String>,
}

impl Certificate {
    /// Subject common name, falling back to the organization
    #[must_use]
    pub fn common_name(&self) -> Option<&str> {
        self.subject
            .get("CN")
            .or_else(|| self.subject.get("O"))
            .map(String::as_str)
    }

    /// `CN=example.org, O=Example` in attribute order
    #[must_use]
    pub fn issuer_label(&self) -> String {
        self.issuer
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A certificate plus the services presenting it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateReport {
    pub certificate: Certificate,

    /// Services seen with this certificate, across all pages
    pub total: u64,

    /// Services on the first result page
    #[serde(default)]
    pub hosts: Vec<CertificateHost>,
}

/// Where a certificate was served
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateHost {
    pub ip_str: String,

    pub port: u16,

    #[serde(default)]
    pub hostnames: Vec<String>,
}

impl From<&Match> for CertificateHost {
    fn from(m: &Match) -> Self {
        Self {
            ip_str: m.ip_str.clone(),
            port: m.port,
            hostnames: m.hostnames.clone(),
        }
    }
}

impl CertificateReport {
    /// Build a report from a fingerprint search. `None` when no banner on the
    /// page carries the certificate itself.
    #[must_use]
    pub fn from_page(page: &SearchPage) -> Option<Self> {
        let certificate = page
            .matches
            .iter()
            .find_map(|m| m.ssl.as_ref())
            .map(|ssl| ssl.cert.clone())?;
        Some(Self {
            certificate,
            total: page.total,
            hosts: page.matches.iter().map(CertificateHost::from).collect(),
        })
    }
}
