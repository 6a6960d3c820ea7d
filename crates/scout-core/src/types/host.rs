use super::{Location, Transport};
use serde::{Deserialize, Serialize};

/// Everything the API knows about one address, from `/shodan/host/{ip}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub ip_str: String,

    #[serde(default)]
    pub hostnames: Vec<String>,

    #[serde(default)]
    pub domains: Vec<String>,

    /// Owning organization
    #[serde(default)]
    pub org: Option<String>,

    /// Autonomous system, e.g. "AS15169"
    #[serde(default)]
    pub asn: Option<String>,

    #[serde(default)]
    pub isp: Option<String>,

    #[serde(default)]
    pub os: Option<String>,

    /// Open ports, sorted as returned
    #[serde(default)]
    pub ports: Vec<u16>,

    /// CVE identifiers
    #[serde(default)]
    pub vulns: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub location: Location,

    /// Per-port service banners (empty when minified)
    #[serde(default, rename = "data")]
    pub services: Vec<Service>,

    #[serde(default)]
    pub last_update: Option<String>,
}

/// One service banner on a host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub port: u16,

    #[serde(default)]
    pub transport: Transport,

    #[serde(default)]
    pub product: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Host {
    /// Returns true if any CVE is attached to the host
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        !self.vulns.is_empty()
    }
}
