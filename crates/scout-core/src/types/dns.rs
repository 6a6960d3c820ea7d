use serde::{Deserialize, Serialize};

/// Subdomains and DNS records of a web property, from `/dns/domain/{domain}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub domain: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub subdomains: Vec<String>,

    #[serde(default, rename = "data")]
    pub records: Vec<DnsRecord>,

    /// More records exist than were returned
    #[serde(default)]
    pub more: bool,
}

/// One DNS record under the domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Label below the domain; empty for the apex
    #[serde(default)]
    pub subdomain: String,

    #[serde(rename = "type")]
    pub record_type: String,

    pub value: String,

    #[serde(default)]
    pub last_seen: Option<String>,
}

impl DnsRecord {
    /// Fully qualified name of the record
    #[must_use]
    pub fn name(&self, domain: &str) -> String {
        if self.subdomain.is_empty() {
            domain.to_string()
        } else {
            format!("{}.{domain}", self.subdomain)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_name() {
        let domain: Domain = serde_json::from_value(serde_json::json!({
            "domain": "example.org",
            "subdomains": ["www"],
            "data": [
                { "subdomain": "", "type": "A", "value": "192.0.2.1" },
                { "subdomain": "www", "type": "CNAME", "value": "example.org" }
            ]
        }))
        .unwrap();

        assert_eq!(domain.records[0].name(&domain.domain), "example.org");
        assert_eq!(domain.records[1].name(&domain.domain), "www.example.org");
        assert_eq!(domain.records[1].record_type, "CNAME");
        assert!(!domain.more);
    }
}
