//! DNS endpoints.

use crate::Client;
use scout_core::{Domain, Result};

/// DNS endpoints
pub struct DnsApi<'a> {
    client: &'a Client,
}

impl<'a> DnsApi<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Subdomains and records of `domain`
    pub async fn domain(&self, domain: &str) -> Result<Domain> {
        self.client.get(&format!("/dns/domain/{domain}")).await
    }
}
