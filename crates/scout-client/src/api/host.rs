//! Host lookup endpoints.

use crate::Client;
use scout_core::{Host, Result};

/// Host lookup endpoints
pub struct HostApi<'a> {
    client: &'a Client,
}

impl<'a> HostApi<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Everything known about `ip`
    ///
    /// ```rust,ignore
    /// let host = client.host().lookup("8.8.8.8").await?;
    /// println!("{:?}", host.ports);
    /// ```
    pub async fn lookup(&self, ip: &str) -> Result<Host> {
        self.client.get(&format!("/shodan/host/{ip}")).await
    }

    /// Lookup with history/minify switches
    #[must_use]
    pub fn with_options(&self, ip: impl Into<String>) -> HostRequestBuilder<'a> {
        HostRequestBuilder {
            client: self.client,
            ip: ip.into(),
            history: false,
            minify: false,
        }
    }
}

/// Builder for host lookups with options
pub struct HostRequestBuilder<'a> {
    client: &'a Client,
    ip: String,
    history: bool,
    minify: bool,
}

impl HostRequestBuilder<'_> {
    /// Include historical banners
    #[must_use]
    pub const fn history(mut self, include: bool) -> Self {
        self.history = include;
        self
    }

    /// Ports and metadata only, no banners
    #[must_use]
    pub const fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub async fn send(self) -> Result<Host> {
        let mut params = Vec::new();
        if self.history {
            params.push(("history", "true"));
        }
        if self.minify {
            params.push(("minify", "true"));
        }

        self.client
            .get_with_query(&format!("/shodan/host/{}", self.ip), &params)
            .await
    }
}
