//! Certificate lookups.

use crate::Client;
use scout_core::{ApiError, CertificateReport, Result};

/// Certificate lookups, answered from the banner index
pub struct CertificateApi<'a> {
    client: &'a Client,
}

impl<'a> CertificateApi<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// The certificate with this SHA-256 fingerprint and where it is served
    ///
    /// Costs no query credits: only the first result page is fetched.
    pub async fn lookup(&self, sha256: &str) -> Result<CertificateReport> {
        let fingerprint = sha256.trim().to_ascii_lowercase();
        let page = self
            .client
            .search()
            .query(format!("ssl.cert.fingerprint:{fingerprint}"))
            .send()
            .await?;

        CertificateReport::from_page(&page).ok_or_else(|| ApiError::NotFound {
            resource: format!("certificate {fingerprint}"),
        })
    }
}
