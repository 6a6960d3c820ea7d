//! Organization API endpoints.

use crate::Client;
use scout_core::{Organization, Result};

/// Organization API endpoints (enterprise plans only)
pub struct OrgApi<'a> {
    client: &'a Client,
}

impl<'a> OrgApi<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Name, members and upgrade type of the key's organization
    pub async fn details(&self) -> Result<Organization> {
        self.client.get("/org").await
    }
}
