//! Account API endpoints.

use crate::Client;
use scout_core::{Credits, Result};

/// Account API endpoints
pub struct AccountApi<'a> {
    client: &'a Client,
}

impl<'a> AccountApi<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Plan name and remaining query/scan credits
    pub async fn credits(&self) -> Result<Credits> {
        self.client.get("/api-info").await
    }
}
