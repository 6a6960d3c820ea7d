//! Search API endpoints.

use crate::Client;
use futures_util::stream::{self, Stream};
use scout_core::{Aggregation, Result, SearchPage};

/// Search API endpoints
pub struct SearchApi<'a> {
    client: &'a Client,
}

impl<'a> SearchApi<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Search with a query string (costs query credits past page 1)
    #[must_use]
    pub fn query(&self, query: impl Into<String>) -> SearchRequestBuilder<'a> {
        SearchRequestBuilder {
            client: self.client,
            query: query.into(),
            facets: Vec::new(),
            page: 1,
            minify: false,
        }
    }

    /// Totals and facet buckets for a query; free of charge
    #[must_use]
    pub fn count(&self, query: impl Into<String>) -> CountRequestBuilder<'a> {
        CountRequestBuilder {
            client: self.client,
            query: query.into(),
            facets: Vec::new(),
        }
    }
}

/// Builder for search requests
pub struct SearchRequestBuilder<'a> {
    client: &'a Client,
    query: String,
    facets: Vec<String>,
    page: u32,
    minify: bool,
}

impl<'a> SearchRequestBuilder<'a> {
    #[must_use]
    pub fn facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets.extend(facets.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Fetch the first page
    pub async fn send(self) -> Result<SearchPage> {
        fetch_page(self.client, &self.query, &self.facets, self.page, self.minify).await
    }

    /// Walk pages starting at page 1.
    ///
    /// Yields at most `max_pages` pages and stops early at the first empty page
    /// or once the reported total is covered. An error ends the stream after
    /// being yielded.
    pub fn pages(self, max_pages: u32) -> impl Stream<Item = Result<SearchPage>> + 'a {
        let last = self.page.saturating_add(max_pages.saturating_sub(1));
        let state = Some((self, 0u32));

        stream::unfold(state, move |state| async move {
            let (req, fetched) = state?;
            if fetched >= max_pages {
                return None;
            }
            let page = req.page;
            match fetch_page(req.client, &req.query, &req.facets, page, req.minify).await {
                Ok(results) if results.is_empty() => None,
                Ok(results) => {
                    let covered = u64::from(page) * SearchPage::PAGE_SIZE;
                    let done = covered >= results.total || page >= last;
                    let next = (!done)
                        .then(|| (SearchRequestBuilder { page: page + 1, ..req }, fetched + 1));
                    Some((Ok(results), next))
                }
                Err(err) => Some((Err(err), None)),
            }
        })
    }
}

async fn fetch_page(
    client: &Client,
    query: &str,
    facets: &[String],
    page: u32,
    minify: bool,
) -> Result<SearchPage> {
    let page_str = page.to_string();
    let facets_str = facets.join(",");

    let mut params = vec![("query", query)];
    if page > 1 {
        params.push(("page", &page_str));
    }
    if !facets.is_empty() {
        params.push(("facets", &facets_str));
    }
    if minify {
        params.push(("minify", "true"));
    }

    client.get_with_query("/shodan/host/search", &params).await
}

/// Builder for count requests
pub struct CountRequestBuilder<'a> {
    client: &'a Client,
    query: String,
    facets: Vec<String>,
}

impl CountRequestBuilder<'_> {
    /// Facet to bucket on; `field:N` asks for N buckets
    #[must_use]
    pub fn facet(mut self, facet: impl Into<String>) -> Self {
        self.facets.push(facet.into());
        self
    }

    pub async fn send(self) -> Result<Aggregation> {
        let facets_str = self.facets.join(",");
        let mut params = vec![("query", self.query.as_str())];
        if !self.facets.is_empty() {
            params.push(("facets", &facets_str));
        }

        self.client
            .get_with_query("/shodan/host/count", &params)
            .await
    }
}
