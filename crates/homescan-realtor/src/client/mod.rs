//! HTTP client for the realtor.com autocomplete and GraphQL search endpoints.
//!
//! Wraps `reqwest` with provider-specific status handling and JSON decoding.
//! Higher-level operations live next to the concern they serve:
//! [`crate::location`] resolves free text, [`fetch_all`] drives pagination,
//! [`crate::enrich`] issues bulk-detail calls, and [`crate::search`] ties the
//! pipeline together.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::RealtorError;
use crate::query::{QueryBuilder, QueryPlan};
use crate::strategy::SearchStrategy;

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// Total matches reported by the provider. Only the first page's value
    /// is used to plan further pages.
    pub total_available: usize,
    /// Records in provider order, never more than the configured page size.
    pub raw_records: Vec<Value>,
}

/// Client for the realtor.com search API.
///
/// Every setting comes from the [`EngineConfig`] it was built with; two
/// clients never share page size, worker ceilings or endpoints. Point the
/// config URLs at a mock server to test against wiremock.
#[derive(Debug)]
pub struct RealtorClient {
    client: Client,
    config: EngineConfig,
    search_url: Url,
    autocomplete_url: Url,
}

impl RealtorClient {
    /// Creates a client with the configured timeout, `User-Agent`, and
    /// endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`RealtorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RealtorError::InvalidBaseUrl`] if either
    /// endpoint is not a valid URL.
    pub fn new(config: EngineConfig) -> Result<Self, RealtorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let search_url = parse_url(&config.search_url)?;
        let autocomplete_url = parse_url(&config.autocomplete_url)?;

        Ok(Self {
            client,
            config,
            search_url,
            autocomplete_url,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Query builder sized to this client's page size.
    #[must_use]
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(self.config.effective_page_size())
    }

    /// Fetches one page and unwraps the strategy's result container.
    ///
    /// A response without `data.<key>.results` is an empty page with a total
    /// of zero, not an error.
    ///
    /// # Errors
    ///
    /// - [`RealtorError::Http`] on network failure.
    /// - [`RealtorError::UnexpectedStatus`] on a non-2xx response.
    /// - [`RealtorError::Deserialize`] if the body is not JSON.
    pub async fn fetch_page(
        &self,
        plan: &QueryPlan,
        strategy: SearchStrategy,
    ) -> Result<PageResult, RealtorError> {
        let offset = plan.offset();
        let context = format!("{} page at offset {offset}", strategy.result_key());
        let body = self.post_graphql(&plan.payload(), &context).await?;
        let page = extract_page(&body, strategy, self.config.effective_page_size());
        tracing::debug!(
            offset,
            total = page.total_available,
            records = page.raw_records.len(),
            "fetched search page"
        );
        Ok(page)
    }

    /// Autocomplete URL with percent-encoded query parameters.
    pub(crate) fn autocomplete_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.autocomplete_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx status, and parses the body as JSON.
    pub(crate) async fn get_json(&self, url: Url, context: &str) -> Result<Value, RealtorError> {
        let response = self.client.get(url).send().await?;
        Self::decode(response, context).await
    }

    /// Posts a GraphQL payload to the search endpoint.
    pub(crate) async fn post_graphql(
        &self,
        payload: &Value,
        context: &str,
    ) -> Result<Value, RealtorError> {
        let response = self
            .client
            .post(self.search_url.clone())
            .json(payload)
            .send()
            .await?;
        Self::decode(response, context).await
    }

    async fn decode(response: reqwest::Response, context: &str) -> Result<Value, RealtorError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RealtorError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RealtorError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, RealtorError> {
    Url::parse(raw).map_err(|e| RealtorError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// Reads `data.<result_key>` into a [`PageResult`], truncating to `page_size`.
fn extract_page(body: &Value, strategy: SearchStrategy, page_size: usize) -> PageResult {
    let Some(container) = body
        .get("data")
        .and_then(|d| d.get(strategy.result_key()))
        .filter(|c| !c.is_null())
    else {
        return PageResult::default();
    };
    let Some(results) = container.get("results").and_then(Value::as_array) else {
        return PageResult::default();
    };

    let total_available = container
        .get("total")
        .and_then(Value::as_u64)
        .and_then(|t| usize::try_from(t).ok())
        .unwrap_or(0);
    let raw_records = results.iter().take(page_size).cloned().collect();

    PageResult {
        total_available,
        raw_records,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
