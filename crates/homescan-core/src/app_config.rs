/// Default realtor.com search GraphQL endpoint.
pub const DEFAULT_SEARCH_URL: &str =
    "https://www.realtor.com/api/v1/rdc_search_srp?client_id=rdc-search-new-communities&schema=vesta";

/// Default location autocomplete endpoint.
pub const DEFAULT_AUTOCOMPLETE_URL: &str = "https://parser-external.geo.moveaws.com/suggest";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Largest page the provider serves for a single search request.
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub search_url: String,
    pub autocomplete_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub page_size: usize,
    /// Concurrent page fetches per search; `0` selects a size from the host's parallelism.
    pub page_workers: usize,
    /// Concurrent enrichment calls per search.
    pub property_workers: usize,
    pub detail_max_attempts: u32,
    pub detail_backoff_min_secs: u64,
    pub detail_backoff_max_secs: u64,
}
