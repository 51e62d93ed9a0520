use std::time::Duration;

use homescan_core::app_config::{
    AppConfig, DEFAULT_AUTOCOMPLETE_URL, DEFAULT_SEARCH_URL, DEFAULT_USER_AGENT, MAX_PAGE_SIZE,
};

use crate::retry::RetryPolicy;

/// Per-instance engine settings. Nothing here is process-global: two
/// clients built from different configs never share page size or pools.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub search_url: String,
    pub autocomplete_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Records requested per search page, at most [`MAX_PAGE_SIZE`].
    pub page_size: usize,
    /// Concurrent page fetches; `0` derives a size from available parallelism.
    pub page_workers: usize,
    /// Concurrent bulk-detail calls within one search.
    pub property_workers: usize,
    pub detail_retry: RetryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_owned(),
            autocomplete_url: DEFAULT_AUTOCOMPLETE_URL.to_owned(),
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            page_size: MAX_PAGE_SIZE,
            page_workers: 0,
            property_workers: 20,
            detail_retry: RetryPolicy::default(),
        }
    }
}

impl From<&AppConfig> for EngineConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            search_url: cfg.search_url.clone(),
            autocomplete_url: cfg.autocomplete_url.clone(),
            request_timeout_secs: cfg.request_timeout_secs,
            user_agent: cfg.user_agent.clone(),
            page_size: cfg.page_size,
            page_workers: cfg.page_workers,
            property_workers: cfg.property_workers,
            detail_retry: RetryPolicy {
                max_attempts: cfg.detail_max_attempts,
                min_delay: Duration::from_secs(cfg.detail_backoff_min_secs),
                max_delay: Duration::from_secs(cfg.detail_backoff_max_secs),
            },
        }
    }
}

impl EngineConfig {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Resolved page-fetch concurrency. An explicit value wins; otherwise
    /// available parallelism + 4, capped at 32.
    #[must_use]
    pub fn effective_page_workers(&self) -> usize {
        if self.page_workers > 0 {
            return self.page_workers;
        }
        let cpus = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        (cpus + 4).min(32)
    }

    #[must_use]
    pub fn effective_property_workers(&self) -> usize {
        self.property_workers.max(1)
    }
}
