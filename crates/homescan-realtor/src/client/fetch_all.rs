//! Multi-page fetch for `RealtorClient`.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::error::RealtorError;
use crate::query::QueryPlan;
use crate::strategy::SearchStrategy;

use super::RealtorClient;

impl RealtorClient {
    /// Fetches every page of `plan` up to `limit` records and maps each raw
    /// record through `map`, dropping records it rejects.
    ///
    /// The first page is fetched alone to learn the total. Remaining offsets
    /// (`page_size`, `2 * page_size`, ... below `min(total, limit)`) are
    /// fetched concurrently, at most `page_workers` at a time, and appended
    /// in completion order. Records inside one page keep provider order; the
    /// first page always comes first.
    ///
    /// With `extra_details`, each page is enriched by one bulk-detail call
    /// before mapping. At most `property_workers` bulk calls are in flight
    /// per search.
    ///
    /// **All-or-nothing**: any page or enrichment failure fails the whole
    /// fetch and already-fetched pages are discarded.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`] or the bulk-detail call.
    pub(crate) async fn fetch_all<T, F>(
        &self,
        plan: &QueryPlan,
        strategy: SearchStrategy,
        limit: usize,
        extra_details: bool,
        map: F,
    ) -> Result<Vec<T>, RealtorError>
    where
        F: Fn(Value) -> Option<T>,
    {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let page_size = self.config.effective_page_size();
        let permits = Semaphore::new(self.config.effective_property_workers());
        let ctx = PageContext {
            limit,
            extra_details,
            permits: &permits,
            map: &map,
        };

        let first_plan = plan.at_offset(0);
        let first = self.fetch_page(&first_plan, strategy).await?;
        let total = first.total_available;
        let mut records = self.process_page(first.raw_records, 0, &ctx).await?;

        let end = total.min(limit);
        let offsets: Vec<usize> = (page_size..end).step_by(page_size).collect();
        if offsets.is_empty() {
            return Ok(records);
        }

        let workers = self.config.effective_page_workers();
        tracing::debug!(total, limit, pages = offsets.len() + 1, workers, "fetching remaining pages");

        let pages: Vec<Vec<T>> = stream::iter(offsets)
            .map(|offset| {
                let page_plan = plan.at_offset(offset);
                let ctx = &ctx;
                async move {
                    let page = self.fetch_page(&page_plan, strategy).await?;
                    self.process_page(page.raw_records, offset, ctx).await
                }
            })
            .buffer_unordered(workers)
            .try_collect()
            .await?;

        for page in pages {
            records.extend(page);
        }
        Ok(records)
    }

    /// Truncates a page to the remaining budget, enriches it when asked,
    /// and maps it in provider order.
    async fn process_page<T, F>(
        &self,
        mut raw: Vec<Value>,
        offset: usize,
        ctx: &PageContext<'_, F>,
    ) -> Result<Vec<T>, RealtorError>
    where
        F: Fn(Value) -> Option<T>,
    {
        raw.truncate(ctx.limit.saturating_sub(offset));

        if ctx.extra_details && !raw.is_empty() {
            // The semaphore is owned by this search and never closed.
            let _permit = ctx.permits.acquire().await.ok();
            self.enrich_records(&mut raw).await?;
        }

        Ok(raw.into_iter().filter_map(ctx.map).collect())
    }
}

/// Per-search state shared by every page task.
struct PageContext<'a, F> {
    limit: usize,
    extra_details: bool,
    permits: &'a Semaphore,
    map: &'a F,
}
