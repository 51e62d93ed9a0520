//! `search()`: the single entry point adapters call.

use std::collections::BTreeSet;

use chrono::Local;
use homescan_core::{ListingType, Property, SearchPropertyType};
use serde_json::Value;

use crate::client::RealtorClient;
use crate::dates::DateSpec;
use crate::error::RealtorError;
use crate::normalize::{normalize, NormalizeOptions};
use crate::pending::{filter_pending, PendingCandidate};
use crate::query::SearchFilters;
use crate::strategy::SearchStrategy;

/// Default cap on records returned by one search.
pub const DEFAULT_LIMIT: usize = 10_000;

/// Everything a caller can ask of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free text: an address, postal code, city, county, state, ...
    pub location: String,
    pub listing_type: ListingType,
    pub date: DateSpec,
    pub property_types: BTreeSet<SearchPropertyType>,
    /// Turns an address search into a comps search.
    pub radius_miles: Option<f64>,
    pub foreclosure: Option<bool>,
    /// Fetch bulk details (schools, tax history) for every result.
    pub extra_property_data: bool,
    pub mls_only: bool,
    pub exclude_pending: bool,
    pub limit: usize,
}

impl SearchRequest {
    #[must_use]
    pub fn new(location: impl Into<String>, listing_type: ListingType) -> Self {
        Self {
            location: location.into(),
            listing_type,
            date: DateSpec::None,
            property_types: BTreeSet::new(),
            radius_miles: None,
            foreclosure: None,
            extra_property_data: false,
            mls_only: false,
            exclude_pending: false,
            limit: DEFAULT_LIMIT,
        }
    }

    /// # Errors
    ///
    /// Returns [`RealtorError::InvalidRequest`] for a blank location or a
    /// radius that is not a positive finite number.
    pub fn validate(&self) -> Result<(), RealtorError> {
        if self.location.trim().is_empty() {
            return Err(RealtorError::InvalidRequest(
                "location must not be empty".to_owned(),
            ));
        }
        if let Some(radius) = self.radius_miles {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(RealtorError::InvalidRequest(format!(
                    "radius must be a positive number of miles, got {radius}"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            listing_type: self.listing_type,
            date: self.date,
            property_types: self.property_types.clone(),
            foreclosure: self.foreclosure,
            radius_miles: self.radius_miles,
        }
    }

    fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            extra_property_data: self.extra_property_data,
            mls_only: self.mls_only,
            exclude_pending: self.exclude_pending,
            ..NormalizeOptions::new(self.listing_type)
        }
    }
}

impl RealtorClient {
    /// Runs a search and returns raw provider records (merged with bulk
    /// details when requested).
    ///
    /// Records from the first page come first; later pages follow in the
    /// order they completed, not offset order.
    ///
    /// # Errors
    ///
    /// - [`RealtorError::InvalidRequest`] if the request fails validation.
    /// - Any transport, status, or decode error from location resolution,
    ///   a page fetch, or a bulk-detail call. No partial results are returned.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Value>, RealtorError> {
        self.run_search(request, Some).await
    }

    /// Like [`Self::search`], but normalizes each record into a [`Property`]
    /// and drops records normalization rejects.
    ///
    /// # Errors
    ///
    /// Same as [`Self::search`].
    pub async fn search_properties(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Property>, RealtorError> {
        let opts = request.normalize_options();
        self.run_search(request, |raw| normalize(&raw, &opts)).await
    }

    async fn run_search<T, F>(&self, request: &SearchRequest, map: F) -> Result<Vec<T>, RealtorError>
    where
        T: PendingCandidate,
        F: Fn(Value) -> Option<T>,
    {
        request.validate()?;
        if request.limit == 0 {
            return Ok(Vec::new());
        }

        let Some(location) = self
            .resolve_location(&request.location, request.listing_type)
            .await?
        else {
            return Ok(Vec::new());
        };

        let strategy = SearchStrategy::select(location.kind, request.radius_miles);
        let filters = request.filters();
        let plan = match self.query_builder().build(strategy, &location, &filters, 0) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(location = %request.location, error = %e, "cannot build search query");
                return Ok(Vec::new());
            }
        };

        let mut records = self
            .fetch_all(
                &plan,
                strategy,
                request.limit,
                request.extra_property_data,
                map,
            )
            .await?;

        // Pending searches carry no server-side date clause.
        if request.listing_type == ListingType::Pending {
            if let Some(window) = request.date.window(Local::now().naive_local()) {
                records = filter_pending(records, &window);
            }
        }
        records.truncate(request.limit);

        tracing::info!(
            location = %request.location,
            listing_type = %request.listing_type,
            strategy = ?strategy,
            records = records.len(),
            "search complete"
        );
        Ok(records)
    }
}
