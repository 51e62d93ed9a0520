//! Query builder: turns a strategy, a location, and caller filters into the
//! request sent for one page.

use std::collections::BTreeSet;

use homescan_core::{ListingType, SearchPropertyType};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::dates::DateSpec;
use crate::location::LocationDescriptor;
use crate::strategy::SearchStrategy;
use crate::templates;

/// Provider relevance bucket used for area searches.
const AREA_BUCKET_SORT: &str = "fractal_v1.1.3_fr";

/// Caller filters, fixed for the duration of one search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchFilters {
    pub listing_type: ListingType,
    pub date: DateSpec,
    pub property_types: BTreeSet<SearchPropertyType>,
    /// `Some(true)` only foreclosures, `Some(false)` none, `None` no clause.
    pub foreclosure: Option<bool>,
    pub radius_miles: Option<f64>,
}

/// A location that cannot be expressed in the chosen query shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("address match for \"{0}\" has no property id")]
    MissingPropertyId(String),

    #[error("address match for \"{0}\" has no centroid for a radius search")]
    MissingCentroid(String),

    #[error("radius search requested without a radius")]
    MissingRadius,
}

/// The fully assembled request for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub query_text: &'static str,
    pub variables: Map<String, Value>,
}

impl QueryPlan {
    /// Same plan with only `offset` changed.
    #[must_use]
    pub fn at_offset(&self, offset: usize) -> Self {
        let mut variables = self.variables.clone();
        variables.insert("offset".to_owned(), json!(offset));
        Self {
            query_text: self.query_text,
            variables,
        }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.variables
            .get("offset")
            .and_then(Value::as_u64)
            .and_then(|o| usize::try_from(o).ok())
            .unwrap_or(0)
    }

    /// JSON body posted to the GraphQL endpoint.
    #[must_use]
    pub fn payload(&self) -> Value {
        json!({
            "query": self.query_text,
            "variables": Value::Object(self.variables.clone()),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    page_size: usize,
}

impl QueryBuilder {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    /// Builds the plan for the page starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the location lacks what the strategy
    /// needs: a property id for single-address lookups, or a centroid and
    /// radius for comps.
    pub fn build(
        &self,
        strategy: SearchStrategy,
        location: &LocationDescriptor,
        filters: &SearchFilters,
        offset: usize,
    ) -> Result<QueryPlan, QueryError> {
        let mut variables = Map::new();
        variables.insert("offset".to_owned(), json!(offset));

        let query_text = match strategy {
            SearchStrategy::SingleAddress => {
                let id = location
                    .primary_id
                    .as_deref()
                    .ok_or_else(|| QueryError::MissingPropertyId(location.raw_text.clone()))?;
                variables.insert("query".to_owned(), json!({ "property_id": [id] }));
                variables.insert("limit".to_owned(), json!(1));
                templates::PROPERTY_SEARCH
            }
            SearchStrategy::RadiusComps => {
                let centroid = location
                    .centroid
                    .ok_or_else(|| QueryError::MissingCentroid(location.raw_text.clone()))?;
                let radius = filters.radius_miles.ok_or(QueryError::MissingRadius)?;
                let mut criteria = filter_criteria(filters);
                criteria.insert(
                    "nearby".to_owned(),
                    json!({
                        "coordinates": [centroid.lon, centroid.lat],
                        "radius": format!("{radius}mi"),
                    }),
                );
                variables.insert("query".to_owned(), Value::Object(criteria));
                variables.insert("limit".to_owned(), json!(self.page_size));
                insert_sort(&mut variables, filters.listing_type);
                templates::COMPS_SEARCH
            }
            SearchStrategy::Area => {
                let mut criteria = filter_criteria(filters);
                insert_area(&mut criteria, location);
                variables.insert("query".to_owned(), Value::Object(criteria));
                variables.insert("limit".to_owned(), json!(self.page_size));
                variables.insert("bucket".to_owned(), json!({ "sort": AREA_BUCKET_SORT }));
                insert_sort(&mut variables, filters.listing_type);
                templates::AREA_SEARCH
            }
        };

        Ok(QueryPlan {
            query_text,
            variables,
        })
    }
}

/// Criteria shared by comps and area searches: status, date, type,
/// foreclosure.
fn filter_criteria(filters: &SearchFilters) -> Map<String, Value> {
    let mut criteria = Map::new();

    // Pending is modelled by the provider as for-sale listings that are
    // contingent or pending.
    let status = match filters.listing_type {
        ListingType::Pending => ListingType::ForSale,
        other => other,
    };
    criteria.insert("status".to_owned(), json!([status.status_value()]));
    if filters.listing_type == ListingType::Pending {
        criteria.insert(
            "or_filters".to_owned(),
            json!({ "contingent": true, "pending": true }),
        );
    }

    // The provider's pending/contract date criteria are ignored server-side;
    // pending searches are date-filtered after the fetch instead.
    let date_field = match filters.listing_type {
        ListingType::Sold => Some("sold_date"),
        ListingType::Pending => None,
        ListingType::ForSale | ListingType::ForRent => Some("list_date"),
    };
    if let (Some(field), Some(bound)) = (date_field, filters.date.server_bound()) {
        criteria.insert(field.to_owned(), bound);
    }

    if !filters.property_types.is_empty() {
        let types: Vec<&str> = filters
            .property_types
            .iter()
            .map(|t| t.as_str())
            .collect();
        criteria.insert("type".to_owned(), json!(types));
    }

    if let Some(foreclosure) = filters.foreclosure {
        criteria.insert("foreclosure".to_owned(), json!(foreclosure));
    }

    criteria
}

fn insert_area(criteria: &mut Map<String, Value>, location: &LocationDescriptor) {
    use crate::location::LocationKind;

    if location.kind == LocationKind::PostalCode {
        if let Some(zip) = &location.postal_code {
            criteria.insert("postal_code".to_owned(), json!(zip));
        }
        return;
    }
    if let Some(city) = &location.city {
        criteria.insert("city".to_owned(), json!(city));
    }
    if let Some(county) = &location.county {
        criteria.insert("county".to_owned(), json!([county]));
    }
    if let Some(state) = &location.state_code {
        criteria.insert("state_code".to_owned(), json!(state));
    }
    if let Some(zip) = &location.postal_code {
        criteria.insert("postal_code".to_owned(), json!(zip));
    }
}

/// Sold searches are ordered newest sale first; everything else keeps the
/// provider's relevance order.
fn insert_sort(variables: &mut Map<String, Value>, listing_type: ListingType) {
    if listing_type == ListingType::Sold {
        variables.insert(
            "sort".to_owned(),
            json!([{ "field": "sold_date", "direction": "desc" }]),
        );
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
