//! Free-text location resolution through the provider's autocomplete service.

use homescan_core::ListingType;
use serde_json::Value;

use crate::client::RealtorClient;
use crate::error::RealtorError;

/// Area types the autocomplete service may answer with.
pub const AREA_TYPES: &str =
    "city,state,county,postal_code,address,street,neighborhood,school,school_district,university,park";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Address,
    PostalCode,
    Area,
}

impl LocationKind {
    #[must_use]
    pub fn from_area_type(area_type: &str) -> Self {
        match area_type {
            "address" => LocationKind::Address,
            "postal_code" => LocationKind::PostalCode,
            _ => LocationKind::Area,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved location. Built once per search and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDescriptor {
    pub kind: LocationKind,
    pub raw_text: String,
    /// Provider area type as returned, e.g. `"city"` or `"neighborhood"`.
    pub area_type: String,
    pub centroid: Option<Coordinates>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub state_code: Option<String>,
    /// Property id (`mpr_id`) for address matches.
    pub primary_id: Option<String>,
}

impl LocationDescriptor {
    /// Builds a descriptor from one autocomplete suggestion.
    #[must_use]
    pub fn from_suggestion(raw_text: &str, suggestion: &Value) -> Self {
        let area_type = text(suggestion, "area_type").unwrap_or_default();
        let centroid = suggestion.get("centroid").and_then(|c| {
            Some(Coordinates {
                lat: c.get("lat")?.as_f64()?,
                lon: c.get("lon")?.as_f64()?,
            })
        });
        Self {
            kind: LocationKind::from_area_type(&area_type),
            raw_text: raw_text.to_owned(),
            area_type,
            centroid,
            postal_code: text(suggestion, "postal_code"),
            city: text(suggestion, "city"),
            county: text(suggestion, "county"),
            state_code: text(suggestion, "state_code"),
            primary_id: text(suggestion, "mpr_id"),
        }
    }
}

/// String or number field rendered as a string; empty strings are absent.
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RealtorClient {
    /// Resolves free text into a [`LocationDescriptor`].
    ///
    /// Requests a single suggestion. `Ok(None)` means the service had no
    /// match, which callers treat as an empty search rather than an error.
    ///
    /// # Errors
    ///
    /// - [`RealtorError::Http`] on network failure.
    /// - [`RealtorError::UnexpectedStatus`] on a non-2xx response.
    /// - [`RealtorError::Deserialize`] if the body is not JSON.
    pub async fn resolve_location(
        &self,
        location: &str,
        listing_type: ListingType,
    ) -> Result<Option<LocationDescriptor>, RealtorError> {
        let client_id = listing_type.client_id();
        let url = self.autocomplete_url(&[
            ("input", location),
            ("client_id", &client_id),
            ("limit", "1"),
            ("area_types", AREA_TYPES),
        ]);
        let body = self.get_json(url, "location autocomplete").await?;

        let suggestion = body
            .get("autocomplete")
            .and_then(Value::as_array)
            .and_then(|list| list.first());

        let Some(suggestion) = suggestion else {
            tracing::info!(location, "no autocomplete match for location");
            return Ok(None);
        };

        let descriptor = LocationDescriptor::from_suggestion(location, suggestion);
        tracing::debug!(
            location,
            area_type = %descriptor.area_type,
            kind = ?descriptor.kind,
            "resolved location"
        );
        Ok(Some(descriptor))
    }
}
