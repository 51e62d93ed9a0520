use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A property listing normalized from the provider's search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Unique home identifier, stable across listings of the same property.
    pub property_id: String,
    /// Canonical listing page URL.
    pub property_url: String,
    pub listing_id: Option<String>,
    pub permalink: Option<String>,

    /// MLS source code (e.g., `"SDCA"`), absent for non-MLS listings.
    pub mls: Option<String>,
    pub mls_id: Option<String>,
    /// Upper-case status: `PENDING`, `CONTINGENT`, or the provider status.
    pub status: Option<String>,
    pub mls_status: Option<String>,
    pub address: Option<Address>,

    pub list_price: Option<i64>,
    pub list_price_min: Option<i64>,
    pub list_price_max: Option<i64>,
    pub list_date: Option<NaiveDate>,
    /// Date the listing went into the pending state.
    pub pending_date: Option<NaiveDate>,
    pub last_sold_date: Option<NaiveDate>,
    pub last_sold_price: Option<i64>,
    pub price_per_sqft: Option<i64>,
    pub new_construction: bool,
    pub hoa_fee: Option<i64>,
    pub days_on_mls: Option<i64>,
    pub description: Option<Description>,
    pub tags: Option<Vec<String>>,
    /// Feature groups such as "Interior Features" with their bullet text.
    pub details: Option<Vec<HomeDetail>>,
    pub photos: Option<Vec<Photo>>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Comma-joined neighborhood names.
    pub neighborhoods: Option<String>,
    pub county: Option<String>,
    pub fips_code: Option<String>,

    /// School district names; populated only when extra details were fetched.
    pub nearby_schools: Option<Vec<String>>,
    pub assessed_value: Option<i64>,
    pub estimated_value: Option<i64>,
    pub tax: Option<i64>,
    pub tax_history: Option<Vec<TaxHistoryEntry>>,

    pub tax_record: Option<TaxRecord>,
    /// Automated valuations, one per vendor.
    pub current_estimates: Option<Vec<PropertyEstimate>>,

    // Bulk-detail fields below are present only on enriched records.
    pub parcel_info: Option<ParcelInfo>,
    pub popularity: Option<Popularity>,
    pub property_history: Option<Vec<HistoryEvent>>,
    /// Rental listings only.
    pub monthly_fees: Option<Vec<Fee>>,
    pub one_time_fees: Option<Vec<Fee>>,
    pub parking: Option<Parking>,
    pub terms: Option<Vec<HomeDetail>>,

    pub advertisers: Option<Advertisers>,
    pub flags: Option<HomeFlags>,
}

impl Property {
    /// `true` when the provider flags the listing as contingent.
    #[must_use]
    pub fn is_contingent(&self) -> bool {
        self.flags
            .as_ref()
            .and_then(|f| f.is_contingent)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub full_line: Option<String>,
    pub street: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    /// Two-letter state code.
    pub state: Option<String>,
    pub zip: Option<String>,
    pub street_direction: Option<String>,
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub street_suffix: Option<String>,
}

impl Address {
    /// `"<line>, <city>, <state>, <zip>"`, skipping missing parts.
    #[must_use]
    pub fn formatted(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(line) = self.full_line.as_deref().filter(|s| !s.is_empty()) {
            parts.push(line.to_owned());
        }
        let city_state_zip: Vec<&str> = [&self.city, &self.state, &self.zip]
            .into_iter()
            .filter_map(|p| p.as_deref().filter(|s| !s.is_empty()))
            .collect();
        if !city_state_zip.is_empty() {
            parts.push(city_state_zip.join(", "));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub primary_photo: Option<String>,
    pub alt_photos: Option<Vec<String>>,
    /// Upper-cased provider type, e.g. `"SINGLE_FAMILY"`.
    pub style: Option<String>,
    pub beds: Option<i64>,
    pub baths_full: Option<i64>,
    pub baths_half: Option<i64>,
    pub sqft: Option<i64>,
    pub lot_sqft: Option<i64>,
    pub sold_price: Option<i64>,
    pub year_built: Option<i64>,
    pub garage: Option<f64>,
    pub stories: Option<i64>,
    pub text: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeFlags {
    pub is_pending: Option<bool>,
    pub is_contingent: Option<bool>,
    pub is_new_construction: Option<bool>,
    pub is_coming_soon: Option<bool>,
    pub is_new_listing: Option<bool>,
    pub is_price_reduced: Option<bool>,
    pub is_foreclosure: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxHistoryEntry {
    pub year: i64,
    pub tax: Option<i64>,
    pub assessment: Option<Assessment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub building: Option<i64>,
    pub land: Option<i64>,
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisers {
    pub agent: Option<Agent>,
    pub broker: Option<Entity>,
    pub builder: Option<Entity>,
    pub office: Option<Office>,
}

/// Named party identified by the provider's fulfillment id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub uuid: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub nrds_id: Option<String>,
    pub mls_set: Option<String>,
    pub state_license: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mls_set: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeDetail {
    pub category: Option<String>,
    pub parent_category: Option<String>,
    pub text: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub href: String,
    pub title: Option<String>,
    /// Provider image labels, e.g. `"kitchen"`.
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRecord {
    pub cl_id: Option<String>,
    pub public_record_id: Option<String>,
    pub last_update_date: Option<DateTime<Utc>>,
    pub apn: Option<String>,
    pub tax_parcel_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateSource {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEstimate {
    pub estimate: Option<i64>,
    pub estimate_high: Option<i64>,
    pub estimate_low: Option<i64>,
    pub date: Option<NaiveDate>,
    pub is_best_home_value: Option<bool>,
    pub source: Option<EstimateSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelInfo {
    pub parcel_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Popularity {
    pub periods: Vec<PopularityPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopularityPeriod {
    pub last_n_days: Option<i64>,
    pub clicks_total: Option<i64>,
    pub views_total: Option<i64>,
    pub dwell_time_mean: Option<f64>,
    pub dwell_time_median: Option<f64>,
    pub leads_total: Option<i64>,
    pub shares_total: Option<i64>,
    pub saves_total: Option<i64>,
}

/// One entry of the listing and sale history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub date: Option<NaiveDate>,
    pub event_name: Option<String>,
    pub price: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub description: Option<String>,
    pub display_amount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parking {
    pub description: Option<String>,
    pub assigned_spaces_available: Option<i64>,
    pub assigned_space_rent: Option<i64>,
    pub unassigned_space_rent: Option<i64>,
}
