//! Listing categories and searchable property types.
//!
//! Both enums parse leniently from user input (`for_sale`, `FOR-SALE`,
//! `For Sale` all resolve to [`ListingType::ForSale`]) and render in the
//! lower snake case the provider expects in search criteria.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Listing category a search is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingType {
    #[default]
    ForSale,
    ForRent,
    Sold,
    Pending,
}

impl ListingType {
    pub const ALL: [ListingType; 4] = [
        ListingType::ForSale,
        ListingType::ForRent,
        ListingType::Sold,
        ListingType::Pending,
    ];

    /// Canonical upper-case value, e.g. `"FOR_SALE"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListingType::ForSale => "FOR_SALE",
            ListingType::ForRent => "FOR_RENT",
            ListingType::Sold => "SOLD",
            ListingType::Pending => "PENDING",
        }
    }

    /// Provider status value used in search criteria, e.g. `"for_sale"`.
    #[must_use]
    pub fn status_value(self) -> &'static str {
        match self {
            ListingType::ForSale => "for_sale",
            ListingType::ForRent => "for_rent",
            ListingType::Sold => "sold",
            ListingType::Pending => "pending",
        }
    }

    /// Autocomplete client identifier: lower-cased with `_` replaced by `-`.
    #[must_use]
    pub fn client_id(self) -> String {
        self.as_str().to_lowercase().replace('_', "-")
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_value())
    }
}

impl FromStr for ListingType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = canonical_key(s);
        ListingType::ALL
            .into_iter()
            .find(|lt| lt.status_value() == key)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "listing type",
                value: s.to_owned(),
                expected: ListingType::ALL.map(ListingType::status_value).join(", "),
            })
    }
}

/// Property types accepted by the provider's `type` search criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPropertyType {
    SingleFamily,
    Apartment,
    Condos,
    CondoTownhomeRowhomeCoop,
    CondoTownhome,
    Townhomes,
    DuplexTriplex,
    Farm,
    Land,
    MultiFamily,
    Mobile,
}

impl SearchPropertyType {
    pub const ALL: [SearchPropertyType; 11] = [
        SearchPropertyType::SingleFamily,
        SearchPropertyType::Apartment,
        SearchPropertyType::Condos,
        SearchPropertyType::CondoTownhomeRowhomeCoop,
        SearchPropertyType::CondoTownhome,
        SearchPropertyType::Townhomes,
        SearchPropertyType::DuplexTriplex,
        SearchPropertyType::Farm,
        SearchPropertyType::Land,
        SearchPropertyType::MultiFamily,
        SearchPropertyType::Mobile,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchPropertyType::SingleFamily => "single_family",
            SearchPropertyType::Apartment => "apartment",
            SearchPropertyType::Condos => "condos",
            SearchPropertyType::CondoTownhomeRowhomeCoop => "condo_townhome_rowhome_coop",
            SearchPropertyType::CondoTownhome => "condo_townhome",
            SearchPropertyType::Townhomes => "townhomes",
            SearchPropertyType::DuplexTriplex => "duplex_triplex",
            SearchPropertyType::Farm => "farm",
            SearchPropertyType::Land => "land",
            SearchPropertyType::MultiFamily => "multi_family",
            SearchPropertyType::Mobile => "mobile",
        }
    }
}

impl fmt::Display for SearchPropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchPropertyType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = canonical_key(s);
        SearchPropertyType::ALL
            .into_iter()
            .find(|pt| pt.as_str() == key)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "property type",
                value: s.to_owned(),
                expected: SearchPropertyType::ALL
                    .map(SearchPropertyType::as_str)
                    .join(", "),
            })
    }
}

/// Lower-cases and folds `-` and spaces into `_`.
fn canonical_key(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_type_parses_common_spellings() {
        assert_eq!("for_sale".parse::<ListingType>(), Ok(ListingType::ForSale));
        assert_eq!("FOR_RENT".parse::<ListingType>(), Ok(ListingType::ForRent));
        assert_eq!("for-sale".parse::<ListingType>(), Ok(ListingType::ForSale));
        assert_eq!(" Pending ".parse::<ListingType>(), Ok(ListingType::Pending));
    }

    #[test]
    fn listing_type_rejects_unknown_value() {
        let err = "off_market".parse::<ListingType>().unwrap_err();
        assert!(
            matches!(err, CoreError::UnknownVariant { kind: "listing type", ref value, .. } if value == "off_market")
        );
    }

    #[test]
    fn client_id_is_lowercase_hyphenated() {
        assert_eq!(ListingType::ForSale.client_id(), "for-sale");
        assert_eq!(ListingType::Sold.client_id(), "sold");
    }

    #[test]
    fn listing_type_serializes_upper_snake() {
        let json = serde_json::to_string(&ListingType::ForRent).unwrap();
        assert_eq!(json, "\"FOR_RENT\"");
    }

    #[test]
    fn property_type_round_trips_through_display() {
        for pt in SearchPropertyType::ALL {
            assert_eq!(pt.to_string().parse::<SearchPropertyType>(), Ok(pt));
        }
    }

    #[test]
    fn property_type_accepts_hyphenated_input() {
        assert_eq!(
            "multi-family".parse::<SearchPropertyType>(),
            Ok(SearchPropertyType::MultiFamily)
        );
    }
}
