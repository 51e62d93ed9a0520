use crate::location::LocationKind;

/// Query shape chosen from the resolved location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// One property looked up by its id.
    SingleAddress,
    /// Homes within a radius of an address ("comps").
    RadiusComps,
    /// Homes inside a city, county, state, or postal code.
    Area,
}

impl SearchStrategy {
    /// An address without a radius is a single-property lookup, an address
    /// with a radius is a comps search, and everything else is an area search.
    #[must_use]
    pub fn select(kind: LocationKind, radius_miles: Option<f64>) -> Self {
        match (kind, radius_miles.is_some()) {
            (LocationKind::Address, false) => SearchStrategy::SingleAddress,
            (LocationKind::Address, true) => SearchStrategy::RadiusComps,
            _ => SearchStrategy::Area,
        }
    }

    /// Key under `data` that holds the `{total, results}` container.
    #[must_use]
    pub fn result_key(self) -> &'static str {
        match self {
            SearchStrategy::SingleAddress => "property_search",
            SearchStrategy::RadiusComps | SearchStrategy::Area => "home_search",
        }
    }
}
