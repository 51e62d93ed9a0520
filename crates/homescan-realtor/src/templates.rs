//! GraphQL documents sent to the provider.
//!
//! Every document is a compile-time constant. Search criteria, paging, sort
//! and bucket travel as variables, so no caller input is spliced into text.
//! The bulk-detail document is the one exception: its aliases are generated
//! from property ids that [`crate::enrich`] has already restricted to
//! `[A-Za-z0-9_]`.

/// Field selection for one search result.
macro_rules! search_result_fields {
    () => {
        "{
    pending_date
    listing_id
    property_id
    href
    permalink
    list_date
    status
    mls_status
    last_sold_price
    last_sold_date
    list_price
    list_price_max
    list_price_min
    price_per_sqft
    tags
    details { category text parent_category }
    flags { is_contingent is_pending is_new_construction is_coming_soon is_new_listing is_price_reduced is_foreclosure }
    description {
        type sqft beds baths_full baths_half lot_sqft sold_price year_built garage name stories text
    }
    source { id listing_id }
    hoa { fee }
    location {
        address {
            street_direction street_number street_name street_suffix line unit
            city state_code postal_code
            coordinate { lon lat }
        }
        county { name fips_code }
        neighborhoods { name }
    }
    tax_record { cl_id public_record_id last_update_date apn tax_parcel_id }
    primary_photo(https: true) { href }
    photos(https: true) { title href tags { label } }
    advertisers {
        email
        broker { name fulfillment_id }
        type
        name
        fulfillment_id
        builder { name fulfillment_id }
        phones { ext primary type number }
        office { name email fulfillment_id href mls_set phones { number type primary ext } }
        mls_set
        nrds_id
        state_license
    }
    current_estimates {
        source { type name }
        estimate
        estimateHigh: estimate_high
        estimateLow: estimate_low
        date
        isBestHomeValue: isbest_homevalue
    }
}"
    };
}

macro_rules! search_results {
    () => {
        concat!("{ count total results ", search_result_fields!(), " }")
    };
}

/// Area search: city, county, state or postal code criteria.
pub(crate) const AREA_SEARCH: &str = concat!(
    "query Home_search($query: HomeSearchCriteria!, $sort: [SearchAPISort], ",
    "$bucket: SearchAPIBucket, $limit: Int, $offset: Int) { ",
    "home_search(query: $query, sort: $sort, bucket: $bucket, limit: $limit, offset: $offset) ",
    search_results!(),
    " }"
);

/// Radius search around a resolved address.
pub(crate) const COMPS_SEARCH: &str = concat!(
    "query Comps_search($query: HomeSearchCriteria!, $sort: [SearchAPISort], ",
    "$limit: Int, $offset: Int) { ",
    "home_search(query: $query, sort: $sort, limit: $limit, offset: $offset) ",
    search_results!(),
    " }"
);

/// Single property by id, aliased so the container key is `property_search`.
pub(crate) const PROPERTY_SEARCH: &str = concat!(
    "query Property_search($query: HomeSearchCriteria!, $limit: Int, $offset: Int) { ",
    "property_search: home_search(query: $query, limit: $limit, offset: $offset) ",
    search_results!(),
    " }"
);

/// Prefix of every alias in the bulk-detail document.
pub(crate) const BULK_ALIAS_PREFIX: &str = "home_";

/// Shared fragment selected for each property in the bulk-detail document.
pub(crate) const HOME_FRAGMENT: &str = "fragment HomeData on Home {
    property_id
    nearbySchools: nearby_schools(radius: 5.0, limit_per_level: 3) {
        __typename schools { district { __typename id name } }
    }
    popularity {
        periods {
            clicks_total views_total dwell_time_mean dwell_time_median
            leads_total shares_total saves_total last_n_days
        }
    }
    location { parcel { parcel_id } }
    taxHistory: tax_history { __typename tax year assessment { __typename building land total } }
    property_history { date event_name price }
    monthly_fees { description display_amount }
    one_time_fees { description display_amount }
    parking { unassigned_space_rent assigned_spaces_available description assigned_space_rent }
    terms { text category }
}";
