//! Maps raw search records into typed [`Property`] values.
//!
//! Pure: no I/O, and the only clock input is [`NormalizeOptions::today`].

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use homescan_core::{
    Address, Advertisers, Agent, Assessment, Description, Entity, EstimateSource, Fee,
    HistoryEvent, HomeDetail, HomeFlags, ListingType, Office, ParcelInfo, Parking, Photo,
    Popularity, PopularityPeriod, Property, PropertyEstimate, TaxHistoryEntry, TaxRecord,
};
use serde_json::Value;

/// Provider thumbnail suffix and the larger rendition substituted for it.
const THUMBNAIL_SUFFIX: &str = "s.jpg";
const FULL_SIZE_SUFFIX: &str = "od-w480_h360_x2.webp?w=1080&q=75";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Records carry bulk-detail fields (schools, tax history).
    pub extra_property_data: bool,
    pub listing_type: ListingType,
    /// Drop records without an MLS source.
    pub mls_only: bool,
    /// Drop pending and contingent records unless searching pending listings.
    pub exclude_pending: bool,
    /// Reference day for `days_on_mls`.
    pub today: NaiveDate,
}

impl NormalizeOptions {
    #[must_use]
    pub fn new(listing_type: ListingType) -> Self {
        Self {
            extra_property_data: false,
            listing_type,
            mls_only: false,
            exclude_pending: false,
            today: Local::now().date_naive(),
        }
    }
}

/// Normalizes one raw record. `None` means the record should be dropped.
#[must_use]
pub fn normalize(raw: &Value, opts: &NormalizeOptions) -> Option<Property> {
    let mls = str_at(raw, "/source/id");
    if mls.is_none() && opts.mls_only {
        return None;
    }

    let is_pending = bool_at(raw, "/flags/is_pending");
    let is_contingent = bool_at(raw, "/flags/is_contingent");
    if (is_pending || is_contingent)
        && opts.exclude_pending
        && opts.listing_type != ListingType::Pending
    {
        return None;
    }

    let property_id = text(raw.get("property_id")?)?;
    let property_url = str_at(raw, "/href")?;

    let status = if is_pending {
        Some("PENDING".to_owned())
    } else if is_contingent {
        Some("CONTINGENT".to_owned())
    } else {
        str_at(raw, "/status").map(|s| s.to_uppercase())
    };

    let extra = if opts.extra_property_data {
        ExtraDetails::from_record(raw)
    } else {
        ExtraDetails::default()
    };

    Some(Property {
        property_id,
        property_url,
        listing_id: raw.get("listing_id").and_then(text),
        permalink: str_at(raw, "/permalink"),
        mls,
        mls_id: raw.pointer("/source/listing_id").and_then(text),
        status,
        mls_status: str_at(raw, "/mls_status"),
        address: parse_address(raw),
        list_price: int_at(raw, "/list_price"),
        list_price_min: int_at(raw, "/list_price_min"),
        list_price_max: int_at(raw, "/list_price_max"),
        list_date: date_at(raw, "/list_date"),
        pending_date: date_at(raw, "/pending_date"),
        last_sold_date: date_at(raw, "/last_sold_date"),
        last_sold_price: int_at(raw, "/last_sold_price"),
        price_per_sqft: int_at(raw, "/price_per_sqft"),
        new_construction: bool_at(raw, "/flags/is_new_construction"),
        hoa_fee: int_at(raw, "/hoa/fee"),
        days_on_mls: days_on_mls(raw, opts.today),
        description: Some(parse_description(raw)),
        tags: raw.get("tags").and_then(string_list),
        details: parse_home_details(raw.get("details")),
        photos: parse_photos(raw),
        latitude: raw.pointer("/location/address/coordinate/lat").and_then(Value::as_f64),
        longitude: raw.pointer("/location/address/coordinate/lon").and_then(Value::as_f64),
        neighborhoods: parse_neighborhoods(raw),
        county: str_at(raw, "/location/county/name"),
        fips_code: raw.pointer("/location/county/fips_code").and_then(text),
        nearby_schools: extra.schools,
        assessed_value: extra.assessed_value,
        estimated_value: estimated_value(raw),
        tax: extra.tax,
        tax_history: extra.tax_history,
        tax_record: parse_tax_record(raw.get("tax_record")),
        current_estimates: parse_current_estimates(raw.get("current_estimates")),
        parcel_info: raw
            .pointer("/location/parcel")
            .filter(|p| p.is_object())
            .map(|p| ParcelInfo {
                parcel_id: p.get("parcel_id").and_then(text),
            }),
        popularity: parse_popularity(raw),
        property_history: parse_property_history(raw),
        monthly_fees: parse_fees(raw.get("monthly_fees")),
        one_time_fees: parse_fees(raw.get("one_time_fees")),
        parking: parse_parking(raw),
        terms: parse_home_details(raw.get("terms")),
        advertisers: parse_advertisers(raw.get("advertisers")),
        flags: raw.get("flags").and_then(parse_flags),
    })
}

fn parse_address(raw: &Value) -> Option<Address> {
    let address = raw.pointer("/location/address").filter(|a| a.is_object())?;
    let get = |key: &str| address.get(key).and_then(text);

    let street: Vec<String> = ["street_number", "street_direction", "street_name", "street_suffix"]
        .into_iter()
        .filter_map(get)
        .collect();
    let street = street.join(" ").trim().to_owned();

    Some(Address {
        full_line: get("line"),
        street: (!street.is_empty()).then_some(street),
        unit: get("unit"),
        city: get("city"),
        state: get("state_code"),
        zip: get("postal_code"),
        street_direction: get("street_direction"),
        street_number: get("street_number"),
        street_name: get("street_name"),
        street_suffix: get("street_suffix"),
    })
}

fn parse_description(raw: &Value) -> Description {
    let empty = Value::Null;
    let desc = raw.get("description").filter(|d| d.is_object()).unwrap_or(&empty);

    let alt_photos: Vec<String> = raw
        .get("photos")
        .and_then(Value::as_array)
        .map(|photos| {
            photos
                .iter()
                .filter_map(|p| p.get("href").and_then(Value::as_str))
                .filter(|href| !href.is_empty())
                .map(full_size_photo)
                .collect()
        })
        .unwrap_or_default();

    // A sold price equal to the list price with no sale date is a placeholder.
    let desc_sold_price = int_at(desc, "/sold_price");
    let sold_price = if str_at(raw, "/last_sold_date").is_some()
        || int_at(raw, "/list_price") != desc_sold_price
    {
        int_at(raw, "/last_sold_price")
            .filter(|p| *p != 0)
            .or(desc_sold_price)
    } else {
        None
    };

    Description {
        primary_photo: str_at(raw, "/primary_photo/href")
            .filter(|href| !href.is_empty())
            .map(|href| full_size_photo(&href)),
        alt_photos: (!alt_photos.is_empty()).then_some(alt_photos),
        style: str_at(desc, "/type").map(|s| s.to_uppercase()),
        beds: int_at(desc, "/beds"),
        baths_full: int_at(desc, "/baths_full"),
        baths_half: int_at(desc, "/baths_half"),
        sqft: int_at(desc, "/sqft"),
        lot_sqft: int_at(desc, "/lot_sqft"),
        sold_price,
        year_built: int_at(desc, "/year_built"),
        garage: desc.get("garage").and_then(Value::as_f64),
        stories: int_at(desc, "/stories"),
        text: str_at(desc, "/text"),
        name: str_at(desc, "/name"),
    }
}

fn full_size_photo(href: &str) -> String {
    href.replace(THUMBNAIL_SUFFIX, FULL_SIZE_SUFFIX)
}

fn parse_neighborhoods(raw: &Value) -> Option<String> {
    let names: Vec<&str> = raw
        .pointer("/location/neighborhoods")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|n| n.get("name").and_then(Value::as_str))
        .filter(|n| !n.is_empty())
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}

/// Days listed: list date to sale date for sold homes, list date to today
/// for active ones. Negative spans are discarded.
fn days_on_mls(raw: &Value, today: NaiveDate) -> Option<i64> {
    let list_date = date_at(raw, "/list_date")?;
    let end = match str_at(raw, "/status").as_deref() {
        Some("sold") => date_at(raw, "/last_sold_date")?,
        Some("for_sale" | "for_rent") => today,
        _ => return None,
    };
    let days = (end - list_date).num_days();
    (days >= 0).then_some(days)
}

fn estimated_value(raw: &Value) -> Option<i64> {
    raw.pointer("/current_estimates/0/estimate")
        .or_else(|| raw.pointer("/estimates/currentValues/0/estimate"))
        .and_then(as_int)
        .filter(|v| *v != 0)
}

fn parse_flags(flags: &Value) -> Option<HomeFlags> {
    if !flags.is_object() {
        return None;
    }
    let flag = |key: &str| flags.get(key).and_then(Value::as_bool);
    Some(HomeFlags {
        is_pending: flag("is_pending"),
        is_contingent: flag("is_contingent"),
        is_new_construction: flag("is_new_construction"),
        is_coming_soon: flag("is_coming_soon"),
        is_new_listing: flag("is_new_listing"),
        is_price_reduced: flag("is_price_reduced"),
        is_foreclosure: flag("is_foreclosure"),
    })
}

/// Seller advertisers become the agent (with broker and office); community
/// advertisers contribute the builder.
fn parse_advertisers(advertisers: Option<&Value>) -> Option<Advertisers> {
    let list = advertisers?.as_array().filter(|l| !l.is_empty())?;
    let mut out = Advertisers::default();

    for advertiser in list {
        match str_at(advertiser, "/type").as_deref() {
            Some("seller") => {
                out.agent = Some(Agent {
                    uuid: fulfillment_id(advertiser),
                    name: str_at(advertiser, "/name"),
                    email: str_at(advertiser, "/email"),
                    nrds_id: advertiser.get("nrds_id").and_then(text),
                    mls_set: str_at(advertiser, "/mls_set"),
                    state_license: str_at(advertiser, "/state_license"),
                });
                if let Some(broker) = advertiser.get("broker") {
                    if let Some(name) = str_at(broker, "/name").filter(|n| !n.is_empty()) {
                        out.broker = Some(Entity {
                            uuid: fulfillment_id(broker),
                            name: Some(name),
                        });
                    }
                }
                if let Some(office) = advertiser.get("office").filter(|o| o.is_object()) {
                    out.office = Some(Office {
                        uuid: fulfillment_id(office),
                        name: str_at(office, "/name"),
                        email: str_at(office, "/email"),
                        mls_set: str_at(office, "/mls_set"),
                    });
                }
            }
            Some("community") => {
                if let Some(builder) = advertiser.get("builder").filter(|b| b.is_object()) {
                    out.builder = Some(Entity {
                        uuid: fulfillment_id(builder),
                        name: str_at(builder, "/name"),
                    });
                }
            }
            _ => {}
        }
    }
    Some(out)
}

/// Category groups shared by `details` and `terms`.
fn parse_home_details(value: Option<&Value>) -> Option<Vec<HomeDetail>> {
    let details: Vec<HomeDetail> = value?
        .as_array()?
        .iter()
        .filter(|d| d.is_object())
        .map(|d| HomeDetail {
            category: str_at(d, "/category"),
            parent_category: str_at(d, "/parent_category"),
            text: d.get("text").and_then(|t| match t {
                Value::String(line) => Some(vec![line.clone()]),
                other => string_list(other),
            }),
        })
        .collect();
    non_empty(details)
}

/// Photos as returned, without the size upgrade applied to `alt_photos`.
fn parse_photos(raw: &Value) -> Option<Vec<Photo>> {
    let photos: Vec<Photo> = raw
        .get("photos")?
        .as_array()?
        .iter()
        .filter_map(|p| {
            let href = str_at(p, "/href").filter(|h| !h.is_empty())?;
            let tags = p
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| tags.iter().filter_map(|t| str_at(t, "/label")).collect())
                .unwrap_or_default();
            Some(Photo {
                href,
                title: str_at(p, "/title"),
                tags,
            })
        })
        .collect();
    non_empty(photos)
}

fn parse_tax_record(value: Option<&Value>) -> Option<TaxRecord> {
    let record = value.filter(|r| r.as_object().is_some_and(|o| !o.is_empty()))?;
    Some(TaxRecord {
        cl_id: record.get("cl_id").and_then(text),
        public_record_id: record.get("public_record_id").and_then(text),
        last_update_date: record
            .get("last_update_date")
            .and_then(Value::as_str)
            .and_then(parse_timestamp),
        apn: record.get("apn").and_then(text),
        tax_parcel_id: record.get("tax_parcel_id").and_then(text),
    })
}

/// Vendor valuations. Field names follow the aliases in the search document.
fn parse_current_estimates(value: Option<&Value>) -> Option<Vec<PropertyEstimate>> {
    let estimates: Vec<PropertyEstimate> = value?
        .as_array()?
        .iter()
        .filter(|e| e.is_object())
        .map(|e| PropertyEstimate {
            estimate: int_at(e, "/estimate"),
            estimate_high: int_at(e, "/estimateHigh").or_else(|| int_at(e, "/estimate_high")),
            estimate_low: int_at(e, "/estimateLow").or_else(|| int_at(e, "/estimate_low")),
            date: date_at(e, "/date"),
            is_best_home_value: e
                .get("isBestHomeValue")
                .or_else(|| e.get("is_best_home_value"))
                .and_then(Value::as_bool),
            source: e
                .get("source")
                .filter(|s| s.is_object())
                .map(|s| EstimateSource {
                    kind: str_at(s, "/type"),
                    name: str_at(s, "/name"),
                }),
        })
        .collect();
    non_empty(estimates)
}

fn parse_popularity(raw: &Value) -> Option<Popularity> {
    let periods = raw
        .pointer("/popularity/periods")?
        .as_array()?
        .iter()
        .filter(|p| p.is_object())
        .map(|p| PopularityPeriod {
            last_n_days: int_at(p, "/last_n_days"),
            clicks_total: int_at(p, "/clicks_total"),
            views_total: int_at(p, "/views_total"),
            dwell_time_mean: p.get("dwell_time_mean").and_then(Value::as_f64),
            dwell_time_median: p.get("dwell_time_median").and_then(Value::as_f64),
            leads_total: int_at(p, "/leads_total"),
            shares_total: int_at(p, "/shares_total"),
            saves_total: int_at(p, "/saves_total"),
        })
        .collect();
    Some(Popularity { periods })
}

fn parse_property_history(raw: &Value) -> Option<Vec<HistoryEvent>> {
    let events: Vec<HistoryEvent> = raw
        .get("property_history")?
        .as_array()?
        .iter()
        .filter(|e| e.is_object())
        .map(|e| HistoryEvent {
            date: date_at(e, "/date"),
            event_name: str_at(e, "/event_name"),
            price: int_at(e, "/price"),
        })
        .collect();
    non_empty(events)
}

/// Accepts a single fee object or a list of them.
fn parse_fees(value: Option<&Value>) -> Option<Vec<Fee>> {
    let entries: Vec<&Value> = match value? {
        Value::Array(items) => items.iter().collect(),
        fee @ Value::Object(_) => vec![fee],
        _ => return None,
    };
    let fees: Vec<Fee> = entries
        .into_iter()
        .filter(|f| f.is_object())
        .map(|f| Fee {
            description: str_at(f, "/description"),
            display_amount: str_at(f, "/display_amount"),
        })
        .collect();
    non_empty(fees)
}

fn parse_parking(raw: &Value) -> Option<Parking> {
    let parking = raw.get("parking").filter(|p| p.is_object())?;
    Some(Parking {
        description: str_at(parking, "/description"),
        assigned_spaces_available: int_at(parking, "/assigned_spaces_available"),
        assigned_space_rent: int_at(parking, "/assigned_space_rent"),
        unassigned_space_rent: int_at(parking, "/unassigned_space_rent"),
    })
}

/// RFC 3339, a bare `YYYY-MM-DDTHH:MM:SS` taken as UTC, or a bare date.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// `"0"` is the provider's placeholder for "no id".
fn fulfillment_id(party: &Value) -> Option<String> {
    party
        .get("fulfillment_id")
        .and_then(text)
        .filter(|id| !id.is_empty() && id != "0")
}

/// Fields present only on enriched records.
#[derive(Debug, Default)]
struct ExtraDetails {
    schools: Option<Vec<String>>,
    assessed_value: Option<i64>,
    tax: Option<i64>,
    tax_history: Option<Vec<TaxHistoryEntry>>,
}

impl ExtraDetails {
    fn from_record(raw: &Value) -> Self {
        let schools: Vec<String> = raw
            .pointer("/nearbySchools/schools")
            .and_then(Value::as_array)
            .map(|schools| {
                schools
                    .iter()
                    .filter_map(|s| str_at(s, "/district/name"))
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        // Taken from the provider's first entry, before sorting by year.
        let assessed_value = raw
            .pointer("/taxHistory/0/assessment/total")
            .and_then(as_int)
            .filter(|v| *v != 0);

        let mut history: Vec<&Value> = raw
            .get("taxHistory")
            .and_then(Value::as_array)
            .map(|h| h.iter().collect())
            .unwrap_or_default();
        history.sort_by_key(|entry| std::cmp::Reverse(int_at(entry, "/year").unwrap_or(0)));

        let tax = history.first().and_then(|latest| int_at(latest, "/tax"));
        let tax_history: Vec<TaxHistoryEntry> = history
            .iter()
            .filter(|entry| entry.get("year").is_some() && entry.get("tax").is_some())
            .map(|entry| TaxHistoryEntry {
                year: int_at(entry, "/year").unwrap_or(0),
                tax: int_at(entry, "/tax"),
                assessment: entry
                    .get("assessment")
                    .filter(|a| a.is_object())
                    .map(|a| Assessment {
                        building: int_at(a, "/building"),
                        land: int_at(a, "/land"),
                        total: int_at(a, "/total"),
                    }),
            })
            .collect();

        Self {
            schools: (!schools.is_empty()).then_some(schools),
            assessed_value,
            tax,
            tax_history: (!history.is_empty()).then_some(tax_history),
        }
    }
}

fn str_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(Value::as_str).map(str::to_owned)
}

fn bool_at(value: &Value, pointer: &str) -> bool {
    value.pointer(pointer).and_then(Value::as_bool).unwrap_or(false)
}

fn int_at(value: &Value, pointer: &str) -> Option<i64> {
    value.pointer(pointer).and_then(as_int)
}

/// Integer value, accepting whole floats such as `450000.0`.
#[allow(clippy::cast_possible_truncation)]
fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
}

/// String or number rendered as a string; empty strings are absent.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Date part of `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS...`.
fn date_at(value: &Value, pointer: &str) -> Option<NaiveDate> {
    let raw = value.pointer(pointer).and_then(Value::as_str)?;
    let day = raw.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let list: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect();
    Some(list)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
