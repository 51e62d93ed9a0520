//! `homescan search` argument handling.

use clap::{Args, ValueEnum};
use homescan_core::{ListingType, SearchPropertyType};
use homescan_realtor::{DateSpec, RealtorClient, RealtorError, SearchRequest};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Provider records as returned, merged with bulk details.
    Raw,
    /// Normalized property records.
    Typed,
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Address, postal code, city, county, or state.
    pub location: String,

    #[arg(long, default_value = "for_sale")]
    pub listing_type: ListingType,

    /// Only listings from the last N days; 0 means no limit. The pending filter
    /// prefers it, the provider query prefers an explicit range.
    #[arg(long)]
    pub past_days: Option<u32>,

    /// Start of an explicit range (YYYY-MM-DD); requires --date-to.
    #[arg(long)]
    pub date_from: Option<String>,

    #[arg(long)]
    pub date_to: Option<String>,

    /// Repeatable or comma-separated, e.g. `single_family,condos`.
    #[arg(long = "property-type", value_delimiter = ',')]
    pub property_types: Vec<SearchPropertyType>,

    /// Miles around an address; turns an address search into comps.
    #[arg(long)]
    pub radius: Option<f64>,

    /// `true` for only foreclosures, `false` to exclude them.
    #[arg(long)]
    pub foreclosure: Option<bool>,

    #[arg(long)]
    pub extra_details: bool,

    #[arg(long)]
    pub mls_only: bool,

    #[arg(long)]
    pub exclude_pending: bool,

    #[arg(long, default_value_t = homescan_realtor::search::DEFAULT_LIMIT)]
    pub limit: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Typed)]
    pub format: OutputFormat,
}

impl SearchArgs {
    /// # Errors
    ///
    /// Returns [`RealtorError::InvalidRequest`] for an inconsistent date range.
    pub(crate) fn to_request(&self) -> Result<SearchRequest, RealtorError> {
        let mut request = SearchRequest::new(self.location.clone(), self.listing_type);
        request.date = DateSpec::from_parts(
            self.past_days,
            self.date_from.as_deref(),
            self.date_to.as_deref(),
        )?;
        request.property_types = self.property_types.iter().copied().collect();
        request.radius_miles = self.radius;
        request.foreclosure = self.foreclosure;
        request.extra_property_data = self.extra_details;
        request.mls_only = self.mls_only;
        request.exclude_pending = self.exclude_pending;
        request.limit = self.limit;
        request.validate()?;
        Ok(request)
    }
}

pub(crate) async fn run_search(client: &RealtorClient, args: SearchArgs) -> anyhow::Result<Value> {
    let request = args.to_request()?;
    let value = match args.format {
        OutputFormat::Raw => Value::Array(client.search(&request).await?),
        OutputFormat::Typed => serde_json::to_value(client.search_properties(&request).await?)?,
    };
    Ok(value)
}
