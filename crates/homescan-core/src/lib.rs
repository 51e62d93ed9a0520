pub mod app_config;
pub mod config;
pub mod error;
pub mod listing;
pub mod property;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use listing::{ListingType, SearchPropertyType};
pub use property::{
    Address, Advertisers, Agent, Assessment, Description, Entity, EstimateSource, Fee, HistoryEvent,
    HomeDetail, HomeFlags, Office, ParcelInfo, Parking, Photo, Popularity, PopularityPeriod,
    Property, PropertyEstimate, TaxHistoryEntry, TaxRecord,
};
