pub mod search;

pub use search::{
    list_counties, list_country_codes, list_municipalities, LocationSummary,
    SearchLocationsError, SearchLocationsQuery, SearchLocationsResponse,
};
