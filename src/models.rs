// Data structures for the embedded page payload and the summary rows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

// --- Page payload (__NEXT_DATA__) ---
// Only the path down to the listings is modelled; everything else is ignored.

#[derive(Debug, Deserialize)]
pub struct NextData {
    pub props: Props,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Props {
    pub page_props: PageProps,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    pub dehydrated_state: DehydratedState,
}

#[derive(Debug, Deserialize)]
pub struct DehydratedState {
    pub queries: Vec<DehydratedQuery>,
}

#[derive(Debug, Deserialize)]
pub struct DehydratedQuery {
    pub state: QueryState,
}

#[derive(Debug, Deserialize)]
pub struct QueryState {
    pub data: ListingsData,
}

// Listings per seller category. Records stay untyped here so that one bad
// record can be skipped without losing the rest of the category.
#[derive(Debug, Default, Deserialize)]
pub struct ListingsData {
    #[serde(default)]
    pub commercial: Option<Vec<Value>>,
    #[serde(default)]
    pub private: Option<Vec<Value>>,
    #[serde(default)]
    pub solo: Option<Vec<Value>>,
    #[serde(default)]
    pub platinum: Option<Vec<Value>>,
}

impl ListingsData {
    pub fn category(&self, listing_type: ListingType) -> &[Value] {
        let list = match listing_type {
            ListingType::Commercial => &self.commercial,
            ListingType::Private => &self.private,
            ListingType::Solo => &self.solo,
            ListingType::Platinum => &self.platinum,
        };
        list.as_deref().unwrap_or_default()
    }
}

// Seller-type partition of the listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingType {
    Commercial,
    Private,
    Solo,
    Platinum,
}

impl ListingType {
    // Processing order within one file
    pub const ALL: [ListingType; 4] = [
        ListingType::Commercial,
        ListingType::Private,
        ListingType::Solo,
        ListingType::Platinum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingType::Commercial => "commercial",
            ListingType::Private => "private",
            ListingType::Solo => "solo",
            ListingType::Platinum => "platinum",
        }
    }
}

impl std::fmt::Display for ListingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Raw listing record ---

// `{"id": .., "text": ..}` objects where the text is mandatory
#[derive(Debug, Clone, Deserialize)]
pub struct TextField {
    pub text: String,
}

// Same shape, but the text may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionalText {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDates {
    pub year_of_production: i32,
    #[serde(default)]
    pub month_of_production: Option<OptionalText>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<OptionalText>,
    #[serde(default)]
    pub area: Option<OptionalText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hand {
    pub id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaData {
    #[serde(default)]
    pub description: Option<String>,
}

// One listing as found in the page payload. Every field is optional at this
// boundary; the normalizer decides which absences mean "skip".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    pub price: Option<Number>,
    pub manufacturer: Option<TextField>,
    pub model: Option<TextField>,
    pub sub_model: Option<TextField>,
    pub vehicle_dates: Option<VehicleDates>,
    pub km: Option<i64>,
    pub hand: Option<Hand>,
    pub address: Option<Address>,
    pub meta_data: Option<MetaData>,
    pub token: Option<String>,
    pub ad_type: Option<String>,
}

// --- Output row ---

// Column order of the summary CSV
pub const CSV_HEADERS: [&str; 19] = [
    "adNumber",
    "price",
    "city",
    "adType",
    "model",
    "subModel",
    "productionDate",
    "km",
    "hand",
    "createdAt",
    "updatedAt",
    "rebouncedAt",
    "listingType",
    "number_of_years",
    "km_per_year",
    "description",
    "link",
    "make",
    "hp",
];

// Field order must match CSV_HEADERS
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRow {
    pub ad_number: String,
    pub price: Number,
    pub city: String,
    pub ad_type: String,
    pub model: String,
    pub sub_model: String,
    pub production_date: NaiveDate,
    pub km: i64,
    pub hand: i64,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub rebounced_at: NaiveDate,
    pub listing_type: String,
    #[serde(rename = "number_of_years")]
    pub number_of_years: f64,
    #[serde(rename = "km_per_year")]
    pub km_per_year: f64,
    pub description: String,
    pub link: String,
    pub make: String,
    pub hp: u32,
}
