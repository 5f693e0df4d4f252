// Turns raw listing records into flat summary rows

use crate::{
    error::{RecordError, RecordResult},
    models::{ListingType, NormalizedRow, RawListing},
    writer::RowWriter,
};
use anyhow::Result;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;

pub const ITEM_URL_PREFIX: &str = "https://www.yad2.co.il/vehicles/item/";

// Hebrew month names in calendar order
const HEBREW_MONTHS: [&str; 12] = [
    "ינואר", "פברואר", "מרץ", "אפריל", "מאי", "יוני",
    "יולי", "אוגוסט", "ספטמבר", "אוקטובר", "נובמבר", "דצמבר",
];

const DAYS_PER_YEAR: f64 = 365.25;

// First integer followed by the horsepower abbreviation, e.g. "1.8 132 כ״ס"
static HP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*כ״ס").expect("valid horsepower regex"));

// Unknown or missing month names map to January
pub fn month_number(month_text: &str) -> u32 {
    HEBREW_MONTHS
        .iter()
        .position(|name| *name == month_text.trim())
        .map_or(1, |idx| idx as u32 + 1)
}

// Julian years between the production date and today
pub fn years_since(production_date: NaiveDate, today: NaiveDate) -> f64 {
    (today - production_date).num_days() as f64 / DAYS_PER_YEAR
}

pub fn horsepower(sub_model: &str) -> u32 {
    HP_PATTERN
        .captures(sub_model)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn km_per_year(km: i64, years: f64) -> f64 {
    if years > 0.0 && km > 0 {
        round2(km as f64 / years)
    } else {
        0.0
    }
}

pub fn listing_link(token: &str) -> String {
    format!("{}{}", ITEM_URL_PREFIX, token)
}

// orderId, then token, then "unknown"
pub fn ad_number(listing: &Value) -> String {
    let render = |value: &Value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };

    listing
        .get("orderId")
        .and_then(render)
        .or_else(|| listing.get("token").and_then(render))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Normalizes a single listing.
///
/// Returns `Ok(None)` for records that are deliberately left out: no price,
/// a zero price ("contact dealer" ads) or a missing manufacturer, model,
/// subModel, vehicleDates or token. Fields that are present but malformed
/// surface as a [`RecordError`].
pub fn normalize(
    listing: &Value,
    listing_type: ListingType,
    today: NaiveDate,
) -> RecordResult<Option<NormalizedRow>> {
    let raw = RawListing::deserialize(listing)?;
    let ad_number = ad_number(listing);

    let Some(price) = raw.price.filter(|p| p.as_f64().is_some_and(|v| v != 0.0)) else {
        return Ok(None);
    };

    let (Some(manufacturer), Some(model), Some(sub_model), Some(vehicle_dates), Some(token)) = (
        raw.manufacturer,
        raw.model,
        raw.sub_model,
        raw.vehicle_dates,
        raw.token,
    ) else {
        return Ok(None);
    };

    let year = vehicle_dates.year_of_production;
    let month = vehicle_dates
        .month_of_production
        .and_then(|m| m.text)
        .map_or(1, |text| month_number(&text));
    let production_date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(RecordError::InvalidProductionDate { year, month })?;

    let years = years_since(production_date, today);
    let km = raw.km.unwrap_or(0);

    // A present city wins even when its text is empty
    let city = match raw.address {
        Some(address) => match (address.city, address.area) {
            (Some(city), _) => city.text.unwrap_or_default(),
            (None, Some(area)) => area.text.unwrap_or_default(),
            (None, None) => String::new(),
        },
        None => String::new(),
    };

    Ok(Some(NormalizedRow {
        ad_number,
        price,
        city,
        ad_type: raw.ad_type.unwrap_or_default(),
        model: model.text,
        hp: horsepower(&sub_model.text),
        sub_model: sub_model.text,
        production_date,
        km,
        hand: raw.hand.map_or(0, |hand| hand.id),
        // Not present in the page data; stamped with the run date
        created_at: today,
        updated_at: today,
        rebounced_at: today,
        listing_type: listing_type.as_str().to_string(),
        number_of_years: round2(years),
        km_per_year: km_per_year(km, years),
        description: raw.meta_data.and_then(|m| m.description).unwrap_or_default(),
        link: listing_link(&token),
        make: manufacturer.text,
    }))
}

// Writes every convertible listing of one category, returning the row count.
// Record-level failures are logged and skipped; only write errors propagate.
pub fn process_listings<W: Write>(
    listings: &[Value],
    listing_type: ListingType,
    today: NaiveDate,
    writer: &mut RowWriter<W>,
    verbose: bool,
) -> Result<usize> {
    let mut processed_count = 0;

    for listing in listings {
        match normalize(listing, listing_type, today) {
            Ok(Some(row)) => {
                writer.write_row(&row)?;
                processed_count += 1;
            }
            Ok(None) => {
                tracing::trace!(ad_number = %ad_number(listing), %listing_type, "Skipping listing without price or vehicle fields");
            }
            Err(e) => {
                let ad_number = ad_number(listing);
                if verbose {
                    tracing::info!(%ad_number, %listing_type, error = %e, "Skipping item");
                } else {
                    tracing::debug!(%ad_number, %listing_type, error = %e, "Skipping item");
                }
            }
        }
    }

    if processed_count > 0 {
        tracing::info!(%listing_type, "Successfully processed {} valid items", processed_count);
    }
    Ok(processed_count)
}

// One-off dump of a record's keys and value types
pub fn log_record_shape(listing_type: ListingType, listing: &Value) {
    tracing::info!("DEBUG: Inspecting first item in {} listings", listing_type);

    let Some(map) = listing.as_object() else {
        tracing::info!("  record is not an object: {}", describe(listing));
        return;
    };

    tracing::info!("All keys: {:?}", map.keys().collect::<Vec<_>>());
    for (key, value) in map {
        tracing::info!("  {}: {}", key, describe(value));
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(map) => format!("object with keys {:?}", map.keys().collect::<Vec<_>>()),
        Value::Array(items) => format!("array with {} items", items.len()),
        Value::String(s) if s.chars().count() >= 50 => {
            format!("string = {}...", s.chars().take(50).collect::<String>())
        }
        Value::String(s) => format!("string = {}", s),
        Value::Number(n) => format!("number = {}", n),
        Value::Bool(b) => format!("bool = {}", b),
        Value::Null => "null".to_string(),
    }
}
