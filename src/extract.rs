// Locates the embedded __NEXT_DATA__ JSON in a saved page and walks it down
// to the listings mapping

use crate::{
    error::ExtractError,
    models::{ListingsData, NextData},
};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

static NEXT_DATA_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script#__NEXT_DATA__").expect("valid __NEXT_DATA__ selector"));

// Parses the text of the page's __NEXT_DATA__ script element as JSON
pub fn extract_json(html_content: &str) -> Result<Value, ExtractError> {
    let document = Html::parse_document(html_content);
    let script = document
        .select(&NEXT_DATA_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingDataBlock)?;

    let raw_json = script.text().collect::<String>();
    serde_json::from_str(&raw_json).map_err(ExtractError::MalformedJson)
}

// Follows props.pageProps.dehydratedState.queries[0].state.data
pub fn listings_from(data: Value) -> Result<ListingsData, ExtractError> {
    let next_data: NextData =
        serde_json::from_value(data).map_err(|e| ExtractError::Navigation(e.to_string()))?;

    next_data
        .props
        .page_props
        .dehydrated_state
        .queries
        .into_iter()
        .next()
        .map(|query| query.state.data)
        .ok_or_else(|| ExtractError::Navigation("dehydratedState.queries is empty".to_string()))
}

pub fn extract_listings(html_content: &str) -> Result<ListingsData, ExtractError> {
    let data = extract_json(html_content)?;
    listings_from(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingType;
    use serde_json::json;

    fn page_with(script_body: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><head><title>רכבים</title></head><body>
<div id="__next"><h1>מודעות</h1></div>
<script id="__NEXT_DATA__" type="application/json">{script_body}</script>
</body></html>"#
        )
    }

    #[test]
    fn extracts_embedded_json() {
        let html = page_with(r#"{"props":{"pageProps":{"ok":true}},"page":"/vehicles/cars"}"#);
        let value = extract_json(&html).unwrap();
        assert_eq!(value["page"], "/vehicles/cars");
        assert_eq!(value["props"]["pageProps"]["ok"], true);
    }

    #[test]
    fn missing_script_is_missing_data_block() {
        let html = "<html><body><script id=\"other\">{}</script></body></html>";
        let err = extract_json(html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingDataBlock));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let html = page_with("{\"props\": ");
        let err = extract_json(&html).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedJson(_)));
    }

    #[test]
    fn navigates_to_listings() {
        let data = json!({
            "props": {"pageProps": {"dehydratedState": {"queries": [
                {"state": {"data": {
                    "commercial": [{"token": "a"}, {"token": "b"}],
                    "private": [],
                    "platinum": null
                }}},
                {"state": {"data": {"commercial": [{"token": "ignored"}]}}}
            ]}}}
        });

        let listings = listings_from(data).unwrap();
        assert_eq!(listings.category(ListingType::Commercial).len(), 2);
        assert_eq!(listings.category(ListingType::Commercial)[1]["token"], "b");
        assert!(listings.category(ListingType::Private).is_empty());
        assert!(listings.category(ListingType::Solo).is_empty());
        assert!(listings.category(ListingType::Platinum).is_empty());
    }

    #[test]
    fn missing_path_is_navigation_error() {
        let err = listings_from(json!({"props": {"pageProps": {}}})).unwrap_err();
        assert!(matches!(err, ExtractError::Navigation(_)));

        let err = listings_from(json!({
            "props": {"pageProps": {"dehydratedState": {"queries": []}}}
        }))
        .unwrap_err();
        assert!(matches!(err, ExtractError::Navigation(_)));
    }

    #[test]
    fn extract_listings_end_to_end() {
        let html = page_with(
            r#"{"props":{"pageProps":{"dehydratedState":{"queries":[{"state":{"data":{"solo":[{"token":"x1"}]}}}]}}}}"#,
        );
        let listings = extract_listings(&html).unwrap();
        assert_eq!(listings.category(ListingType::Solo)[0]["token"], "x1");
    }
}
