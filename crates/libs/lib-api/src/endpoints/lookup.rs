//! # Lookup Endpoints
//!
//! Reference data for forms: currencies, countries, states. Slow-moving,
//! so callers cache these with a long staleness window.

use serde_json::json;
use shared::{Country, CountryListResponse, Currency, CurrencyListResponse, StateListResponse, StateRegion};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::operation::Operation;

/// Supported settlement currencies.
pub async fn currencies(client: &ApiClient) -> ApiResult<Vec<Currency>> {
    let op = Operation::get("lookup.currencies", "/api/lookup/currencies");
    client
        .send::<CurrencyListResponse>(&op)
        .await
        .map(|resp| resp.currencies)
}

/// Countries available for event locations.
pub async fn countries(client: &ApiClient) -> ApiResult<Vec<Country>> {
    let op = Operation::get("lookup.countries", "/api/lookup/countries");
    client
        .send::<CountryListResponse>(&op)
        .await
        .map(|resp| resp.countries)
}

/// States/regions within a country.
pub async fn states(client: &ApiClient, country_code: &str) -> ApiResult<Vec<StateRegion>> {
    let op = Operation::get("lookup.states", "/api/lookup/states")
        .with_query(&json!({ "country": country_code }))?;
    client.send::<StateListResponse>(&op).await.map(|resp| resp.states)
}
