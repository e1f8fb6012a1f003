use serde::{Deserialize, Serialize};

/// A supported settlement currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Currency list response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyListResponse {
    pub currencies: Vec<Currency>,
}

/// A country, keyed by ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Country list response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryListResponse {
    pub countries: Vec<Country>,
}

/// A state/region within a country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateRegion {
    pub name: String,
    pub country_code: String,
}

/// State list response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateListResponse {
    pub states: Vec<StateRegion>,
}
