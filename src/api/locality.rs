//! Address Lookups
//!
//! Third-party postal code and city services used to prefill the address.

use serde::Deserialize;

use order_core::{normalize_zip, ApiError, PostalAddress};

use super::{check_status, decode, join_url, ApiClient};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct City {
    #[serde(alias = "nome")]
    pub name: String,
}

impl ApiClient {
    /// Look up a complete postal code; `Ok(None)` when the code is unknown
    pub async fn lookup_postal_code(&self, raw_zip: &str) -> Result<Option<PostalAddress>, ApiError> {
        let zip = normalize_zip(raw_zip).ok_or_else(|| ApiError::NotFound(raw_zip.to_string()))?;
        let url = join_url(&self.postal_lookup_url, &format!("{}/json/", zip));
        let response = self.http.get(url).send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let body: serde_json::Value = decode(check_status(response).await?).await?;
        PostalAddress::from_response(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// City names of a state, sorted
    pub async fn list_cities(&self, state: &str) -> Result<Vec<String>, ApiError> {
        let url = join_url(&self.localities_url, &format!("{}/municipios", state.trim().to_uppercase()));
        let response = self.http.get(url).send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let cities: Vec<City> = decode(check_status(response).await?).await?;
        let mut names: Vec<String> = cities.into_iter().map(|c| c.name).collect();
        names.sort();
        Ok(names)
    }
}
