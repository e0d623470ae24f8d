//! Order Address Rules
//!
//! Same-as-customer toggle and postal code autofill.

use serde::Deserialize;

use crate::draft::OrderDraft;
use crate::models::{Address, Customer};

/// Digits in a complete postal code
pub const ZIP_LEN: usize = 8;

/// Address fields returned by the postal lookup service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "cep", default)]
    pub zip_code: String,
    #[serde(rename = "logradouro", default)]
    pub street: String,
    #[serde(rename = "bairro", default)]
    pub district: String,
    #[serde(rename = "localidade", default)]
    pub city: String,
    #[serde(rename = "uf", default)]
    pub state: String,
}

impl PostalAddress {
    /// Decode a lookup response. The service answers unknown codes with
    /// `{"erro": true}` (or `"true"`), which maps to `None`.
    pub fn from_response(body: serde_json::Value) -> Result<Option<Self>, serde_json::Error> {
        let not_found = match body.get("erro") {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        };
        if not_found {
            return Ok(None);
        }
        serde_json::from_value(body).map(Some)
    }
}

/// Digits of a postal code, only once all of them are typed
pub fn normalize_zip(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    (digits.len() == ZIP_LEN).then_some(digits)
}

/// Switch the same-address toggle.
///
/// On: the five fields are copied from the customer and the customer's state
/// is returned so the caller can load its city list. Off: the fields are blanked.
pub fn set_same_address(draft: &mut OrderDraft, on: bool, customer: &Customer) -> Option<String> {
    draft.same_address = on;
    if on {
        draft.address = customer.address.clone();
        Some(customer.address.state.clone())
    } else {
        draft.address = Address::default();
        None
    }
}

/// Prefill the address from a lookup result, keeping the typed zip code
pub fn apply_postal_lookup(draft: &mut OrderDraft, found: PostalAddress) {
    draft.address.street = found.street;
    draft.address.district = found.district;
    draft.address.city = found.city;
    draft.address.state = found.state;
}
