//! Domain Entities
//!
//! Shapes shared by the form state and the REST client.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::backend::NewLineItem;
use crate::ids::RecordId;

/// Core trait for rows tracked by a changeset
pub trait Entity: Sized + Clone {
    /// The type of the row's identifier
    type Id: Clone + Eq + std::hash::Hash;

    /// Returns the row's identifier
    fn id(&self) -> &Self::Id;
}

/// Accept ids sent either as JSON strings or numbers
pub(crate) fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {}", other))),
    }
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!("invalid id: {}", other))),
    }
}

// ========================
// Line Items
// ========================

/// One quantified service inside an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub details: String,
    pub quantity: u32,
    #[serde(default)]
    pub order: usize,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub service_order_id: Option<String>,
}

impl Entity for LineItem {
    type Id = RecordId;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl LineItem {
    /// Fields sent to the API for this row
    pub fn to_payload(&self, service_order_id: Option<&str>) -> NewLineItem {
        NewLineItem {
            service_order_id: service_order_id.map(str::to_string),
            name: self.name.clone(),
            details: self.details.clone(),
            quantity: self.quantity,
            order: self.order,
        }
    }
}

// ========================
// Tags
// ========================

/// The three independent classification categories of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Pest,
    Treatment,
    Building,
}

impl TagKind {
    pub const ALL: [TagKind; 3] = [TagKind::Pest, TagKind::Treatment, TagKind::Building];

    /// Resource path of the join entity
    pub fn association_path(self) -> &'static str {
        match self {
            TagKind::Pest => "services/pragues-types",
            TagKind::Treatment => "services/treatments-types",
            TagKind::Building => "services/builds-types",
        }
    }

    /// Resource path of the tag definitions
    pub fn definition_path(self) -> &'static str {
        match self {
            TagKind::Pest => "prague-types",
            TagKind::Treatment => "treatment-types",
            TagKind::Building => "build-types",
        }
    }

    /// Foreign key naming the definition inside the join entity
    pub fn foreign_key(self) -> &'static str {
        match self {
            TagKind::Pest => "prague_type_id",
            TagKind::Treatment => "treatment_type_id",
            TagKind::Building => "build_type_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TagKind::Pest => "Pests",
            TagKind::Treatment => "Treatments",
            TagKind::Building => "Buildings",
        }
    }
}

/// A classification value (pest type, treatment type, building type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: i32,
}

/// Link between an order and a tag definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAssociation {
    pub id: RecordId,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub service_order_id: Option<String>,
    #[serde(alias = "prague_type", alias = "treatment_type", alias = "build_type")]
    pub tag: TagDefinition,
}

impl Entity for TagAssociation {
    type Id = RecordId;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

// ========================
// Customers & Orders
// ========================

/// The five address fields shared by customers and orders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

impl Address {
    pub fn is_blank(&self) -> bool {
        self == &Address::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub address: Address,
}

/// A unit of work for a customer, as loaded from the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub customer_id: String,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(flatten)]
    pub address: Address,
    #[serde(default)]
    pub has_animals: bool,
    #[serde(default)]
    pub has_elderly: bool,
    #[serde(default)]
    pub has_allergic: bool,
    pub value: Decimal,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub warranty: String,
    #[serde(default)]
    pub notes: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub finish_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, rename = "pragues_types")]
    pub pragues: Vec<TagAssociation>,
    #[serde(default, rename = "treatments_types")]
    pub treatments: Vec<TagAssociation>,
    #[serde(default, rename = "builds_types")]
    pub builds: Vec<TagAssociation>,
}

impl ServiceOrder {
    /// Associations of one tag category
    pub fn associations(&self, kind: TagKind) -> &[TagAssociation] {
        match kind {
            TagKind::Pest => &self.pragues,
            TagKind::Treatment => &self.treatments,
            TagKind::Building => &self.builds,
        }
    }
}

/// Entry of the service catalog, used to name line items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// One page of the order list plus the page count the server reported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<ServiceOrder>,
    pub page: u32,
    pub total_pages: u32,
}

impl OrderPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_order() {
        let json = r#"{
            "id": 7,
            "customer_id": "c1",
            "zip_code": "01001000",
            "street": "Praça da Sé",
            "district": "Sé",
            "city": "São Paulo",
            "state": "SP",
            "has_animals": true,
            "value": "150.00",
            "start_date": "2024-03-01",
            "items": [
                {"id": "i1", "name": "Spraying", "quantity": 2, "order": 0, "service_order_id": 7}
            ],
            "pragues_types": [
                {"id": 3, "service_order_id": 7, "prague_type": {"id": 1, "name": "Termites", "order": 0}}
            ]
        }"#;

        let order: ServiceOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, "7");
        assert_eq!(order.address.state, "SP");
        assert!(order.has_animals);
        assert_eq!(order.items[0].id, RecordId::persisted("i1"));
        assert_eq!(order.items[0].service_order_id.as_deref(), Some("7"));
        assert_eq!(order.associations(TagKind::Pest)[0].tag.name, "Termites");
        assert!(order.associations(TagKind::Building).is_empty());
    }

    #[test]
    fn test_order_page_bounds() {
        let page = OrderPage { orders: vec![], page: 1, total_pages: 3 };
        assert!(page.has_next());
        assert!(!page.has_prev());
    }

    #[test]
    fn test_line_item_payload_takes_owner_from_caller() {
        let item = LineItem {
            id: RecordId::persisted("i1"),
            name: "Fogging".into(),
            details: "kitchen".into(),
            quantity: 2,
            order: 3,
            service_order_id: Some("old".into()),
        };

        let inline = item.to_payload(None);
        assert_eq!(inline.service_order_id, None);
        assert_eq!(inline.order, 3);

        let attached = item.to_payload(Some("3f2a-77b1"));
        assert_eq!(attached.service_order_id.as_deref(), Some("3f2a-77b1"));
        assert_eq!(attached.quantity, 2);
    }
}
