//! Reference Data Endpoints
//!
//! Customers, the service catalog and tag definitions.

use reqwest::Method;

use order_core::{ApiError, Customer, ServiceCatalogEntry, TagDefinition, TagKind};

use super::{decode, ApiClient};

impl ApiClient {
    pub async fn list_services(&self) -> Result<Vec<ServiceCatalogEntry>, ApiError> {
        self.get_json("services").await
    }

    pub async fn list_tag_definitions(&self, kind: TagKind) -> Result<Vec<TagDefinition>, ApiError> {
        let mut definitions: Vec<TagDefinition> = self.get_json(kind.definition_path()).await?;
        definitions.sort_by_key(|d| d.order);
        Ok(definitions)
    }

    pub async fn list_customers(&self, search: &str) -> Result<Vec<Customer>, ApiError> {
        let mut builder = self.request(Method::GET, "customers");
        let search = search.trim();
        if !search.is_empty() {
            builder = builder.query(&[("search", search)]);
        }
        decode(self.send(builder).await?).await
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer, ApiError> {
        self.get_json(&format!("customers/{}", id)).await
    }
}
