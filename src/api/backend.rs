//! Submission Endpoints
//!
//! `OrderBackend` over HTTP: the calls the form flushes on submit.

use async_trait::async_trait;
use reqwest::Method;

use order_core::{ApiError, NewLineItem, NewOrder, OrderBackend, OrderFields, RecordId, TagKind};

use super::{decode, ApiClient, Created};

#[async_trait(?Send)]
impl OrderBackend for ApiClient {
    async fn create_order(&self, order: &NewOrder) -> Result<String, ApiError> {
        let response = self.send(self.request(Method::POST, "services/orders").json(order)).await?;
        let created: Created = decode(response).await?;
        Ok(created.id.to_string())
    }

    async fn update_order(&self, order_id: &str, fields: &OrderFields) -> Result<(), ApiError> {
        let path = format!("services/orders/{}", order_id);
        self.send(self.request(Method::PUT, &path).json(fields)).await.map(|_| ())
    }

    async fn create_item(&self, item: &NewLineItem) -> Result<RecordId, ApiError> {
        let response = self.send(self.request(Method::POST, "services/orders/items").json(item)).await?;
        let created: Created = decode(response).await?;
        Ok(created.id)
    }

    async fn update_item(&self, id: &str, item: &NewLineItem) -> Result<(), ApiError> {
        let path = format!("services/orders/items/{}", id);
        self.send(self.request(Method::PUT, &path).json(item)).await.map(|_| ())
    }

    async fn delete_item(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("services/orders/items/{}", id)).await
    }

    async fn create_tag_association(
        &self,
        kind: TagKind,
        order_id: &str,
        tag_id: &str,
    ) -> Result<RecordId, ApiError> {
        let body = association_body(kind, order_id, tag_id);
        let response = self.send(self.request(Method::POST, kind.association_path()).json(&body)).await?;
        let created: Created = decode(response).await?;
        Ok(created.id)
    }

    async fn delete_tag_association(&self, kind: TagKind, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", kind.association_path(), id)).await
    }
}

/// `{ "service_order_id": .., "<kind>_type_id": .. }`
fn association_body(kind: TagKind, order_id: &str, tag_id: &str) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("service_order_id".into(), order_id.into());
    body.insert(kind.foreign_key().into(), tag_id.into());
    serde_json::Value::Object(body)
}
