//! Service Order Endpoints

use reqwest::Method;

use order_core::{ApiError, OrderPage, ServiceOrder};

use super::{decode, total_pages, ApiClient};

/// Filters of the order list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub customer_id: Option<String>,
}

impl ListQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.per_page.to_string())];
        if let Some(customer_id) = &self.customer_id {
            params.push(("customer_id", customer_id.clone()));
        }
        params
    }
}

impl ApiClient {
    pub async fn get_order(&self, id: &str) -> Result<ServiceOrder, ApiError> {
        self.get_json(&format!("services/orders/{}", id)).await
    }

    pub async fn list_orders(&self, query: &ListQuery) -> Result<OrderPage, ApiError> {
        let builder = self.request(Method::GET, "services/orders").query(&query.params());
        let response = self.send(builder).await?;
        let total_pages = total_pages(&response);
        let orders: Vec<ServiceOrder> = decode(response).await?;
        Ok(OrderPage { orders, page: query.page, total_pages })
    }

    pub async fn delete_order(&self, id: &str) -> Result<(), ApiError> {
        log::info!("[API] deleting order {}", id);
        self.delete(&format!("services/orders/{}", id)).await
    }
}
