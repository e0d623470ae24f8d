//! Remote API Seam
//!
//! The abstract interface the changesets flush into on submit.
//! The browser implements it over HTTP; tests implement it in memory.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::ids::RecordId;
use crate::models::{Address, TagKind};

/// Errors raised by any remote call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("session is not authorized")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
}

// ========================
// Payloads
// ========================

/// Line item fields sent on create/update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_order_id: Option<String>,
    pub name: String,
    pub details: String,
    pub quantity: u32,
    pub order: usize,
}

/// Scalar order fields sent on create/update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderFields {
    pub customer_id: String,
    #[serde(flatten)]
    pub address: Address,
    pub has_animals: bool,
    pub has_elderly: bool,
    pub has_allergic: bool,
    pub value: Decimal,
    pub payment_terms: String,
    pub warranty: String,
    pub notes: String,
    pub start_date: NaiveDate,
    pub finish_date: Option<NaiveDate>,
}

/// Create-mode payload: scalar fields with every child inline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    #[serde(flatten)]
    pub fields: OrderFields,
    pub items: Vec<NewLineItem>,
    pub prague_type_ids: Vec<String>,
    pub treatment_type_ids: Vec<String>,
    pub build_type_ids: Vec<String>,
}

/// Remote operations needed to persist one order form
#[async_trait(?Send)]
pub trait OrderBackend {
    /// Create an order with its children inline; returns the new order id
    async fn create_order(&self, order: &NewOrder) -> Result<String, ApiError>;

    async fn update_order(&self, order_id: &str, fields: &OrderFields) -> Result<(), ApiError>;

    /// Create a line item; returns the server id
    async fn create_item(&self, item: &NewLineItem) -> Result<RecordId, ApiError>;

    async fn update_item(&self, id: &str, item: &NewLineItem) -> Result<(), ApiError>;

    async fn delete_item(&self, id: &str) -> Result<(), ApiError>;

    /// Link a tag definition to an order; returns the association id
    async fn create_tag_association(
        &self,
        kind: TagKind,
        order_id: &str,
        tag_id: &str,
    ) -> Result<RecordId, ApiError>;

    async fn delete_tag_association(&self, kind: TagKind, id: &str) -> Result<(), ApiError>;
}

// ========================
// Reconciliation Report
// ========================

/// Kind of remote call issued during submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateOrder,
    UpdateOrder,
    CreateItem,
    UpdateItem,
    DeleteItem,
    CreateTag(TagKind),
    DeleteTag(TagKind),
}

/// One remote call that did not succeed
#[derive(Debug, Clone, PartialEq)]
pub struct OperationFailure {
    pub operation: Operation,
    /// Row the call was about (server id or placeholder)
    pub target: String,
    pub error: ApiError,
}

/// Aggregate outcome of a batch of independent remote calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub attempted: usize,
    pub failures: Vec<OperationFailure>,
}

impl ReconcileReport {
    /// Record the result of one call, logging failures as they are collected
    pub fn record<T>(&mut self, operation: Operation, target: String, result: Result<T, ApiError>) {
        self.attempted += 1;
        if let Err(error) = result {
            log::warn!("[SUBMIT] {:?} {} failed: {}", operation, target, error);
            self.failures.push(OperationFailure { operation, target, error });
        }
    }

    pub fn merge(&mut self, other: ReconcileReport) {
        self.attempted += other.attempted;
        self.failures.extend(other.failures);
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_collects_failures() {
        let mut report = ReconcileReport::default();
        report.record(Operation::DeleteItem, "a1".into(), Ok::<(), ApiError>(()));
        report.record::<()>(
            Operation::CreateItem,
            "@0".into(),
            Err(ApiError::Status { status: 500, body: "boom".into() }),
        );

        assert_eq!(report.attempted, 2);
        assert!(!report.is_success());
        assert_eq!(report.failures[0].operation, Operation::CreateItem);
        assert_eq!(report.failures[0].target, "@0");
    }

    #[test]
    fn test_merge_reports() {
        let mut first = ReconcileReport { attempted: 1, failures: vec![] };
        let mut second = ReconcileReport::default();
        second.record::<()>(Operation::DeleteTag(TagKind::Pest), "t1".into(), Err(ApiError::Unauthorized));
        first.merge(second);
        assert_eq!(first.attempted, 2);
        assert_eq!(first.failures.len(), 1);
    }

    #[test]
    fn test_new_order_payload_is_flat() {
        let order = NewOrder {
            fields: OrderFields {
                customer_id: "c1".into(),
                address: Address { zip_code: "01001000".into(), state: "SP".into(), ..Default::default() },
                has_animals: false,
                has_elderly: true,
                has_allergic: false,
                value: Decimal::new(12050, 2),
                payment_terms: String::new(),
                warranty: String::new(),
                notes: String::new(),
                start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                finish_date: None,
            },
            items: vec![],
            prague_type_ids: vec!["1".into()],
            treatment_type_ids: vec![],
            build_type_ids: vec![],
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customer_id"], "c1");
        assert_eq!(json["zip_code"], "01001000");
        assert_eq!(json["start_date"], "2024-03-01");
        assert_eq!(json["prague_type_ids"][0], "1");
    }
}
