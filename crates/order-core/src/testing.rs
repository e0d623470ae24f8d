//! In-memory backend for unit tests

use std::cell::{Cell, RefCell};

use async_trait::async_trait;

use crate::backend::{ApiError, NewLineItem, NewOrder, OrderBackend, OrderFields};
use crate::ids::RecordId;
use crate::models::{LineItem, TagDefinition, TagKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateOrder(usize),
    UpdateOrder(String),
    /// (item name, owning order)
    CreateItem(String, String),
    UpdateItem(String),
    DeleteItem(String),
    /// (kind, order, tag definition)
    CreateTag(TagKind, String, String),
    DeleteTag(TagKind, String),
}

/// Records every call; optionally fails the ones matching `fail_on`
#[derive(Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<Call>>,
    fail_on: Vec<Call>,
    next_id: Cell<u32>,
}

impl RecordingBackend {
    pub fn failing_on(call: Call) -> Self {
        Self { fail_on: vec![call], ..Default::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn handle(&self, call: Call) -> Result<String, ApiError> {
        let fails = self.fail_on.contains(&call);
        self.calls.borrow_mut().push(call);
        if fails {
            return Err(ApiError::Status { status: 500, body: "injected".into() });
        }
        self.next_id.set(self.next_id.get() + 1);
        Ok(format!("srv-{}", self.next_id.get()))
    }
}

#[async_trait(?Send)]
impl OrderBackend for RecordingBackend {
    async fn create_order(&self, order: &NewOrder) -> Result<String, ApiError> {
        self.handle(Call::CreateOrder(order.items.len()))
    }

    async fn update_order(&self, order_id: &str, _fields: &OrderFields) -> Result<(), ApiError> {
        self.handle(Call::UpdateOrder(order_id.to_string())).map(|_| ())
    }

    async fn create_item(&self, item: &NewLineItem) -> Result<RecordId, ApiError> {
        let owner = item.service_order_id.clone().unwrap_or_default();
        self.handle(Call::CreateItem(item.name.clone(), owner)).map(RecordId::Persisted)
    }

    async fn update_item(&self, id: &str, _item: &NewLineItem) -> Result<(), ApiError> {
        self.handle(Call::UpdateItem(id.to_string())).map(|_| ())
    }

    async fn delete_item(&self, id: &str) -> Result<(), ApiError> {
        self.handle(Call::DeleteItem(id.to_string())).map(|_| ())
    }

    async fn create_tag_association(
        &self,
        kind: TagKind,
        order_id: &str,
        tag_id: &str,
    ) -> Result<RecordId, ApiError> {
        self.handle(Call::CreateTag(kind, order_id.to_string(), tag_id.to_string()))
            .map(RecordId::Persisted)
    }

    async fn delete_tag_association(&self, kind: TagKind, id: &str) -> Result<(), ApiError> {
        self.handle(Call::DeleteTag(kind, id.to_string())).map(|_| ())
    }
}

pub fn line_item(id: RecordId, order: usize) -> LineItem {
    LineItem {
        id,
        name: "Spraying".to_string(),
        details: String::new(),
        quantity: 1,
        order,
        service_order_id: None,
    }
}

pub fn tag(id: &str, name: &str) -> TagDefinition {
    TagDefinition { id: id.to_string(), name: name.to_string(), order: 0 }
}
