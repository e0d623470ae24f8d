//! Line Item Changeset
//!
//! Live ordered list of an order's line items plus the remote operations
//! that are pending until the form is submitted.
//!
//! Invariants held after every operation:
//! - `items[i].order == i`
//! - a placeholder row's id is `Pending(i)`
//! - `to_delete` and `to_update` are disjoint and hold server ids only

use std::collections::BTreeSet;

use futures::future::{join_all, FutureExt, LocalBoxFuture};

use crate::backend::{ApiError, NewLineItem, Operation, OrderBackend, ReconcileReport};
use crate::ids::RecordId;
use crate::models::{Entity, LineItem};

type PendingCall<'a> = LocalBoxFuture<'a, (Operation, String, Result<(), ApiError>)>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemChangeset {
    items: Vec<LineItem>,
    to_delete: BTreeSet<String>,
    to_update: BTreeSet<String>,
}

impl LineItemChangeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the rows the server returned, sorted by their order index.
    /// Rows whose index had to be closed up are marked for update.
    pub fn from_persisted(mut items: Vec<LineItem>) -> Self {
        items.sort_by_key(|item| item.order);
        let mut to_update = BTreeSet::new();
        for (position, item) in items.iter_mut().enumerate() {
            if item.order != position {
                item.order = position;
                if let Some(id) = item.id.as_persisted() {
                    to_update.insert(id.to_string());
                }
            }
        }
        Self { items, to_update, ..Default::default() }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn to_delete(&self) -> &BTreeSet<String> {
        &self.to_delete
    }

    pub fn to_update(&self) -> &BTreeSet<String> {
        &self.to_update
    }

    pub fn get(&self, id: &RecordId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a new row. Its id becomes the placeholder `@<len>`.
    pub fn add(&mut self, mut item: LineItem) -> RecordId {
        let position = self.items.len();
        item.id = RecordId::Pending(position);
        item.order = position;
        self.items.push(item);
        RecordId::Pending(position)
    }

    /// Replace the row with the same id, keeping its position.
    /// Returns `false` when no row has that id.
    pub fn edit(&mut self, mut item: LineItem) -> bool {
        let Some(slot) = self.items.iter_mut().find(|existing| existing.id == item.id) else {
            return false;
        };
        item.order = slot.order;
        if let Some(server_id) = item.id.as_persisted() {
            self.to_update.insert(server_id.to_string());
        }
        *slot = item;
        true
    }

    /// Drop a row and re-derive positions of the ones left behind
    pub fn remove(&mut self, id: &RecordId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        let removed = self.items.remove(index);

        if let Some(server_id) = removed.id.as_persisted() {
            self.to_update.remove(server_id);
            self.to_delete.insert(server_id.to_string());
        }

        for (position, item) in self.items.iter_mut().enumerate() {
            item.order = position;
            match &item.id {
                RecordId::Pending(_) => item.id = RecordId::Pending(position),
                RecordId::Persisted(server_id) => {
                    self.to_update.insert(server_id.clone());
                }
            }
        }

        Some(removed)
    }

    /// Payloads for create mode, where every row is new
    pub fn inline_items(&self) -> Vec<NewLineItem> {
        self.items.iter().map(|item| item.to_payload(None)).collect()
    }

    /// Flush pending operations against `order_id`.
    ///
    /// Every call is dispatched at once; none waits on another and there is
    /// no rollback. Failures are collected into the report.
    pub async fn reconcile<B: OrderBackend + ?Sized>(&self, backend: &B, order_id: &str) -> ReconcileReport {
        let mut calls: Vec<PendingCall<'_>> = Vec::new();

        for server_id in &self.to_delete {
            calls.push(
                async move {
                    let result = backend.delete_item(server_id).await;
                    (Operation::DeleteItem, server_id.clone(), result)
                }
                .boxed_local(),
            );
        }

        for item in &self.items {
            match &item.id {
                RecordId::Pending(_) => {
                    let payload = item.to_payload(Some(order_id));
                    let target = item.id.to_string();
                    calls.push(
                        async move {
                            let result = backend.create_item(&payload).await.map(|_| ());
                            (Operation::CreateItem, target, result)
                        }
                        .boxed_local(),
                    );
                }
                RecordId::Persisted(server_id) if self.to_update.contains(server_id) => {
                    let payload = item.to_payload(Some(order_id));
                    calls.push(
                        async move {
                            let result = backend.update_item(server_id, &payload).await;
                            (Operation::UpdateItem, server_id.clone(), result)
                        }
                        .boxed_local(),
                    );
                }
                RecordId::Persisted(_) => {}
            }
        }

        log::debug!("[SUBMIT] dispatching {} line item calls for order {}", calls.len(), order_id);

        let mut report = ReconcileReport::default();
        for (operation, target, result) in join_all(calls).await {
            report.record(operation, target, result);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{line_item, Call, RecordingBackend};

    fn persisted(ids: &[&str]) -> LineItemChangeset {
        LineItemChangeset::from_persisted(
            ids.iter()
                .enumerate()
                .map(|(order, id)| line_item(RecordId::persisted(*id), order))
                .collect(),
        )
    }

    fn assert_contiguous(changeset: &LineItemChangeset) {
        for (position, item) in changeset.items().iter().enumerate() {
            assert_eq!(item.order, position);
            if item.id.is_pending() {
                assert_eq!(item.id, RecordId::Pending(position));
            }
        }
    }

    #[test]
    fn test_from_persisted_sorts_by_order() {
        let changeset = LineItemChangeset::from_persisted(vec![
            line_item(RecordId::persisted("b"), 5),
            line_item(RecordId::persisted("a"), 2),
        ]);
        assert_eq!(changeset.items()[0].id, RecordId::persisted("a"));
        assert_contiguous(&changeset);
    }

    #[test]
    fn test_from_persisted_marks_closed_up_rows_for_update() {
        let changeset = LineItemChangeset::from_persisted(vec![
            line_item(RecordId::persisted("c"), 5),
            line_item(RecordId::persisted("a"), 0),
            line_item(RecordId::persisted("b"), 2),
        ]);

        assert_contiguous(&changeset);
        assert_eq!(changeset.to_update().iter().collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(changeset.to_delete().is_empty());
    }

    #[test]
    fn test_from_persisted_contiguous_has_no_pending_updates() {
        let changeset = persisted(&["a1", "a2", "a3"]);
        assert!(changeset.to_update().is_empty());
    }

    #[test]
    fn test_remove_persisted_reorders() {
        let mut changeset = persisted(&["a1", "a2", "a3"]);

        changeset.remove(&RecordId::persisted("a2"));

        let ids: Vec<_> = changeset.items().iter().map(|i| (i.id.to_string(), i.order)).collect();
        assert_eq!(ids, vec![("a1".to_string(), 0), ("a3".to_string(), 1)]);
        assert_eq!(changeset.to_delete().iter().collect::<Vec<_>>(), vec!["a2"]);
        assert!(!changeset.to_update().contains("a2"));
    }

    #[test]
    fn test_placeholder_ids_follow_position() {
        let mut changeset = LineItemChangeset::new();
        let first = changeset.add(line_item(RecordId::Pending(99), 0));
        let second = changeset.add(line_item(RecordId::Pending(99), 0));
        assert_eq!(first, RecordId::Pending(0));
        assert_eq!(second, RecordId::Pending(1));

        changeset.remove(&RecordId::Pending(0));

        assert_eq!(changeset.len(), 1);
        assert_eq!(changeset.items()[0].id, RecordId::Pending(0));
        assert_eq!(changeset.items()[0].order, 0);
        assert!(changeset.to_delete().is_empty());
    }

    #[test]
    fn test_remove_placeholder_never_schedules_delete() {
        let mut changeset = persisted(&["a1"]);
        changeset.add(line_item(RecordId::Pending(0), 0));

        changeset.remove(&RecordId::Pending(1));

        assert!(changeset.to_delete().is_empty());
        assert_contiguous(&changeset);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut changeset = persisted(&["a1"]);
        assert!(changeset.remove(&RecordId::persisted("zz")).is_none());
        assert!(changeset.to_delete().is_empty());
        assert!(changeset.to_update().is_empty());
    }

    #[test]
    fn test_edit_is_idempotent_in_update_set() {
        let mut changeset = persisted(&["a1", "a2"]);

        let mut edited = changeset.items()[1].clone();
        edited.name = "Fogging".into();
        assert!(changeset.edit(edited.clone()));
        edited.quantity = 9;
        assert!(changeset.edit(edited));

        assert_eq!(changeset.to_update().len(), 1);
        assert!(changeset.to_update().contains("a2"));
        assert_eq!(changeset.items()[1].quantity, 9);
    }

    #[test]
    fn test_edit_keeps_position() {
        let mut changeset = persisted(&["a1", "a2"]);
        let mut edited = changeset.items()[0].clone();
        edited.order = 7;
        changeset.edit(edited);
        assert_eq!(changeset.items()[0].order, 0);
    }

    #[test]
    fn test_edit_placeholder_not_tracked() {
        let mut changeset = LineItemChangeset::new();
        let id = changeset.add(line_item(RecordId::Pending(0), 0));
        let mut edited = changeset.get(&id).unwrap().clone();
        edited.details = "Kitchen only".into();

        assert!(changeset.edit(edited));
        assert!(changeset.to_update().is_empty());
        assert_eq!(changeset.items()[0].details, "Kitchen only");
    }

    #[test]
    fn test_edit_unknown_id_returns_false() {
        let mut changeset = persisted(&["a1"]);
        assert!(!changeset.edit(line_item(RecordId::persisted("nope"), 0)));
        assert!(changeset.to_update().is_empty());
    }

    #[test]
    fn test_mixed_sequence_keeps_invariants() {
        let mut changeset = persisted(&["a1", "a2", "a3"]);
        changeset.add(line_item(RecordId::Pending(0), 0));
        changeset.add(line_item(RecordId::Pending(0), 0));
        changeset.remove(&RecordId::persisted("a1"));
        assert_contiguous(&changeset);
        changeset.remove(&RecordId::Pending(2));
        assert_contiguous(&changeset);
        changeset.add(line_item(RecordId::Pending(0), 0));
        changeset.remove(&RecordId::persisted("a3"));
        assert_contiguous(&changeset);

        assert!(changeset.to_delete().is_disjoint(changeset.to_update()));
        assert_eq!(changeset.to_delete().len(), 2);
    }

    #[tokio::test]
    async fn test_reconcile_issues_minimal_calls() {
        let mut changeset = persisted(&["a1", "a2", "a3", "a4"]);
        let mut edited = changeset.items()[3].clone();
        edited.quantity = 3;
        changeset.edit(edited);
        changeset.add(line_item(RecordId::Pending(0), 0));

        let backend = RecordingBackend::default();
        let report = changeset.reconcile(&backend, "o1").await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&Call::UpdateItem("a4".into())));
        assert!(calls.contains(&Call::CreateItem("Spraying".into(), "o1".into())));
        assert_eq!(report.attempted, 2);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_reconcile_after_remove() {
        let mut changeset = persisted(&["a1", "a2", "a3"]);
        changeset.remove(&RecordId::persisted("a2"));

        let backend = RecordingBackend::default();
        changeset.reconcile(&backend, "o1").await;

        let calls = backend.calls();
        assert_eq!(calls.iter().filter(|c| matches!(c, Call::DeleteItem(_))).count(), 1);
        assert!(calls.contains(&Call::DeleteItem("a2".into())));
        assert!(calls.contains(&Call::UpdateItem("a3".into())));
        assert!(!calls.contains(&Call::UpdateItem("a2".into())));
    }

    #[tokio::test]
    async fn test_reconcile_untouched_is_silent() {
        let changeset = persisted(&["a1", "a2"]);
        let backend = RecordingBackend::default();
        let report = changeset.reconcile(&backend, "o1").await;
        assert!(backend.calls().is_empty());
        assert_eq!(report.attempted, 0);
    }

    #[tokio::test]
    async fn test_reconcile_reports_failures_without_stopping() {
        let mut changeset = persisted(&["a1", "a2"]);
        changeset.remove(&RecordId::persisted("a1"));
        changeset.add(line_item(RecordId::Pending(0), 0));

        let backend = RecordingBackend::failing_on(Call::DeleteItem("a1".into()));
        let report = changeset.reconcile(&backend, "o1").await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].operation, Operation::DeleteItem);
        assert_eq!(backend.calls().len(), 3);
    }

    #[test]
    fn test_inline_items_have_no_owner() {
        let mut changeset = LineItemChangeset::new();
        changeset.add(line_item(RecordId::Pending(0), 0));
        changeset.add(line_item(RecordId::Pending(0), 0));
        let inline = changeset.inline_items();
        assert_eq!(inline.len(), 2);
        assert_eq!(inline[1].order, 1);
        assert!(inline.iter().all(|i| i.service_order_id.is_none()));
    }
}
