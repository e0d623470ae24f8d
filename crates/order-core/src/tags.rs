//! Tag Association Toggler
//!
//! Associations of one tag category with an order. Adding is local until
//! submit; removing a persisted association schedules a delete.

use std::collections::BTreeSet;

use futures::future::{join_all, FutureExt, LocalBoxFuture};

use crate::backend::{ApiError, Operation, OrderBackend, ReconcileReport};
use crate::ids::RecordId;
use crate::models::{Entity, ServiceOrder, TagAssociation, TagDefinition, TagKind};

#[derive(Debug, Clone, PartialEq)]
pub struct TagToggler {
    kind: TagKind,
    live: Vec<TagAssociation>,
    to_delete: BTreeSet<String>,
}

impl TagToggler {
    pub fn new(kind: TagKind) -> Self {
        Self { kind, live: Vec::new(), to_delete: BTreeSet::new() }
    }

    pub fn from_persisted(kind: TagKind, live: Vec<TagAssociation>) -> Self {
        Self { kind, live, to_delete: BTreeSet::new() }
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn associations(&self) -> &[TagAssociation] {
        &self.live
    }

    pub fn to_delete(&self) -> &BTreeSet<String> {
        &self.to_delete
    }

    pub fn is_associated(&self, definition: &TagDefinition) -> bool {
        self.live.iter().any(|assoc| assoc.tag.id == definition.id)
    }

    /// Definitions that can still be offered as "add" chips, in definition order
    pub fn available<'a>(&self, definitions: &'a [TagDefinition]) -> Vec<&'a TagDefinition> {
        let mut available: Vec<_> = definitions.iter().filter(|d| !self.is_associated(d)).collect();
        available.sort_by_key(|d| d.order);
        available
    }

    /// Link a definition with a placeholder id `@<len>`.
    /// Returns `None` if it is already associated.
    pub fn add(&mut self, definition: TagDefinition) -> Option<RecordId> {
        if self.is_associated(&definition) {
            return None;
        }
        let id = RecordId::Pending(self.live.len());
        self.live.push(TagAssociation { id: id.clone(), service_order_id: None, tag: definition });
        Some(id)
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<TagAssociation> {
        let index = self.live.iter().position(|assoc| assoc.id() == id)?;
        let removed = self.live.remove(index);
        if let Some(server_id) = removed.id.as_persisted() {
            self.to_delete.insert(server_id.to_string());
        }
        // Keep placeholders equal to their position so the next `@<len>` is unique
        for (position, assoc) in self.live.iter_mut().enumerate() {
            if assoc.id.is_pending() {
                assoc.id = RecordId::Pending(position);
            }
        }
        Some(removed)
    }

    /// Tag ids for create mode, where every association is new
    pub fn tag_ids(&self) -> Vec<String> {
        self.live.iter().map(|assoc| assoc.tag.id.clone()).collect()
    }

    /// Flush this category: one delete per removed association,
    /// one create per placeholder. Associations have no update case.
    pub async fn reconcile<B: OrderBackend + ?Sized>(&self, backend: &B, order_id: &str) -> ReconcileReport {
        let kind = self.kind;
        let mut calls: Vec<LocalBoxFuture<'_, (Operation, String, Result<(), ApiError>)>> = Vec::new();

        for server_id in &self.to_delete {
            calls.push(
                async move {
                    let result = backend.delete_tag_association(kind, server_id).await;
                    (Operation::DeleteTag(kind), server_id.clone(), result)
                }
                .boxed_local(),
            );
        }

        for assoc in self.live.iter().filter(|assoc| assoc.id.is_pending()) {
            let target = format!("{}:{}", assoc.id, assoc.tag.id);
            calls.push(
                async move {
                    let result = backend
                        .create_tag_association(kind, order_id, &assoc.tag.id)
                        .await
                        .map(|_| ());
                    (Operation::CreateTag(kind), target, result)
                }
                .boxed_local(),
            );
        }

        let mut report = ReconcileReport::default();
        for (operation, target, result) in join_all(calls).await {
            report.record(operation, target, result);
        }
        report
    }
}

/// The three tag categories of one order
#[derive(Debug, Clone, PartialEq)]
pub struct TagSet {
    pub pests: TagToggler,
    pub treatments: TagToggler,
    pub builds: TagToggler,
}

impl Default for TagSet {
    fn default() -> Self {
        Self {
            pests: TagToggler::new(TagKind::Pest),
            treatments: TagToggler::new(TagKind::Treatment),
            builds: TagToggler::new(TagKind::Building),
        }
    }
}

impl TagSet {
    pub fn from_order(order: &ServiceOrder) -> Self {
        Self {
            pests: TagToggler::from_persisted(TagKind::Pest, order.pragues.clone()),
            treatments: TagToggler::from_persisted(TagKind::Treatment, order.treatments.clone()),
            builds: TagToggler::from_persisted(TagKind::Building, order.builds.clone()),
        }
    }

    pub fn get(&self, kind: TagKind) -> &TagToggler {
        match kind {
            TagKind::Pest => &self.pests,
            TagKind::Treatment => &self.treatments,
            TagKind::Building => &self.builds,
        }
    }

    pub fn get_mut(&mut self, kind: TagKind) -> &mut TagToggler {
        match kind {
            TagKind::Pest => &mut self.pests,
            TagKind::Treatment => &mut self.treatments,
            TagKind::Building => &mut self.builds,
        }
    }

    /// Reconcile all three categories concurrently
    pub async fn reconcile<B: OrderBackend + ?Sized>(&self, backend: &B, order_id: &str) -> ReconcileReport {
        let (pests, treatments, builds) = futures::join!(
            self.pests.reconcile(backend, order_id),
            self.treatments.reconcile(backend, order_id),
            self.builds.reconcile(backend, order_id),
        );
        let mut report = pests;
        report.merge(treatments);
        report.merge(builds);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tag, Call, RecordingBackend};

    fn persisted_assoc(id: &str, definition: TagDefinition) -> TagAssociation {
        TagAssociation {
            id: RecordId::persisted(id),
            service_order_id: Some("o1".into()),
            tag: definition,
        }
    }

    #[test]
    fn test_add_uses_placeholder() {
        let mut toggler = TagToggler::new(TagKind::Pest);
        assert_eq!(toggler.add(tag("1", "Ants")), Some(RecordId::Pending(0)));
        assert_eq!(toggler.add(tag("2", "Rats")), Some(RecordId::Pending(1)));
        assert!(toggler.is_associated(&tag("1", "Ants")));
    }

    #[test]
    fn test_add_twice_is_noop() {
        let mut toggler = TagToggler::new(TagKind::Pest);
        toggler.add(tag("1", "Ants"));
        assert_eq!(toggler.add(tag("1", "Ants")), None);
        assert_eq!(toggler.associations().len(), 1);
    }

    #[test]
    fn test_available_excludes_associated() {
        let definitions = vec![
            TagDefinition { id: "1".into(), name: "Ants".into(), order: 1 },
            TagDefinition { id: "2".into(), name: "Rats".into(), order: 0 },
            TagDefinition { id: "3".into(), name: "Termites".into(), order: 2 },
        ];
        let mut toggler = TagToggler::new(TagKind::Pest);
        toggler.add(definitions[2].clone());

        let names: Vec<_> = toggler.available(&definitions).iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Rats", "Ants"]);
    }

    #[test]
    fn test_remove_persisted_schedules_delete() {
        let mut toggler =
            TagToggler::from_persisted(TagKind::Treatment, vec![persisted_assoc("t9", tag("1", "Gel"))]);
        toggler.remove(&RecordId::persisted("t9"));
        assert!(toggler.to_delete().contains("t9"));
        assert!(!toggler.is_associated(&tag("1", "Gel")));
    }

    #[test]
    fn test_remove_placeholder_is_local() {
        let mut toggler = TagToggler::new(TagKind::Building);
        let id = toggler.add(tag("1", "House")).unwrap();
        toggler.remove(&id);
        assert!(toggler.to_delete().is_empty());
        assert!(toggler.associations().is_empty());
    }

    #[test]
    fn test_placeholders_stay_unique_after_remove() {
        let mut toggler =
            TagToggler::from_persisted(TagKind::Pest, vec![persisted_assoc("p1", tag("1", "Ants"))]);
        toggler.add(tag("2", "Rats"));
        toggler.remove(&RecordId::persisted("p1"));
        let added = toggler.add(tag("3", "Roaches")).unwrap();

        let ids: Vec<_> = toggler.associations().iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec![RecordId::Pending(0), RecordId::Pending(1)]);
        assert_eq!(added, RecordId::Pending(1));
    }

    #[tokio::test]
    async fn test_reconcile_creates_and_deletes() {
        let mut toggler = TagToggler::from_persisted(
            TagKind::Pest,
            vec![persisted_assoc("p1", tag("1", "Ants")), persisted_assoc("p2", tag("2", "Rats"))],
        );
        toggler.remove(&RecordId::persisted("p1"));
        toggler.add(tag("3", "Termites"));

        let backend = RecordingBackend::default();
        let report = toggler.reconcile(&backend, "o1").await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&Call::DeleteTag(TagKind::Pest, "p1".into())));
        assert!(calls.contains(&Call::CreateTag(TagKind::Pest, "o1".into(), "3".into())));
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_tag_set_reconciles_each_category() {
        let mut tags = TagSet::default();
        tags.pests.add(tag("1", "Ants"));
        tags.treatments.add(tag("5", "Gel"));
        tags.builds.add(tag("9", "Warehouse"));

        let backend = RecordingBackend::failing_on(Call::CreateTag(TagKind::Treatment, "o1".into(), "5".into()));
        let report = tags.reconcile(&backend, "o1").await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].operation, Operation::CreateTag(TagKind::Treatment));
    }
}
