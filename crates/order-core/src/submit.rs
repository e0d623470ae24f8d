//! Order Submission
//!
//! Submit-button state machine and the calls issued when the form is saved.

use thiserror::Error;

use crate::backend::{ApiError, NewOrder, Operation, OrderBackend, ReconcileReport};
use crate::changeset::LineItemChangeset;
use crate::draft::ValidOrder;
use crate::tags::TagSet;

/// Delay before a failed submission returns to idle
pub const SUBMIT_ERROR_DISMISS_MS: u32 = 3000;

/// Which call the form ends up making
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { order_id: String },
}

/// `Idle -> Submitting -> Succeeded | Failed -> Idle`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded { order_id: String },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a submission is already in progress")]
pub struct AlreadySubmitting;

impl SubmitState {
    pub fn begin(&mut self) -> Result<(), AlreadySubmitting> {
        match self {
            SubmitState::Idle | SubmitState::Failed { .. } => {
                *self = SubmitState::Submitting;
                Ok(())
            }
            SubmitState::Submitting | SubmitState::Succeeded { .. } => Err(AlreadySubmitting),
        }
    }

    pub fn succeed(&mut self, order_id: String) {
        *self = SubmitState::Succeeded { order_id };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = SubmitState::Failed { message: message.into() };
    }

    /// Dismiss a failure. Any other state is left alone so a late timer
    /// cannot clobber a newer submission.
    pub fn dismiss(&mut self) -> bool {
        if matches!(self, SubmitState::Failed { .. }) {
            *self = SubmitState::Idle;
            true
        } else {
            false
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmitState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub order_id: String,
    pub report: ReconcileReport,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// The order itself could not be created or updated
    #[error("could not save the order: {0}")]
    Order(ApiError),
    /// The order was saved but some child changes were not
    #[error("{} of {} changes could not be saved", .report.failures.len(), .report.attempted)]
    Partial { order_id: String, report: ReconcileReport },
}

/// Persist one order form.
///
/// Create: a single call with every line item and tag inline.
/// Edit: the scalar update, then all reconciliation passes at once.
pub async fn submit_order<B: OrderBackend + ?Sized>(
    backend: &B,
    mode: &FormMode,
    order: ValidOrder,
    customer_id: &str,
    items: &LineItemChangeset,
    tags: &TagSet,
) -> Result<SubmitOutcome, SubmitError> {
    let fields = order.into_fields(customer_id);

    match mode {
        FormMode::Create => {
            let payload = NewOrder {
                fields,
                items: items.inline_items(),
                prague_type_ids: tags.pests.tag_ids(),
                treatment_type_ids: tags.treatments.tag_ids(),
                build_type_ids: tags.builds.tag_ids(),
            };
            let order_id = backend.create_order(&payload).await.map_err(SubmitError::Order)?;
            log::info!("[SUBMIT] created order {} with {} items", order_id, payload.items.len());
            let mut report = ReconcileReport::default();
            report.record(Operation::CreateOrder, order_id.clone(), Ok::<(), ApiError>(()));
            Ok(SubmitOutcome { order_id, report })
        }
        FormMode::Edit { order_id } => {
            backend.update_order(order_id, &fields).await.map_err(SubmitError::Order)?;

            let (item_report, tag_report) =
                futures::join!(items.reconcile(backend, order_id), tags.reconcile(backend, order_id));

            let mut report = ReconcileReport::default();
            report.record(Operation::UpdateOrder, order_id.clone(), Ok::<(), ApiError>(()));
            report.merge(item_report);
            report.merge(tag_report);

            if report.is_success() {
                log::info!("[SUBMIT] updated order {} ({} calls)", order_id, report.attempted);
                Ok(SubmitOutcome { order_id: order_id.clone(), report })
            } else {
                log::error!(
                    "[SUBMIT] order {} saved with {} failed changes",
                    order_id,
                    report.failures.len()
                );
                Err(SubmitError::Partial { order_id: order_id.clone(), report })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::OrderDraft;
    use crate::ids::RecordId;
    use crate::models::{Address, TagKind};
    use crate::testing::{line_item, tag, Call, RecordingBackend};

    fn valid_order() -> ValidOrder {
        OrderDraft {
            address: Address {
                zip_code: "01001000".into(),
                street: "Praça da Sé".into(),
                district: "Sé".into(),
                city: "São Paulo".into(),
                state: "SP".into(),
            },
            value: "100".into(),
            start_date: "2024-01-10".into(),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_state_machine() {
        let mut state = SubmitState::default();
        assert!(state.begin().is_ok());
        assert_eq!(state.begin(), Err(AlreadySubmitting));

        state.fail("network down");
        assert_eq!(state.error_message(), Some("network down"));
        assert!(state.dismiss());
        assert_eq!(state, SubmitState::Idle);

        state.begin().unwrap();
        assert!(!state.dismiss());
        state.succeed("o1".into());
        assert_eq!(state.begin(), Err(AlreadySubmitting));
    }

    #[tokio::test]
    async fn test_create_is_one_call() {
        let mut items = LineItemChangeset::new();
        items.add(line_item(RecordId::Pending(0), 0));
        items.add(line_item(RecordId::Pending(0), 0));
        let mut tags = TagSet::default();
        tags.pests.add(tag("1", "Ants"));

        let backend = RecordingBackend::default();
        let outcome = submit_order(&backend, &FormMode::Create, valid_order(), "c1", &items, &tags)
            .await
            .unwrap();

        assert_eq!(backend.calls(), vec![Call::CreateOrder(2)]);
        assert_eq!(outcome.order_id, "srv-1");
    }

    #[tokio::test]
    async fn test_edit_updates_then_reconciles() {
        let mut items = LineItemChangeset::from_persisted(vec![
            line_item(RecordId::persisted("a1"), 0),
            line_item(RecordId::persisted("a2"), 1),
        ]);
        items.remove(&RecordId::persisted("a1"));
        let mut tags = TagSet::default();
        tags.builds.add(tag("4", "House"));

        let backend = RecordingBackend::default();
        let mode = FormMode::Edit { order_id: "o1".into() };
        let outcome = submit_order(&backend, &mode, valid_order(), "c1", &items, &tags).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls[0], Call::UpdateOrder("o1".into()));
        assert!(calls.contains(&Call::DeleteItem("a1".into())));
        assert!(calls.contains(&Call::UpdateItem("a2".into())));
        assert!(calls.contains(&Call::CreateTag(TagKind::Building, "o1".into(), "4".into())));
        assert_eq!(outcome.report.attempted, 4);
    }

    #[tokio::test]
    async fn test_failed_update_skips_reconciliation() {
        let mut items = LineItemChangeset::new();
        items.add(line_item(RecordId::Pending(0), 0));

        let backend = RecordingBackend::failing_on(Call::UpdateOrder("o1".into()));
        let mode = FormMode::Edit { order_id: "o1".into() };
        let err = submit_order(&backend, &mode, valid_order(), "c1", &items, &TagSet::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Order(_)));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_is_surfaced() {
        let items = LineItemChangeset::from_persisted(vec![line_item(RecordId::persisted("a1"), 0)]);
        let mut items = items;
        items.remove(&RecordId::persisted("a1"));

        let backend = RecordingBackend::failing_on(Call::DeleteItem("a1".into()));
        let mode = FormMode::Edit { order_id: "o1".into() };
        let err = submit_order(&backend, &mode, valid_order(), "c1", &items, &TagSet::default())
            .await
            .unwrap_err();

        match err {
            SubmitError::Partial { order_id, report } => {
                assert_eq!(order_id, "o1");
                assert_eq!(report.failures.len(), 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
