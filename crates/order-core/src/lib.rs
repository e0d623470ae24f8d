//! Service Order Core
//!
//! Domain layer for the service order admin UI:
//! - ids / models: record identity and entities
//! - changeset / tags: local edits waiting to be flushed on submit
//! - draft / address: form field state and validation
//! - backend / submit: the remote API seam and the submission protocol
//!
//! This crate has no browser dependencies so it can be tested natively.

mod ids;
mod models;
mod backend;
mod changeset;
mod tags;
mod draft;
mod address;
mod submit;

#[cfg(test)]
mod testing;

pub use ids::{RecordId, PENDING_PREFIX};
pub use models::{
    Address, Customer, Entity, LineItem, OrderPage, ServiceCatalogEntry, ServiceOrder,
    TagAssociation, TagDefinition, TagKind,
};
pub use backend::{
    ApiError, NewLineItem, NewOrder, Operation, OperationFailure, OrderBackend, OrderFields,
    ReconcileReport,
};
pub use changeset::LineItemChangeset;
pub use tags::{TagSet, TagToggler};
pub use draft::{
    LineItemDraft, MissingCustomer, OrderDraft, ValidOrder, ValidationErrors, require_customer,
};
pub use address::{apply_postal_lookup, normalize_zip, set_same_address, PostalAddress, ZIP_LEN};
pub use submit::{
    submit_order, AlreadySubmitting, FormMode, SubmitError, SubmitOutcome, SubmitState,
    SUBMIT_ERROR_DISMISS_MS,
};
