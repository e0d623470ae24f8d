//! Order Form State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. All local edits
//! of one order form live here until submit.

use leptos::prelude::*;
use reactive_stores::Store;

use order_core::{
    apply_postal_lookup, set_same_address, Customer, LineItem, LineItemChangeset, OrderDraft,
    PostalAddress, RecordId, ServiceOrder, SubmitState, TagDefinition, TagKind, TagSet,
    ValidationErrors,
};

/// State of one order form with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct OrderFormState {
    /// Selected customer
    pub customer: Option<Customer>,
    /// Submit was attempted without a customer
    pub customer_missing: bool,
    /// Scalar fields as typed
    pub draft: OrderDraft,
    /// Errors from the last validation run
    pub errors: ValidationErrors,
    /// Line items and their pending operations
    pub items: LineItemChangeset,
    /// Tag associations of the three categories
    pub tags: TagSet,
    /// Cities of the selected state
    pub cities: Vec<String>,
    pub submit: SubmitState,
}

impl OrderFormState {
    /// Form populated from a loaded order (edit mode)
    pub fn from_order(order: &ServiceOrder) -> Self {
        Self {
            customer: order.customer.clone(),
            draft: OrderDraft::from_order(order),
            items: LineItemChangeset::from_persisted(order.items.clone()),
            tags: TagSet::from_order(order),
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type FormStore = Store<OrderFormState>;

/// Get the form store from context
pub fn use_form_store() -> FormStore {
    expect_context::<FormStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Edit the scalar fields
pub fn store_update_draft(store: &FormStore, f: impl FnOnce(&mut OrderDraft)) {
    f(&mut store.draft().write());
}

/// Pick a customer. Returns the state whose cities should be loaded when
/// the same-address toggle is on.
pub fn store_set_customer(store: &FormStore, customer: Customer) -> Option<String> {
    store.customer_missing().set(false);
    let same_address = store.draft().read().same_address;
    let reload_state = if same_address {
        set_same_address(&mut store.draft().write(), true, &customer)
    } else {
        None
    };
    store.customer().set(Some(customer));
    reload_state
}

/// Switch the same-address toggle. Returns the state whose cities should be loaded.
pub fn store_set_same_address(store: &FormStore, on: bool) -> Option<String> {
    let customer = store.customer().get()?;
    set_same_address(&mut store.draft().write(), on, &customer)
}

pub fn store_apply_postal(store: &FormStore, found: PostalAddress) {
    apply_postal_lookup(&mut store.draft().write(), found);
}

pub fn store_add_item(store: &FormStore, item: LineItem) -> RecordId {
    store.items().write().add(item)
}

pub fn store_edit_item(store: &FormStore, item: LineItem) -> bool {
    store.items().write().edit(item)
}

pub fn store_remove_item(store: &FormStore, id: &RecordId) {
    store.items().write().remove(id);
}

pub fn store_add_tag(store: &FormStore, kind: TagKind, definition: TagDefinition) {
    store.tags().write().get_mut(kind).add(definition);
}

pub fn store_remove_tag(store: &FormStore, kind: TagKind, id: &RecordId) {
    store.tags().write().get_mut(kind).remove(id);
}
