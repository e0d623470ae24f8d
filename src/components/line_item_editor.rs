//! Line Item Editor Component
//!
//! Adds a new row, or edits the row selected in the list.

use leptos::prelude::*;

use order_core::{LineItemDraft, ValidationErrors};

use crate::models::{RecordId, ServiceCatalogEntry};
use crate::store::{store_add_item, store_edit_item, use_form_store, OrderFormStateStoreFields};

#[component]
pub fn LineItemEditor(
    services: ReadSignal<Vec<ServiceCatalogEntry>>,
    editing: ReadSignal<Option<RecordId>>,
    set_editing: WriteSignal<Option<RecordId>>,
) -> impl IntoView {
    let store = use_form_store();

    let (name, set_name) = signal(String::new());
    let (details, set_details) = signal(String::new());
    let (quantity, set_quantity) = signal(String::from("1"));
    let (errors, set_errors) = signal(ValidationErrors::default());

    let fill = move |draft: LineItemDraft| {
        set_name.set(draft.name);
        set_details.set(draft.details);
        set_quantity.set(draft.quantity);
        set_errors.set(ValidationErrors::default());
    };

    // Load the selected row into the editor
    Effect::new(move |_| {
        let draft = editing
            .get()
            .and_then(|id| store.items().read_untracked().get(&id).map(LineItemDraft::from_item))
            .unwrap_or_default();
        fill(draft);
    });

    let save = move |_| {
        let draft = LineItemDraft {
            name: name.get_untracked(),
            details: details.get_untracked(),
            quantity: quantity.get_untracked(),
        };
        let target = editing.get_untracked();
        let id = target.clone().unwrap_or(RecordId::Pending(0));
        match draft.validate(id) {
            Ok(item) => {
                if target.is_some() {
                    store_edit_item(&store, item);
                } else {
                    store_add_item(&store, item);
                }
                set_editing.set(None);
                fill(LineItemDraft::default());
            }
            Err(e) => set_errors.set(e),
        }
    };

    let error_for = move |field: &'static str| {
        move || errors.get().get(field).map(|m| view! { <span class="field-error">{m.to_string()}</span> })
    };

    view! {
        <div class="line-item-editor">
            <div class="editor-field">
                <label class="editor-label">"Service"</label>
                <input
                    type="text"
                    list="service-catalog"
                    maxlength="80"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <datalist id="service-catalog">
                    <For
                        each=move || services.get()
                        key=|service| service.id.clone()
                        children=move |service| view! { <option value=service.name.clone()></option> }
                    />
                </datalist>
                {error_for("name")}
            </div>
            <div class="editor-field">
                <label class="editor-label">"Details"</label>
                <input
                    type="text"
                    maxlength="255"
                    prop:value=move || details.get()
                    on:input=move |ev| set_details.set(event_target_value(&ev))
                />
                {error_for("details")}
            </div>
            <div class="editor-field narrow">
                <label class="editor-label">"Qty"</label>
                <input
                    type="number"
                    min="1"
                    prop:value=move || quantity.get()
                    on:input=move |ev| set_quantity.set(event_target_value(&ev))
                />
                {error_for("quantity")}
            </div>
            <button type="button" class="add-item-btn" on:click=save>
                {move || if editing.get().is_some() { "Update" } else { "Add" }}
            </button>
            {move || editing.get().map(|_| view! {
                <button type="button" class="cancel-btn" on:click=move |_| set_editing.set(None)>
                    "Cancel"
                </button>
            })}
        </div>
    }
}
