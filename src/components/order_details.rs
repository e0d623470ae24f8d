//! Order Details Component
//!
//! Scalar order fields: occupants, value, terms, dates and notes.

use leptos::prelude::*;

use order_core::OrderDraft;

use crate::components::field_error::FieldError;
use crate::store::{store_update_draft, use_form_store, OrderFormStateStoreFields};

#[component]
fn FlagField(
    label: &'static str,
    read: fn(&OrderDraft) -> bool,
    write: fn(&mut OrderDraft, bool),
) -> impl IntoView {
    let store = use_form_store();
    view! {
        <label class="checkbox-label">
            <input
                type="checkbox"
                prop:checked=move || read(&store.draft().read())
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    store_update_draft(&store, |d| write(d, checked));
                }
            />
            {label}
        </label>
    }
}

#[component]
pub fn OrderDetails() -> impl IntoView {
    let store = use_form_store();
    let draft = move || store.draft().get();

    view! {
        <fieldset class="order-details">
            <legend>"Details"</legend>

            <div class="occupants-row">
                <FlagField label="Animals on site" read=|d| d.has_animals write=|d, v| d.has_animals = v />
                <FlagField label="Elderly occupants" read=|d| d.has_elderly write=|d, v| d.has_elderly = v />
                <FlagField label="Allergic occupants" read=|d| d.has_allergic write=|d, v| d.has_allergic = v />
            </div>

            <div class="form-field">
                <label class="form-label">"Value"</label>
                <input
                    type="text"
                    inputmode="decimal"
                    prop:value=move || draft().value
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        store_update_draft(&store, |d| d.value = value);
                    }
                />
                <FieldError field="value" />
            </div>

            <div class="form-row">
                <div class="form-field">
                    <label class="form-label">"Start date"</label>
                    <input
                        type="date"
                        prop:value=move || draft().start_date
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            store_update_draft(&store, |d| d.start_date = value);
                        }
                    />
                    <FieldError field="start_date" />
                </div>
                <div class="form-field">
                    <label class="form-label">"Finish date"</label>
                    <input
                        type="date"
                        prop:value=move || draft().finish_date
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            store_update_draft(&store, |d| d.finish_date = value);
                        }
                    />
                    <FieldError field="finish_date" />
                </div>
            </div>

            <div class="form-field">
                <label class="form-label">"Payment terms"</label>
                <input
                    type="text"
                    maxlength="255"
                    prop:value=move || draft().payment_terms
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        store_update_draft(&store, |d| d.payment_terms = value);
                    }
                />
                <FieldError field="payment_terms" />
            </div>

            <div class="form-field">
                <label class="form-label">"Warranty"</label>
                <input
                    type="text"
                    maxlength="255"
                    prop:value=move || draft().warranty
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        store_update_draft(&store, |d| d.warranty = value);
                    }
                />
                <FieldError field="warranty" />
            </div>

            <div class="form-field">
                <label class="form-label">"Notes"</label>
                <textarea
                    maxlength="1000"
                    prop:value=move || draft().notes
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        store_update_draft(&store, |d| d.notes = value);
                    }
                ></textarea>
                <FieldError field="notes" />
            </div>
        </fieldset>
    }
}
