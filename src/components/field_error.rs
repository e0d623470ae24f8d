//! Inline validation message for one form field

use leptos::prelude::*;

use crate::store::{use_form_store, OrderFormStateStoreFields};

#[component]
pub fn FieldError(field: &'static str) -> impl IntoView {
    let store = use_form_store();

    move || {
        store
            .errors()
            .read()
            .get(field)
            .map(|message| view! { <span class="field-error">{message.to_string()}</span> })
    }
}
