//! Submit Status Component
//!
//! Save button plus the transient result of the last submission.

use leptos::prelude::*;

use order_core::SubmitState;

use crate::store::{use_form_store, OrderFormStateStoreFields};

#[component]
pub fn SubmitStatus(#[prop(into)] label: String) -> impl IntoView {
    let store = use_form_store();
    let state = move || store.submit().get();

    view! {
        <div class="submit-row">
            <button
                type="submit"
                class="submit-btn"
                disabled=move || !matches!(state(), SubmitState::Idle | SubmitState::Failed { .. })
            >
                {move || if state().is_submitting() { "Saving...".to_string() } else { label.clone() }}
            </button>
            {move || match state() {
                SubmitState::Failed { message } => view! {
                    <div class="alert alert-error" role="alert">{message}</div>
                }.into_any(),
                SubmitState::Succeeded { .. } => view! {
                    <div class="alert alert-success">"Saved"</div>
                }.into_any(),
                _ => view! { <div></div> }.into_any(),
            }}
        </div>
    }
}
