//! Customer Select Component
//!
//! Search box with a short list of matching customers.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::models::Customer;

/// Searches start after this many characters
const MIN_SEARCH_LEN: usize = 2;
/// Suggestions shown at once
const MAX_SUGGESTIONS: usize = 8;

#[component]
pub fn CustomerSelect(
    #[prop(into)] selected: Signal<Option<Customer>>,
    #[prop(into)] on_select: Callback<Customer>,
    /// Shows the "select a customer" error when true
    #[prop(optional, into)]
    missing: Option<Signal<bool>>,
) -> impl IntoView {
    let ctx = use_app_context();

    let (query, set_query) = signal(String::new());
    let (results, set_results) = signal(Vec::<Customer>::new());
    let (search_error, set_search_error) = signal::<Option<String>>(None);

    let search = move |text: String| {
        set_query.set(text.clone());
        if text.trim().chars().count() < MIN_SEARCH_LEN {
            set_results.set(Vec::new());
            return;
        }
        let api = ctx.api();
        spawn_local(async move {
            match api.list_customers(&text).await {
                Ok(found) => {
                    // Drop answers to stale queries
                    if query.get_untracked() == text {
                        set_search_error.set(None);
                        set_results.set(found.into_iter().take(MAX_SUGGESTIONS).collect());
                    }
                }
                Err(e) => {
                    log::warn!("[CUSTOMER] search failed: {}", e);
                    set_search_error.set(Some(e.to_string()));
                }
            }
        });
    };

    let pick = move |customer: Customer| {
        set_query.set(String::new());
        set_results.set(Vec::new());
        on_select.run(customer);
    };

    view! {
        <div class="customer-select">
            <div class="customer-selected">
                {move || match selected.get() {
                    Some(customer) => view! {
                        <span class="customer-name">{customer.name}</span>
                    }.into_any(),
                    None => view! { <span class="customer-none">"No customer selected"</span> }.into_any(),
                }}
            </div>
            <input
                type="search"
                class="customer-search"
                placeholder="Search customers..."
                prop:value=move || query.get()
                on:input=move |ev| search(event_target_value(&ev))
            />
            <ul class="customer-results">
                <For
                    each=move || results.get()
                    key=|customer| customer.id.clone()
                    children=move |customer| {
                        let label = match &customer.document {
                            Some(doc) => format!("{} ({})", customer.name, doc),
                            None => customer.name.clone(),
                        };
                        view! {
                            <li class="customer-result" on:click=move |_| pick(customer.clone())>
                                {label}
                            </li>
                        }
                    }
                />
            </ul>
            {move || search_error.get().map(|e| view! { <span class="field-error">{e}</span> })}
            {move || missing
                .map(|flag| flag.get())
                .unwrap_or(false)
                .then(|| view! { <span class="field-error">"Select a customer"</span> })}
        </div>
    }
}
