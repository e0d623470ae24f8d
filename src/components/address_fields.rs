//! Address Fields Component
//!
//! Order address with the same-as-customer toggle and postal code autofill.

use leptos::prelude::*;
use leptos::task::spawn_local;

use order_core::normalize_zip;

use crate::api::ApiClient;
use crate::components::field_error::FieldError;
use crate::context::use_app_context;
use crate::store::{
    store_apply_postal, store_set_same_address, store_update_draft, use_form_store, FormStore,
    OrderFormStateStoreFields,
};

/// Brazilian federative units
pub const STATES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Load the city list of `state` into the store
pub fn load_cities(api: ApiClient, store: FormStore, state: String) {
    if state.trim().is_empty() {
        store.cities().set(Vec::new());
        return;
    }
    spawn_local(async move {
        match api.list_cities(&state).await {
            Ok(cities) => store.cities().set(cities),
            Err(e) => {
                log::warn!("[ADDRESS] city list for {} failed: {}", state, e);
                store.cities().set(Vec::new());
            }
        }
    });
}

/// Fire the postal lookup once the code is complete
fn lookup_zip(api: ApiClient, store: FormStore, raw: String) {
    let Some(zip) = normalize_zip(&raw) else {
        return;
    };
    spawn_local(async move {
        match api.lookup_postal_code(&zip).await {
            Ok(Some(found)) => {
                let state = found.state.clone();
                store_apply_postal(&store, found);
                load_cities(api, store, state);
            }
            Ok(None) => log::info!("[ADDRESS] postal code {} not found", zip),
            Err(e) => log::warn!("[ADDRESS] postal lookup failed: {}", e),
        }
    });
}

#[component]
fn TextField(
    label: &'static str,
    field: &'static str,
    max_len: usize,
    value: Signal<String>,
    readonly: Signal<bool>,
    on_input: impl Fn(String) + Copy + 'static,
) -> impl IntoView {
    view! {
        <div class="form-field">
            <label class="form-label">{label}</label>
            <input
                type="text"
                maxlength=max_len.to_string()
                prop:readonly=move || readonly.get()
                prop:value=move || value.get()
                on:input=move |ev| on_input(event_target_value(&ev))
            />
            <FieldError field=field />
        </div>
    }
}

#[component]
pub fn AddressFields() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_form_store();

    let same_address = Signal::derive(move || store.draft().read().same_address);
    let has_customer = move || store.customer().read().is_some();
    let address_field = move |pick: fn(&order_core::Address) -> String| {
        Signal::derive(move || pick(&store.draft().read().address))
    };

    let toggle_ctx = ctx.clone();
    let on_toggle = move |ev: web_sys::Event| {
        let on = event_target_checked(&ev);
        if let Some(state) = store_set_same_address(&store, on) {
            load_cities(toggle_ctx.api(), store, state);
        } else if !on {
            store.cities().set(Vec::new());
        }
    };

    let zip_ctx = ctx.clone();
    let on_zip = move |value: String| {
        store_update_draft(&store, |d| d.address.zip_code = value.clone());
        lookup_zip(zip_ctx.api(), store, value);
    };

    let state_ctx = ctx.clone();
    let on_state = move |ev: web_sys::Event| {
        let state = event_target_value(&ev);
        store_update_draft(&store, |d| {
            d.address.state = state.clone();
            d.address.city = String::new();
        });
        load_cities(state_ctx.api(), store, state);
    };

    // Keep the current city selectable even before the list arrives
    let city_options = move || {
        let current = store.draft().read().address.city.clone();
        let mut cities = store.cities().get();
        if !current.is_empty() && !cities.contains(&current) {
            cities.insert(0, current);
        }
        cities
    };

    view! {
        <fieldset class="address-fields">
            <legend>"Address"</legend>
            <label class="checkbox-label">
                <input
                    type="checkbox"
                    prop:checked=move || same_address.get()
                    prop:disabled=move || !has_customer()
                    on:change=on_toggle
                />
                "Same as customer"
            </label>

            <div class="form-field">
                <label class="form-label">"Zip code"</label>
                <input
                    type="text"
                    inputmode="numeric"
                    maxlength="9"
                    prop:readonly=move || same_address.get()
                    prop:value=move || store.draft().read().address.zip_code.clone()
                    on:input=move |ev| on_zip(event_target_value(&ev))
                />
                <FieldError field="zip_code" />
            </div>

            <TextField
                label="Street"
                field="street"
                max_len=120
                value=address_field(|a| a.street.clone())
                readonly=same_address
                on_input=move |v: String| store_update_draft(&store, |d| d.address.street = v)
            />
            <TextField
                label="District"
                field="district"
                max_len=60
                value=address_field(|a| a.district.clone())
                readonly=same_address
                on_input=move |v: String| store_update_draft(&store, |d| d.address.district = v)
            />

            <div class="form-field">
                <label class="form-label">"State"</label>
                <select
                    prop:disabled=move || same_address.get()
                    prop:value=move || store.draft().read().address.state.clone()
                    on:change=on_state
                >
                    <option value="">"--"</option>
                    {STATES.iter().map(|uf| view! { <option value=*uf>{*uf}</option> }).collect_view()}
                </select>
                <FieldError field="state" />
            </div>

            <div class="form-field">
                <label class="form-label">"City"</label>
                <select
                    prop:disabled=move || same_address.get()
                    prop:value=move || store.draft().read().address.city.clone()
                    on:change=move |ev| {
                        let city = event_target_value(&ev);
                        store_update_draft(&store, |d| d.address.city = city);
                    }
                >
                    <option value="">"--"</option>
                    <For
                        each=city_options
                        key=|city| city.clone()
                        children=move |city| view! { <option value=city.clone()>{city.clone()}</option> }
                    />
                </select>
                <FieldError field="city" />
            </div>
        </fieldset>
    }
}
