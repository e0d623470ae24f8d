//! Order Form Page
//!
//! Create or edit one service order. Nothing is sent to the API until submit.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use order_core::{
    require_customer, submit_order, ApiError, FormMode, LineItemChangeset, SubmitError, TagKind,
    TagSet, SUBMIT_ERROR_DISMISS_MS,
};

use crate::api::ApiClient;
use crate::components::{
    load_cities, AddressFields, CustomerSelect, LineItemList, LoadError, OrderDetails,
    SubmitDiagnostics, SubmitStatus, TagToggler,
};
use crate::context::use_app_context;
use crate::models::{Customer, ServiceCatalogEntry, ServiceOrder, TagDefinition};
use crate::route::{navigate, Route};
use crate::store::{store_set_customer, OrderFormState, OrderFormStateStoreFields};

#[derive(Clone, Debug, PartialEq)]
enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Everything the form needs before it can render
struct FormData {
    services: Vec<ServiceCatalogEntry>,
    pests: Vec<TagDefinition>,
    treatments: Vec<TagDefinition>,
    builds: Vec<TagDefinition>,
    order: Option<ServiceOrder>,
}

async fn load_form_data(api: &ApiClient, mode: &FormMode) -> Result<FormData, ApiError> {
    let (services, pests, treatments, builds) = futures::try_join!(
        api.list_services(),
        api.list_tag_definitions(TagKind::Pest),
        api.list_tag_definitions(TagKind::Treatment),
        api.list_tag_definitions(TagKind::Building),
    )?;
    let order = match mode {
        FormMode::Create => None,
        FormMode::Edit { order_id } => {
            let mut order = api.get_order(order_id).await?;
            if order.customer.is_none() {
                order.customer = Some(api.get_customer(&order.customer_id).await?);
            }
            Some(order)
        }
    };
    Ok(FormData { services, pests, treatments, builds, order })
}

#[component]
pub fn OrderFormPage(mode: FormMode) -> impl IntoView {
    let ctx = use_app_context();
    let store = Store::new(OrderFormState::default());
    provide_context(store);

    let (load_state, set_load_state) = signal(LoadState::Loading);
    let (services, set_services) = signal(Vec::<ServiceCatalogEntry>::new());
    let (pests, set_pests) = signal(Vec::<TagDefinition>::new());
    let (treatments, set_treatments) = signal(Vec::<TagDefinition>::new());
    let (builds, set_builds) = signal(Vec::<TagDefinition>::new());
    let (failure_log, set_failure_log) = signal(Vec::<String>::new());

    // Initial load
    let load_ctx = ctx.clone();
    let load_mode = mode.clone();
    Effect::new(move |_| {
        let api = load_ctx.api();
        let mode = load_mode.clone();
        spawn_local(async move {
            match load_form_data(&api, &mode).await {
                Ok(data) => {
                    set_services.set(data.services);
                    set_pests.set(data.pests);
                    set_treatments.set(data.treatments);
                    set_builds.set(data.builds);
                    if let Some(order) = data.order {
                        log::info!("[FORM] loaded order {} with {} items", order.id, order.items.len());
                        let state = order.address.state.clone();
                        store.set(OrderFormState::from_order(&order));
                        load_cities(api, store, state);
                    }
                    set_load_state.set(LoadState::Ready);
                }
                Err(e) => {
                    log::error!("[FORM] initial load failed: {}", e);
                    set_load_state.set(LoadState::Failed(e.to_string()));
                }
            }
        });
    });

    let select_ctx = ctx.clone();
    let on_customer = move |customer: Customer| {
        if let Some(state) = store_set_customer(&store, customer) {
            load_cities(select_ctx.api(), store, state);
        }
    };

    let submit_mode = mode.clone();
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let customer = store.customer().get_untracked();
        store.customer_missing().set(customer.is_none());
        let validation = store.draft().read_untracked().validate();
        let valid = match validation {
            Ok(valid) => {
                store.errors().set(Default::default());
                valid
            }
            Err(errors) => {
                log::info!("[FORM] {} field(s) invalid", errors.len());
                store.errors().set(errors);
                return;
            }
        };
        let Ok(customer) = require_customer(customer.as_ref()) else {
            return;
        };
        let customer_id = customer.id.clone();

        if store.submit().write().begin().is_err() {
            return;
        }
        let log_mark = console_logger::next_seq();
        set_failure_log.set(Vec::new());

        let items = store.items().get_untracked();
        let tags = store.tags().get_untracked();
        let api = ctx.api();
        let mode = submit_mode.clone();
        spawn_local(async move {
            match submit_order(&api, &mode, valid, &customer_id, &items, &tags).await {
                Ok(outcome) => {
                    store.submit().write().succeed(outcome.order_id);
                    navigate(&Route::OrderList.href());
                }
                Err(e) => {
                    log::error!("[FORM] submit failed: {}", e);
                    // Saved rows no longer match the local changeset; resync before a retry
                    if let SubmitError::Partial { order_id, .. } = &e {
                        match api.get_order(order_id).await {
                            Ok(order) => {
                                store.items().set(LineItemChangeset::from_persisted(order.items.clone()));
                                store.tags().set(TagSet::from_order(&order));
                            }
                            Err(reload) => log::warn!("[FORM] resync of {} failed: {}", order_id, reload),
                        }
                    }
                    set_failure_log.set(
                        console_logger::recent_since(log_mark, log::Level::Warn)
                            .into_iter()
                            .map(|entry| entry.line)
                            .collect(),
                    );
                    store.submit().write().fail(e.to_string());
                    TimeoutFuture::new(SUBMIT_ERROR_DISMISS_MS).await;
                    store.submit().write().dismiss();
                }
            }
        });
    };

    let (title, submit_label) = match &mode {
        FormMode::Create => ("New service order", "Create order"),
        FormMode::Edit { .. } => ("Edit service order", "Save changes"),
    };
    let selected = Signal::derive(move || store.customer().get());
    let missing = Signal::derive(move || store.customer_missing().get());

    view! {
        {move || match load_state.get() {
            LoadState::Loading => view! { <div class="loading">"Loading..."</div> }.into_any(),
            LoadState::Failed(message) => view! { <LoadError message=message /> }.into_any(),
            LoadState::Ready => view! {
                <form class="order-form" on:submit=on_submit.clone()>
                    <div class="order-form-header">
                        <h1>{title}</h1>
                        <a class="back-link" href=Route::OrderList.href()>"Back to orders"</a>
                    </div>

                    <fieldset class="customer-section">
                        <legend>"Customer"</legend>
                        <CustomerSelect selected=selected on_select=on_customer.clone() missing=missing />
                    </fieldset>

                    <AddressFields />

                    <div class="tag-sections">
                        <TagToggler kind=TagKind::Pest definitions=pests />
                        <TagToggler kind=TagKind::Treatment definitions=treatments />
                        <TagToggler kind=TagKind::Building definitions=builds />
                    </div>

                    <LineItemList services=services />

                    <OrderDetails />

                    <SubmitStatus label=submit_label />
                    <SubmitDiagnostics lines=failure_log />
                </form>
            }.into_any(),
        }}
    }
}
