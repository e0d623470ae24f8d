//! Order List Page
//!
//! Paginated service orders, optionally filtered by customer.

use leptos::prelude::*;
use leptos::task::spawn_local;

use order_core::OrderPage;

use crate::api::ListQuery;
use crate::components::{CustomerSelect, DeleteConfirmButton, LoadError};
use crate::context::use_app_context;
use crate::models::{address_line, format_money, Customer, ServiceOrder};
use crate::route::Route;

#[derive(Clone, Debug, PartialEq)]
enum ListState {
    Loading,
    Loaded(OrderPage),
    Failed(String),
}

fn customer_label(order: &ServiceOrder) -> String {
    order
        .customer
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("#{}", order.customer_id))
}

#[component]
pub fn OrderListPage() -> impl IntoView {
    let ctx = use_app_context();
    let per_page = ctx.config.page_size;

    let (page, set_page) = signal(1u32);
    let (customer, set_customer) = signal::<Option<Customer>>(None);
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let (state, set_state) = signal(ListState::Loading);
    let (action_error, set_action_error) = signal::<Option<String>>(None);

    // Load orders when page, filter or trigger changes
    let load_ctx = ctx.clone();
    Effect::new(move |_| {
        let _ = reload_trigger.get();
        let query = ListQuery {
            page: page.get(),
            per_page,
            customer_id: customer.get().map(|c| c.id),
        };
        let api = load_ctx.api();
        spawn_local(async move {
            match api.list_orders(&query).await {
                Ok(loaded) => {
                    log::info!("[LIST] page {} of {}: {} orders", loaded.page, loaded.total_pages, loaded.orders.len());
                    set_state.set(ListState::Loaded(loaded));
                }
                Err(e) => {
                    log::error!("[LIST] load failed: {}", e);
                    set_state.set(ListState::Failed(e.to_string()));
                }
            }
        });
    });

    let delete_ctx = ctx.clone();
    let delete_order = move |id: String| {
        let api = delete_ctx.api();
        spawn_local(async move {
            match api.delete_order(&id).await {
                Ok(()) => {
                    set_action_error.set(None);
                    set_reload_trigger.update(|v| *v += 1);
                }
                Err(e) => set_action_error.set(Some(format!("Could not delete order {}: {}", id, e))),
            }
        });
    };

    let pick_customer = move |picked: Customer| {
        set_page.set(1);
        set_customer.set(Some(picked));
    };

    view! {
        <main class="order-list-page">
            <div class="order-list-header">
                <h1>"Service orders"</h1>
                <a class="new-order-btn" href=Route::NewOrder.href()>"New order"</a>
            </div>

            <div class="order-filter">
                <CustomerSelect selected=customer on_select=pick_customer />
                {move || customer.get().map(|_| view! {
                    <button
                        type="button"
                        class="clear-filter-btn"
                        on:click=move |_| {
                            set_page.set(1);
                            set_customer.set(None);
                        }
                    >
                        "Clear filter"
                    </button>
                })}
            </div>

            {move || action_error.get().map(|e| view! { <div class="alert alert-error">{e}</div> })}

            {move || match state.get() {
                ListState::Loading => view! { <div class="loading">"Loading..."</div> }.into_any(),
                ListState::Failed(message) => view! { <LoadError message=message /> }.into_any(),
                ListState::Loaded(loaded) => {
                    let has_prev = loaded.has_prev();
                    let has_next = loaded.has_next();
                    let summary = format!("Page {} of {}", loaded.page, loaded.total_pages);
                    let empty = loaded.orders.is_empty();
                    let delete_order = delete_order.clone();
                    view! {
                        <table class="order-table">
                            <thead>
                                <tr>
                                    <th>"Customer"</th>
                                    <th>"Address"</th>
                                    <th>"Start"</th>
                                    <th>"Value"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || loaded.orders.clone()
                                    key=|order| order.id.clone()
                                    children=move |order| {
                                        let id = order.id.clone();
                                        let delete_order = delete_order.clone();
                                        view! {
                                            <tr>
                                                <td>{customer_label(&order)}</td>
                                                <td>{address_line(&order)}</td>
                                                <td>{order.start_date.format("%d/%m/%Y").to_string()}</td>
                                                <td class="money">{format_money(&order.value)}</td>
                                                <td class="row-actions">
                                                    <a class="edit-btn" href=Route::EditOrder(order.id.clone()).href()>"Edit"</a>
                                                    <DeleteConfirmButton
                                                        button_class="delete-btn"
                                                        prompt="Delete this order?"
                                                        on_confirm=move |_| delete_order(id.clone())
                                                    />
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                        {empty.then(|| view! { <div class="no-items-message">"No orders found"</div> })}
                        <div class="pager">
                            <button
                                type="button"
                                disabled=!has_prev
                                on:click=move |_| set_page.update(|p| *p = p.saturating_sub(1).max(1))
                            >
                                "Previous"
                            </button>
                            <span class="pager-summary">{summary}</span>
                            <button
                                type="button"
                                disabled=!has_next
                                on:click=move |_| set_page.update(|p| *p += 1)
                            >
                                "Next"
                            </button>
                        </div>
                    }.into_any()
                }
            }}
        </main>
    }
}
