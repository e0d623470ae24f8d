//! Pest Orders Frontend App
//!
//! Verifies the session, then renders the page for the current path.

use leptos::prelude::*;
use leptos::task::spawn_local;

use order_core::{ApiError, FormMode};

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::pages::{OrderFormPage, OrderListPage};
use crate::route::{current_path, login_redirect, navigate, Route};

#[derive(Clone, Copy, Debug, PartialEq)]
enum SessionState {
    Checking,
    Verified,
}

fn page_for(route: Route) -> AnyView {
    match route {
        Route::OrderList => view! { <OrderListPage /> }.into_any(),
        Route::NewOrder => view! { <OrderFormPage mode=FormMode::Create /> }.into_any(),
        Route::EditOrder(order_id) => {
            view! { <OrderFormPage mode=FormMode::Edit { order_id } /> }.into_any()
        }
        Route::NotFound => view! {
            <div class="not-found">
                <h1>"Page not found"</h1>
                <a href=Route::OrderList.href()>"Back to orders"</a>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new(AppConfig::from_env());
    provide_context(ctx.clone());

    let (session, set_session) = signal(SessionState::Checking);
    let path = current_path();
    let route = Route::parse(&path);

    // No page renders before the session check passes
    Effect::new(move |_| {
        let api = ctx.api();
        let login_route = ctx.config.login_route.clone();
        let error_route = ctx.config.error_route.clone();
        let path = path.clone();
        spawn_local(async move {
            match api.verify_session().await {
                Ok(()) => set_session.set(SessionState::Verified),
                Err(ApiError::Unauthorized) => {
                    log::info!("[SESSION] not signed in, redirecting to login");
                    navigate(&login_redirect(&login_route, &path));
                }
                Err(e) => {
                    log::error!("[SESSION] verification failed: {}", e);
                    navigate(&error_route);
                }
            }
        });
    });

    view! {
        {move || match session.get() {
            SessionState::Checking => view! { <div class="session-check">"Checking session..."</div> }.into_any(),
            SessionState::Verified => page_for(route.clone()),
        }}
    }
}
