//! Full-page error shown when initial data cannot be loaded

use leptos::prelude::*;

#[component]
pub fn LoadError(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="load-error">
            <h2>"Something went wrong"</h2>
            <p class="load-error-detail">{message}</p>
            <p>"Reload the page to try again."</p>
        </div>
    }
}
