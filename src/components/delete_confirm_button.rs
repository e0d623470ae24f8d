//! Inline Delete Confirmation
//!
//! A remove button that asks once before running `on_confirm`.

use leptos::prelude::*;

/// Remove button with an inline "are you sure" step
///
/// * `button_class` - CSS class of the initial button
/// * `prompt` - question shown while confirming, e.g. "Remove this service?"
/// * `on_confirm` - runs after the user answers yes
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    #[prop(into)] prompt: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (asking, set_asking) = signal(false);
    let title = prompt.clone();

    view! {
        {move || if asking.get() {
            view! {
                <span class="confirm-inline" role="alertdialog">
                    <span class="confirm-inline-prompt">{prompt.clone()}</span>
                    <button
                        type="button"
                        class="confirm-inline-yes"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_asking.set(false);
                            on_confirm.run(());
                        }
                    >
                        "Yes"
                    </button>
                    <button
                        type="button"
                        class="confirm-inline-no"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_asking.set(false);
                        }
                    >
                        "No"
                    </button>
                </span>
            }
            .into_any()
        } else {
            view! {
                <button
                    type="button"
                    class=button_class.clone()
                    title=title.clone()
                    aria-label=title.clone()
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(true);
                    }
                >
                    "Remove"
                </button>
            }
            .into_any()
        }}
    }
}
