//! Tag Toggler Component
//!
//! Associated tags of one category as removable badges, the remaining
//! definitions as clickable chips.

use leptos::prelude::*;

use crate::models::{TagAssociation, TagDefinition, TagKind};
use crate::store::{store_add_tag, store_remove_tag, use_form_store, OrderFormStateStoreFields};

/// Placeholder ids are renumbered on remove, so the key carries the definition too
fn association_key(assoc: &TagAssociation) -> String {
    format!("{}:{}", assoc.id, assoc.tag.id)
}

#[component]
pub fn TagToggler(kind: TagKind, definitions: ReadSignal<Vec<TagDefinition>>) -> impl IntoView {
    let store = use_form_store();

    let associated = move || store.tags().read().get(kind).associations().to_vec();
    let available = move || {
        let all = definitions.get();
        let tags = store.tags().read();
        let open: Vec<TagDefinition> = tags.get(kind).available(&all).into_iter().cloned().collect();
        open
    };

    view! {
        <fieldset class="tag-toggler">
            <legend>{kind.label()}</legend>
            <div class="tag-badges">
                <For
                    each=associated
                    key=association_key
                    children=move |assoc| {
                        let id = assoc.id.clone();
                        view! {
                            <span class="tag-badge">
                                <span class="tag-badge-name">{assoc.tag.name.clone()}</span>
                                <button
                                    type="button"
                                    class="remove-tag-btn"
                                    on:click=move |_| store_remove_tag(&store, kind, &id)
                                >
                                    "×"
                                </button>
                            </span>
                        }
                    }
                />
            </div>
            <div class="tag-chips">
                <For
                    each=available
                    key=|definition| definition.id.clone()
                    children=move |definition| {
                        let name = definition.name.clone();
                        view! {
                            <button
                                type="button"
                                class="tag-chip"
                                on:click=move |_| store_add_tag(&store, kind, definition.clone())
                            >
                                "+ " {name}
                            </button>
                        }
                    }
                />
            </div>
            {move || if associated().is_empty() && available().is_empty() {
                view! { <div class="no-tags-message">"No options"</div> }.into_any()
            } else {
                view! { <div></div> }.into_any()
            }}
        </fieldset>
    }
}
