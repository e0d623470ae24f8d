//! Line Item List Component
//!
//! The order's services with edit and delete actions, and the row editor below.

use leptos::prelude::*;

use crate::components::delete_confirm_button::DeleteConfirmButton;
use crate::components::line_item_editor::LineItemEditor;
use crate::models::{LineItem, RecordId, ServiceCatalogEntry};
use crate::store::{store_remove_item, use_form_store, OrderFormStateStoreFields};

/// Rows re-render whenever their content or position changes
fn row_key(item: &LineItem) -> String {
    format!("{}|{}|{}|{}|{}", item.id, item.order, item.name, item.details, item.quantity)
}

#[component]
pub fn LineItemList(services: ReadSignal<Vec<ServiceCatalogEntry>>) -> impl IntoView {
    let store = use_form_store();
    let (editing, set_editing) = signal::<Option<RecordId>>(None);

    let rows = move || store.items().read().items().to_vec();

    view! {
        <section class="line-items">
            <h3>"Services"</h3>
            <table class="line-items-table">
                <thead>
                    <tr>
                        <th>"#"</th>
                        <th>"Service"</th>
                        <th>"Details"</th>
                        <th>"Qty"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=rows
                        key=row_key
                        children=move |item| {
                            let edit_id = item.id.clone();
                            let delete_id = item.id.clone();
                            let row_id = item.id.clone();
                            let is_editing = move || editing.get().as_ref() == Some(&row_id);
                            view! {
                                <tr class=move || if is_editing() { "line-item-row editing" } else { "line-item-row" }>
                                    <td>{item.order + 1}</td>
                                    <td>{item.name.clone()}</td>
                                    <td>{item.details.clone()}</td>
                                    <td>{item.quantity}</td>
                                    <td class="row-actions">
                                        <button
                                            type="button"
                                            class="edit-btn"
                                            on:click=move |_| set_editing.set(Some(edit_id.clone()))
                                        >
                                            "Edit"
                                        </button>
                                        <DeleteConfirmButton
                                            button_class="delete-btn"
                                            prompt="Remove this service?"
                                            on_confirm=move |_| {
                                                // Placeholder ids shift on delete
                                                set_editing.set(None);
                                                store_remove_item(&store, &delete_id);
                                            }
                                        />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
            {move || if rows().is_empty() {
                view! { <div class="no-items-message">"No services added yet"</div> }.into_any()
            } else {
                view! { <div></div> }.into_any()
            }}
            <LineItemEditor services=services editing=editing set_editing=set_editing />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_core::LineItemChangeset;

    fn item(id: &str, order: usize) -> LineItem {
        LineItem {
            id: RecordId::persisted(id),
            name: "Spraying".into(),
            details: String::new(),
            quantity: 1,
            order,
            service_order_id: Some("o1".into()),
        }
    }

    #[test]
    fn test_row_key_changes_when_row_moves_up() {
        let mut items =
            LineItemChangeset::from_persisted(vec![item("a1", 0), item("a2", 1), item("a3", 2)]);
        let before = row_key(&items.items()[2]);

        items.remove(&RecordId::persisted("a2"));

        let moved = &items.items()[1];
        assert_eq!(moved.id, RecordId::persisted("a3"));
        assert_eq!(moved.order, 1);
        assert_ne!(row_key(moved), before);
    }
}
