//! UI Components
//!
//! Reusable Leptos components of the order pages.

mod delete_confirm_button;
mod field_error;
mod load_error;
mod submit_status;
mod submit_diagnostics;
mod customer_select;
mod address_fields;
mod order_details;
mod tag_toggler;
mod line_item_list;
mod line_item_editor;

pub use delete_confirm_button::DeleteConfirmButton;
pub use load_error::LoadError;
pub use submit_status::SubmitStatus;
pub use submit_diagnostics::SubmitDiagnostics;
pub use customer_select::CustomerSelect;
pub use address_fields::{load_cities, AddressFields};
pub use order_details::OrderDetails;
pub use tag_toggler::TagToggler;
pub use line_item_list::LineItemList;
