//! Pages
//!
//! One component per route.

mod order_form;
mod order_list;

pub use order_form::OrderFormPage;
pub use order_list::OrderListPage;
