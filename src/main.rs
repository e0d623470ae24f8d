//! Pest Orders Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod models;
mod pages;
mod route;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_logger::init(log::LevelFilter::Info) {
        web_sys::console::warn_1(&format!("logger already installed: {}", e).into());
    }
    mount_to_body(App);
}
