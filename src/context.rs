//! Application Context
//!
//! Shared configuration provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::config::AppConfig;

/// App-wide values provided via context
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// HTTP client carrying the current session token
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config)
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
