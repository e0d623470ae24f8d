//! Application Configuration
//!
//! Endpoints and routes, fixed at build time from environment variables.

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_POSTAL_URL: &str = "https://viacep.com.br/ws";
const DEFAULT_LOCALITIES_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades/estados";
const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the service-order REST API
    pub api_base_url: String,
    /// Postal code lookup service
    pub postal_lookup_url: String,
    /// City-by-state lookup service
    pub localities_url: String,
    pub login_route: String,
    pub error_route: String,
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            postal_lookup_url: DEFAULT_POSTAL_URL.to_string(),
            localities_url: DEFAULT_LOCALITIES_URL.to_string(),
            login_route: "/login".to_string(),
            error_route: "/error".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Read `PEST_ORDERS_*` variables captured at compile time
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("PEST_ORDERS_API_URL"),
            option_env!("PEST_ORDERS_POSTAL_URL"),
            option_env!("PEST_ORDERS_LOCALITIES_URL"),
            option_env!("PEST_ORDERS_PAGE_SIZE"),
        )
    }

    fn from_values(
        api_url: Option<&str>,
        postal_url: Option<&str>,
        localities_url: Option<&str>,
        page_size: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        let pick = |value: Option<&str>, default: String| {
            value
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        Self {
            api_base_url: pick(api_url, defaults.api_base_url),
            postal_lookup_url: pick(postal_url, defaults.postal_lookup_url),
            localities_url: pick(localities_url, defaults.localities_url),
            page_size: page_size
                .and_then(|v| v.trim().parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_values(None, None, None, None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_overrides_trim_trailing_slash() {
        let config = AppConfig::from_values(Some("https://api.example.com/"), None, Some(""), Some("25"));
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.localities_url, DEFAULT_LOCALITIES_URL);
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_bad_page_size_falls_back() {
        let config = AppConfig::from_values(None, None, None, Some("zero"));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }
}
