//! Routing
//!
//! Maps `window.location` paths to pages. Navigation is a full page load.

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    OrderList,
    NewOrder,
    EditOrder(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["orders"] => Route::OrderList,
            ["orders", "new"] => Route::NewOrder,
            ["orders", id, "edit"] => match percent_decode_str(id).decode_utf8() {
                Ok(id) if !id.is_empty() => Route::EditOrder(id.into_owned()),
                _ => Route::NotFound,
            },
            _ => Route::NotFound,
        }
    }

    pub fn href(&self) -> String {
        match self {
            Route::OrderList | Route::NotFound => "/orders".to_string(),
            Route::NewOrder => "/orders/new".to_string(),
            Route::EditOrder(id) => format!("/orders/{}/edit", utf8_percent_encode(id, NON_ALPHANUMERIC)),
        }
    }
}

/// Login URL that sends the user back to `current_path` afterwards
pub fn login_redirect(login_route: &str, current_path: &str) -> String {
    format!("{}?next={}", login_route, utf8_percent_encode(current_path, NON_ALPHANUMERIC))
}

pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

pub fn navigate(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(href) {
            log::error!("[ROUTE] navigation to {} failed: {:?}", href, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::OrderList);
        assert_eq!(Route::parse("/orders/"), Route::OrderList);
        assert_eq!(Route::parse("/orders/new"), Route::NewOrder);
        assert_eq!(Route::parse("/orders/42/edit"), Route::EditOrder("42".into()));
        assert_eq!(Route::parse("/customers"), Route::NotFound);
    }

    #[test]
    fn test_href_round_trips() {
        let route = Route::EditOrder("42".into());
        assert_eq!(Route::parse(&route.href()), route);
    }

    #[test]
    fn test_edit_route_decodes_escaped_id() {
        let route = Route::EditOrder("3f2a-77b1".into());
        assert_eq!(route.href(), "/orders/3f2a%2D77b1/edit");
        assert_eq!(Route::parse(&route.href()), route);

        let uuid = Route::EditOrder("0b9e_4c1d.a7".into());
        assert_eq!(Route::parse(&uuid.href()), uuid);
    }

    #[test]
    fn test_edit_route_with_bad_escape_is_not_found() {
        assert_eq!(Route::parse("/orders/%FF%FE/edit"), Route::NotFound);
    }

    #[test]
    fn test_login_redirect_encodes_path() {
        assert_eq!(login_redirect("/login", "/orders/7/edit"), "/login?next=%2Forders%2F7%2Fedit");
    }
}
