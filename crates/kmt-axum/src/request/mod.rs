use cookie::{Cookie, SameSite, time};
use http::{
    HeaderMap,
    header::{ACCEPT_LANGUAGE, COOKIE, HeaderValue, SET_COOKIE},
};
use std::time::Duration;

/// Extension trait for [`HeaderMap`](http::HeaderMap).
pub trait HeaderMapExt {
    /// Gets the header value as a string.
    fn get_str(&self, key: &str) -> Option<&str>;

    /// Gets the cookie with the name from the `cookie` headers.
    fn get_cookie(&self, name: &str) -> Option<Cookie<'static>>;

    /// Returns the `accept-language` header value.
    fn accept_language(&self) -> Option<&str>;

    /// Appends a `set-cookie` header.
    fn add_cookie(&mut self, cookie: &Cookie<'_>);
}

impl HeaderMapExt for HeaderMap {
    #[inline]
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.to_str().ok()
    }

    fn get_cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(|cookie| cookie.ok())
            .find(|cookie| cookie.name() == name)
            .map(Cookie::into_owned)
    }

    #[inline]
    fn accept_language(&self) -> Option<&str> {
        self.get(ACCEPT_LANGUAGE)?.to_str().ok()
    }

    fn add_cookie(&mut self, cookie: &Cookie<'_>) {
        match HeaderValue::try_from(cookie.to_string()) {
            Ok(value) => {
                self.append(SET_COOKIE, value);
            }
            Err(err) => tracing::warn!(cookie = cookie.name(), "invalid cookie value: {err}"),
        }
    }
}

/// Creates a site-wide cookie with the name and value.
pub fn new_cookie(
    name: impl Into<String>,
    value: impl Into<String>,
    max_age: Option<Duration>,
) -> Cookie<'static> {
    let mut cookie_builder = Cookie::build((name.into(), value.into()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/");
    if let Some(max_age) = max_age.and_then(|max_age| time::Duration::try_from(max_age).ok()) {
        cookie_builder = cookie_builder.max_age(max_age);
    }
    cookie_builder.build()
}
