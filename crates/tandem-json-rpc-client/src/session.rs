//! Cookie continuity across requests

use std::collections::BTreeMap;

use tracing::debug;

/// Cookies observed in responses, replayed on later requests.
///
/// Last write wins per name. Names are kept sorted so the outgoing header is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb every `Set-Cookie` header in a response header list
    pub fn absorb_response_headers<'a, I>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in headers {
            if name.eq_ignore_ascii_case("set-cookie") {
                self.absorb_set_cookie(value);
            }
        }
    }

    /// Store the leading `name=value` pair of one cookie definition; attributes are dropped
    pub fn absorb_set_cookie(&mut self, definition: &str) {
        let first = definition.split(';').next().unwrap_or_default();
        let Some((name, value)) = first.split_once('=') else {
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        debug!(cookie = name, "Storing cookie");
        self.cookies.insert(name.to_string(), value.to_string());
    }

    /// `Cookie` header value, `None` while the jar is empty
    pub fn header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Replace the jar with `cookies`, or merge them over the existing entries
    pub fn set_cookies(&mut self, cookies: BTreeMap<String, String>, replace: bool) {
        if replace {
            self.cookies = cookies;
        } else {
            self.cookies.extend(cookies);
        }
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}
