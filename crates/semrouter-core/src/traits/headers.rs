// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host interface for the mutable outbound request head.

use http::header::{HeaderName, HeaderValue};
use tracing::warn;

/// The request head a host hands to the filter.
///
/// The filter keeps ownership of it between lifecycle callbacks so that routing
/// headers can be injected once the body has been buffered and classified.
pub trait RequestHeaderMap: Send + 'static {
    /// Request method, e.g. `"POST"`.
    fn method(&self) -> &str;

    /// Look up a header value by case-insensitive name.
    fn get(&self, name: &str) -> Option<&str>;

    /// Set (replace) a header value.
    fn set(&mut self, name: &str, value: &str);
}

impl RequestHeaderMap for http::request::Parts {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn set(&mut self, name: &str, value: &str) {
        let name = match HeaderName::try_from(name) {
            Ok(name) => name,
            Err(e) => {
                warn!(header = name, error = %e, "dropping header with invalid name");
                return;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(e) => {
                warn!(header = %name, error = %e, "dropping header with invalid value");
            }
        }
    }
}
