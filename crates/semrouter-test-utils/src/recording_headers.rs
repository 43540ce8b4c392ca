// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory request head that records every header write.

use std::collections::BTreeMap;

use semrouter_core::RequestHeaderMap;

#[derive(Debug, Clone, Default)]
pub struct RecordingHeaders {
    method: String,
    headers: BTreeMap<String, String>,
    writes: Vec<(String, String)>,
}

impl RecordingHeaders {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
            ..Default::default()
        }
    }

    /// A POST with `content-type: application/json`.
    pub fn json_post() -> Self {
        Self::new("POST").with_header("content-type", "application/json")
    }

    /// Seed a header without recording it as a write.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Every `set` call in order, names as given.
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }
}

impl RequestHeaderMap for RecordingHeaders {
    fn method(&self) -> &str {
        &self.method
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn set(&mut self, name: &str, value: &str) {
        self.writes.push((name.to_string(), value.to_string()));
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
    }
}
