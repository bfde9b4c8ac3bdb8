// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::error::{RefreshError, RefreshResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Replaced by the name of the located anti-CSRF parameter inside both markers.
pub const CSRF_NAME_PLACEHOLDER: &str = "#csrf_name#";

pub const DEFAULT_CSRF_NAME_CONTAINS: &str = "csrf";
pub const DEFAULT_START_MARKER: &str = "name=\"#csrf_name#\" value=\"";
pub const DEFAULT_END_MARKER: &str = "\"";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    csrf_name_contains: String,
    start_marker: String,
    end_marker: String,
    html_decode: bool,
    url_decode: bool,
    url_encode: bool,
    timeout: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenConfig {
    pub fn new() -> Self {
        Self {
            csrf_name_contains: DEFAULT_CSRF_NAME_CONTAINS.to_string(),
            start_marker: DEFAULT_START_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            html_decode: true,
            url_decode: true,
            url_encode: true,
            timeout: 10,
        }
    }

    /// Loads a JSON file; keys missing from the file keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RefreshResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RefreshError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn csrf_name_contains(&self) -> &str {
        &self.csrf_name_contains
    }

    pub fn set_csrf_name_contains(&mut self, csrf_name_contains: &str) {
        self.csrf_name_contains = csrf_name_contains.to_string();
    }

    pub fn start_marker(&self) -> &str {
        &self.start_marker
    }

    pub fn set_start_marker(&mut self, start_marker: &str) {
        self.start_marker = start_marker.to_string();
    }

    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }

    pub fn set_end_marker(&mut self, end_marker: &str) {
        self.end_marker = end_marker.to_string();
    }

    pub fn html_decode(&self) -> bool {
        self.html_decode
    }

    pub fn set_html_decode(&mut self, html_decode: bool) {
        self.html_decode = html_decode;
    }

    pub fn url_decode(&self) -> bool {
        self.url_decode
    }

    pub fn set_url_decode(&mut self, url_decode: bool) {
        self.url_decode = url_decode;
    }

    pub fn url_encode(&self) -> bool {
        self.url_encode
    }

    pub fn set_url_encode(&mut self, url_encode: bool) {
        self.url_encode = url_encode;
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = timeout;
    }
}
