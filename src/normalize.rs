// File: normalize.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::codec::{html_unescape, url_decode, url_encode};
use crate::config::TokenConfig;
use log::debug;

/// HTML decode, then URL decode, then URL encode; each step only when enabled.
pub fn normalize_value(raw: &str, config: &TokenConfig) -> String {
    let mut value = raw.to_string();

    if config.html_decode() {
        debug!("Perform HTML decode");
        value = html_unescape(&value);
    }

    if config.url_decode() {
        debug!("Perform URL decode");
        value = url_decode(&value);
    }

    if config.url_encode() {
        debug!("Perform URL encode");
        value = url_encode(&value);
    }

    value
}
