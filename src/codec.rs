// File: codec.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::borrow::Cow;

pub fn html_unescape(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}

/// Form-style decoding: `+` is a space, malformed escapes are kept as they are.
pub fn url_decode(value: &str) -> String {
    let plus_decoded: Cow<str> = if value.contains('+') {
        Cow::Owned(value.replace('+', " "))
    } else {
        Cow::Borrowed(value)
    };
    let decoded = urlencoding::decode_binary(plus_decoded.as_bytes());
    String::from_utf8_lossy(&decoded).into_owned()
}

pub fn url_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
