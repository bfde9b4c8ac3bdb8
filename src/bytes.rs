// File: bytes.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

/// Finds the first occurrence of `needle` lying entirely within `haystack[from..to]`.
///
/// Returns the absolute index into `haystack`. `to` is clamped to the haystack
/// length, an empty needle matches at `from`.
pub fn index_of(
    haystack: &[u8],
    needle: &[u8],
    case_sensitive: bool,
    from: usize,
    to: usize,
) -> Option<usize> {
    let to = to.min(haystack.len());
    if from > to {
        return None;
    }
    if needle.is_empty() {
        return Some(from);
    }

    let window = &haystack[from..to];
    if needle.len() > window.len() {
        return None;
    }

    window
        .windows(needle.len())
        .position(|candidate| {
            if case_sensitive {
                candidate == needle
            } else {
                candidate.eq_ignore_ascii_case(needle)
            }
        })
        .map(|pos| pos + from)
}

pub fn to_bytes(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

pub fn to_string(data: &[u8]) -> String {
    String::from_utf8_lossy(data).to_string()
}
