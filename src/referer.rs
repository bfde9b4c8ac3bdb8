// File: referer.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::bytes::{index_of, to_bytes, to_string};
use crate::error::{RefreshError, RefreshResult};
use crate::message::{build_http_request, NEWLINE};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use url::Url;

pub const REFERER_HEADER_NAME: &str = "Referer";
pub const HEADER_NAME_VALUE_SEPARATOR: &str = ": ";

/// Regenerated for, or meaningless in, a bodiless GET.
static HEADER_NAMES_TO_EXCLUDE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.insert("Host");
    set.insert("Content-Length");
    set.insert("Content-Type");
    set
});

/// Headers of the original request, sorted into the referer URL and the block to forward.
///
/// The forwarded block keeps the original header bytes, CRLF-terminated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitHeaders {
    pub referer_url: Option<String>,
    pub forwarded: Vec<u8>,
}

/// The GET request that fetches the page holding a fresh token.
#[derive(Debug, Clone)]
pub struct RefererRequest {
    url: Url,
    request: Vec<u8>,
}

impl RefererRequest {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn request(&self) -> &[u8] {
        &self.request
    }
}

/// Accepts header lines as text or as raw bytes. Forwarded lines are copied
/// byte for byte, so non-UTF-8 values reach the referer request unchanged.
pub fn split_headers<H: AsRef<[u8]>>(headers: &[H]) -> SplitHeaders {
    let separator = to_bytes(HEADER_NAME_VALUE_SEPARATOR);
    let newline = to_bytes(NEWLINE);
    let mut split = SplitHeaders::default();

    for header in headers {
        let header = header.as_ref();
        debug!("Header found: {}", to_string(header));

        let Some(separator_index) = index_of(header, &separator, true, 0, header.len()) else {
            continue;
        };
        let name = &header[..separator_index];

        // Never forwarded, so the token request cannot point back at itself.
        if name == REFERER_HEADER_NAME.as_bytes() {
            if split.referer_url.is_none() {
                debug!("Referer URL found");
                split.referer_url = Some(to_string(&header[separator_index + separator.len()..]));
            }
        } else if !is_excluded(name) {
            split.forwarded.extend_from_slice(header);
            split.forwarded.extend_from_slice(&newline);
        }
    }

    split
}

fn is_excluded(name: &[u8]) -> bool {
    std::str::from_utf8(name).map_or(false, |name| HEADER_NAMES_TO_EXCLUDE.contains(name))
}

/// Keeps only the request line and the `Host` header of a freshly built request.
pub fn request_skeleton(request: &[u8]) -> Vec<u8> {
    let newline_bytes = to_bytes(NEWLINE);
    let first_line_end = index_of(request, &newline_bytes, true, 0, request.len())
        .map(|index| index + newline_bytes.len());
    let second_line_end = first_line_end.and_then(|from| {
        index_of(request, &newline_bytes, true, from, request.len())
            .map(|index| index + newline_bytes.len())
    });

    match second_line_end {
        Some(end) => request[..end].to_vec(),
        None => request.to_vec(),
    }
}

pub fn build_referer_request<H: AsRef<[u8]>>(headers: &[H]) -> RefreshResult<RefererRequest> {
    let split = split_headers(headers);
    let referer_url = split.referer_url.ok_or(RefreshError::NoRefererHeaderFound)?;

    let url = Url::parse(referer_url.trim())
        .map_err(|e| RefreshError::InvalidRefererUrl(referer_url.clone(), e))?;

    let mut request = request_skeleton(&build_http_request(&url));
    request.extend_from_slice(&split.forwarded);
    request.extend_from_slice(&to_bytes(NEWLINE));

    Ok(RefererRequest { url, request })
}
