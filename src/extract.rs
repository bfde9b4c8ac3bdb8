// File: extract.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::bytes::{index_of, to_bytes, to_string};
use crate::config::CSRF_NAME_PLACEHOLDER;
use crate::error::{RefreshError, RefreshResult};
use log::debug;

/// Substitutes every placeholder in a marker template with the parameter name.
pub fn apply_placeholder(template: &str, csrf_name: &str) -> String {
    template.replace(CSRF_NAME_PLACEHOLDER, csrf_name)
}

/// Returns the text strictly between the first `start_marker` in `data` and the
/// first `end_marker` following it. Matching is byte-exact.
pub fn extract_by_markers(
    data: &[u8],
    start_marker: &str,
    end_marker: &str,
) -> RefreshResult<String> {
    let start_marker_bytes = to_bytes(start_marker);
    let end_marker_bytes = to_bytes(end_marker);

    let start_index = match index_of(data, &start_marker_bytes, true, 0, data.len()) {
        Some(index) => index + start_marker_bytes.len(),
        None => {
            debug!("Start marker not found");
            return Err(RefreshError::StartMarkerNotFound(start_marker.to_string()));
        }
    };

    let end_index = match index_of(data, &end_marker_bytes, true, start_index, data.len()) {
        Some(index) => index,
        None => {
            debug!("End marker not found");
            return Err(RefreshError::EndMarkerNotFound(end_marker.to_string()));
        }
    };

    debug!("Extract data from index {} to index {}", start_index, end_index);
    Ok(to_string(&data[start_index..end_index]))
}
