// File: locator.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::message::Parameter;
use log::{debug, info};

/// Returns the first parameter whose name contains `name_contains`.
///
/// Matching is case-sensitive and follows the order of `parameters`, so an
/// empty substring selects the first parameter.
pub fn locate_csrf_parameter<'a>(
    parameters: &'a [Parameter],
    name_contains: &str,
) -> Option<&'a Parameter> {
    for parameter in parameters {
        debug!(
            "Parameter found: ({}, {})",
            parameter.name(),
            parameter.kind()
        );
        if parameter.name().contains(name_contains) {
            info!("Anti-CSRF parameter found: {}", parameter.name());
            return Some(parameter);
        }
    }
    None
}
