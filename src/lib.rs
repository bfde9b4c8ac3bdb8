// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::new_without_default)]

pub mod bytes;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod extract;
pub mod locator;
pub mod message;
pub mod normalize;
pub mod referer;
pub mod refresher;
pub mod transport;

#[cfg(test)]
mod bytes_tests;
#[cfg(test)]
mod normalize_tests;
#[cfg(test)]
mod referer_tests;

pub use config::TokenConfig;
pub use error::{RefreshError, RefreshResult};
pub use message::{HttpRequest, HttpService, Parameter, ParameterType, Protocol};
pub use refresher::TokenRefresher;
pub use transport::{RawTransport, Transport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_imports() {
        let _ = config::TokenConfig::default();
        let _ = referer::SplitHeaders::default();
        let _ = message::build_parameter("csrf", "", message::ParameterType::Body);
        let _ = codec::url_encode("");
    }
}
