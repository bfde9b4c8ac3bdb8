// File: refresher.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::config::TokenConfig;
use crate::error::{RefreshError, RefreshResult};
use crate::extract::{apply_placeholder, extract_by_markers};
use crate::locator::locate_csrf_parameter;
use crate::message::{analyze_request, build_parameter, update_parameter, HttpRequest};
use crate::normalize::normalize_value;
use crate::referer::build_referer_request;
use crate::transport::Transport;
use log::{debug, error, info};

pub const ACTION_NAME: &str = "Anti-CSRF token from referer";

/// Refreshes the anti-CSRF parameter of a request with the value served by its referer.
#[derive(Debug, Clone)]
pub struct TokenRefresher<T> {
    config: TokenConfig,
    transport: T,
}

impl<T: Transport> TokenRefresher<T> {
    pub fn new(config: TokenConfig, transport: T) -> Self {
        TokenRefresher { config, transport }
    }

    pub fn action_name(&self) -> &'static str {
        ACTION_NAME
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs the refresh and swallows failures, leaving the request as it was.
    ///
    /// Returns whether the request was rewritten.
    pub async fn perform_action(&self, current_request: &mut HttpRequest) -> bool {
        match self.try_refresh(current_request).await {
            Ok(_) => true,
            Err(e) if e.is_extraction_failure() => {
                error!("No anti-CSRF token parameter found in response: {}", e);
                false
            }
            Err(e @ RefreshError::RefererFetchFailed(_)) => {
                error!("{}", e);
                false
            }
            Err(e) => {
                info!("{}", e);
                false
            }
        }
    }

    /// Runs the refresh and returns the substituted value.
    ///
    /// `current_request` is only written once every stage has succeeded.
    pub async fn try_refresh(&self, current_request: &mut HttpRequest) -> RefreshResult<String> {
        let config = &self.config;
        debug!(
            "Name of the anti-CSRF token (or part of): {}",
            config.csrf_name_contains()
        );
        debug!(
            "Start marker of the anti-CSRF token in the response: {}",
            config.start_marker()
        );
        debug!(
            "End marker of the anti-CSRF token in the response: {}",
            config.end_marker()
        );
        debug!("HTML decode the anti-CSRF token: {}", config.html_decode());
        debug!("URL decode the anti-CSRF token: {}", config.url_decode());
        debug!("URL encode the anti-CSRF token: {}", config.url_encode());

        let request_info = analyze_request(current_request.request(), current_request.service())?;
        info!(
            "Handling request to: {} {}",
            request_info.method(),
            request_info.url()
        );

        let csrf_parameter =
            locate_csrf_parameter(request_info.parameters(), config.csrf_name_contains())
                .ok_or_else(|| {
                    RefreshError::NoCsrfParameterFound(config.csrf_name_contains().to_string())
                })?;

        let referer_request = build_referer_request(request_info.header_lines())?;
        info!(
            "Request for anti-CSRF request to: {}",
            referer_request.url()
        );
        let response = self
            .transport
            .send(current_request.service(), referer_request.request())
            .await?;

        let start_marker = apply_placeholder(config.start_marker(), csrf_parameter.name());
        let end_marker = apply_placeholder(config.end_marker(), csrf_parameter.name());
        debug!(
            "Extract data from string {} to string {}",
            start_marker, end_marker
        );

        let raw_value = extract_by_markers(&response, &start_marker, &end_marker)?;
        debug!(
            "Anti-CSRF token parameter value before decoding and encoding: {}",
            raw_value
        );

        let csrf_value = normalize_value(&raw_value, config);
        debug!(
            "Anti-CSRF token parameter value after decoding and encoding: {}",
            csrf_value
        );

        let replacement = build_parameter(csrf_parameter.name(), &csrf_value, csrf_parameter.kind());
        let updated = update_parameter(current_request.request(), &replacement)?;
        current_request.set_request(updated);
        info!("Anti-CSRF token value replaced");

        Ok(csrf_value)
    }
}
