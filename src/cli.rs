// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use url::Url;

use crate::bytes::to_string;
use crate::config::TokenConfig;
use crate::error::{RefreshError, RefreshResult};
use crate::message::{HttpService, Protocol};

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[arg(
        short = 'r',
        long = "request",
        help = "Raw HTTP request file, read from stdin when omitted"
    )]
    pub request: Option<PathBuf>,

    #[arg(
        long = "target",
        help = "Service receiving the request, e.g. https://example.com:8443"
    )]
    pub target: Option<String>,

    #[arg(long = "tls", help = "Use https when the service comes from the Host header")]
    pub tls: bool,

    #[arg(short = 'c', long = "config", help = "JSON configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long = "csrf-name", help = "Name of the anti-CSRF token, or part of it")]
    pub csrf_name: Option<String>,

    #[arg(long = "start-marker", help = "Start marker, #csrf_name# is replaced")]
    pub start_marker: Option<String>,

    #[arg(long = "end-marker", help = "End marker, #csrf_name# is replaced")]
    pub end_marker: Option<String>,

    #[arg(long = "no-html-decode")]
    pub no_html_decode: bool,

    #[arg(long = "no-url-decode")]
    pub no_url_decode: bool,

    #[arg(long = "no-url-encode")]
    pub no_url_encode: bool,

    #[arg(
        short = 't',
        long = "timeout",
        help = "Referer request timeout in seconds"
    )]
    pub timeout: Option<u64>,

    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,
}

impl Cli {
    pub fn level_filter(&self) -> LevelFilter {
        if self.verbose {
            return LevelFilter::Debug;
        }
        self.log_level.parse().unwrap_or(LevelFilter::Warn)
    }

    /// Configuration file values, if any, overridden by explicit flags.
    pub fn token_config(&self) -> RefreshResult<TokenConfig> {
        let mut config = match &self.config {
            Some(path) => TokenConfig::from_json_file(path)?,
            None => TokenConfig::new(),
        };

        if let Some(csrf_name) = &self.csrf_name {
            config.set_csrf_name_contains(csrf_name);
        }
        if let Some(start_marker) = &self.start_marker {
            config.set_start_marker(start_marker);
        }
        if let Some(end_marker) = &self.end_marker {
            config.set_end_marker(end_marker);
        }
        if self.no_html_decode {
            config.set_html_decode(false);
        }
        if self.no_url_decode {
            config.set_url_decode(false);
        }
        if self.no_url_encode {
            config.set_url_encode(false);
        }
        if let Some(timeout) = self.timeout {
            config.set_timeout(timeout);
        }

        Ok(config)
    }

    pub fn service_for(&self, request: &[u8]) -> RefreshResult<HttpService> {
        if let Some(target) = &self.target {
            let url = Url::parse(target)
                .map_err(|e| RefreshError::Config(format!("Invalid target {}: {}", target, e)))?;
            return HttpService::from_url(&url);
        }

        let protocol = if self.tls {
            Protocol::Https
        } else {
            Protocol::Http
        };
        let host = host_header(request).ok_or_else(|| {
            RefreshError::Config("No --target given and no Host header in request".to_string())
        })?;
        let url = Url::parse(&format!("{}://{}/", protocol.scheme(), host))
            .map_err(|e| RefreshError::Config(format!("Invalid Host header {}: {}", host, e)))?;
        HttpService::from_url(&url)
    }
}

fn host_header(request: &[u8]) -> Option<String> {
    to_string(request)
        .lines()
        .skip(1)
        .take_while(|line| !line.is_empty())
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("Host")
                .then(|| value.trim().to_string())
        })
}
