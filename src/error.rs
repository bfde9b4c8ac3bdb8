// File: error.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt;

#[derive(Debug)]
pub enum RefreshError {
    NoCsrfParameterFound(String),
    NoRefererHeaderFound,
    InvalidRefererUrl(String, url::ParseError),
    RefererFetchFailed(String),
    StartMarkerNotFound(String),
    EndMarkerNotFound(String),
    MalformedRequest(String),
    Io(std::io::Error),
    Config(String),
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCsrfParameterFound(contains) => {
                write!(f, "No anti-CSRF parameter containing '{}' in request", contains)
            }
            Self::NoRefererHeaderFound => write!(f, "No referer URL found"),
            Self::InvalidRefererUrl(url, e) => write!(f, "Invalid referer URL {}: {}", url, e),
            Self::RefererFetchFailed(msg) => write!(f, "Referer request failed: {}", msg),
            Self::StartMarkerNotFound(marker) => write!(f, "Start marker not found: {}", marker),
            Self::EndMarkerNotFound(marker) => write!(f, "End marker not found: {}", marker),
            Self::MalformedRequest(msg) => write!(f, "Malformed request: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for RefreshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRefererUrl(_, e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RefreshError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl RefreshError {
    /// Both marker failures mean the referer page did not carry a token.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Self::StartMarkerNotFound(_) | Self::EndMarkerNotFound(_)
        )
    }
}

pub type RefreshResult<T> = Result<T, RefreshError>;
