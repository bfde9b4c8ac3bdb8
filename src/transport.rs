// File: transport.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::bytes::{index_of, to_string};
use crate::error::{RefreshError, RefreshResult};
use crate::message::{HttpService, Protocol};
use log::{debug, trace, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::{rustls, TlsConnector};

pub const MAX_RESPONSE_SIZE: usize = 4 * 1024 * 1024;

/// Sends a raw request to a service and returns the raw response, one attempt only.
pub trait Transport {
    fn send(
        &self,
        service: &HttpService,
        request: &[u8],
    ) -> impl Future<Output = RefreshResult<Vec<u8>>> + Send;
}

/// Writes request bytes unchanged over TCP, or TLS for https services.
#[derive(Clone)]
pub struct RawTransport {
    timeout: Duration,
    max_response_size: usize,
    connector: TlsConnector,
}

impl RawTransport {
    pub fn new(timeout: Duration) -> Self {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|ta| {
            rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
                ta.subject,
                ta.spki,
                ta.name_constraints,
            )
        }));

        let config = rustls::ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        RawTransport {
            timeout,
            max_response_size: MAX_RESPONSE_SIZE,
            connector: TlsConnector::from(Arc::new(config)),
        }
    }

    /// Stops reading once this many bytes are buffered.
    pub fn with_max_response_size(mut self, max_response_size: usize) -> Self {
        self.max_response_size = max_response_size;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_response_size(&self) -> usize {
        self.max_response_size
    }

    async fn exchange<S>(&self, mut stream: S, request: &[u8]) -> RefreshResult<Vec<u8>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        stream.write_all(request).await.map_err(fetch_failed)?;
        stream.flush().await.map_err(fetch_failed)?;

        let mut response = Vec::new();
        let mut chunk = [0u8; 4096];

        while response.len() < self.max_response_size {
            match tokio::time::timeout(self.timeout, stream.read(&mut chunk)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => {
                    response.extend_from_slice(&chunk[..n]);
                    trace!("Read {} bytes, {} total", n, response.len());
                    if response_complete(&response) {
                        break;
                    }
                }
                // Servers often reset instead of closing cleanly once they are done.
                Ok(Err(_)) if !response.is_empty() => break,
                Ok(Err(e)) => return Err(fetch_failed(e)),
                Err(_) if !response.is_empty() => break,
                Err(_) => return Err(RefreshError::RefererFetchFailed("Read timeout".to_string())),
            }
        }

        if response.is_empty() {
            return Err(RefreshError::RefererFetchFailed("Empty response".to_string()));
        }
        if response.len() >= self.max_response_size {
            warn!(
                "Response truncated at {} bytes (limit {}), markers past it are not searched",
                response.len(),
                self.max_response_size
            );
        }
        Ok(response)
    }
}

impl Transport for RawTransport {
    async fn send(&self, service: &HttpService, request: &[u8]) -> RefreshResult<Vec<u8>> {
        let address = format!("{}:{}", service.host(), service.port());
        debug!("Connecting to {}", service);

        let tcp_stream = match tokio::time::timeout(self.timeout, TcpStream::connect(&address)).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(RefreshError::RefererFetchFailed(format!(
                    "Connection failed: {}",
                    e
                )))
            }
            Err(_) => {
                return Err(RefreshError::RefererFetchFailed(
                    "Connection timeout".to_string(),
                ))
            }
        };

        match service.protocol() {
            Protocol::Http => self.exchange(tcp_stream, request).await,
            Protocol::Https => {
                let domain = rustls::ServerName::try_from(service.host()).map_err(|e| {
                    RefreshError::RefererFetchFailed(format!("Invalid server name: {}", e))
                })?;
                let tls_stream =
                    tokio::time::timeout(self.timeout, self.connector.connect(domain, tcp_stream))
                        .await
                        .map_err(|_| {
                            RefreshError::RefererFetchFailed("TLS handshake timeout".to_string())
                        })?
                        .map_err(fetch_failed)?;
                self.exchange(tls_stream, request).await
            }
        }
    }
}

fn fetch_failed(error: std::io::Error) -> RefreshError {
    RefreshError::RefererFetchFailed(error.to_string())
}

/// Whether a buffered response is complete without waiting for the peer to close.
pub fn response_complete(response: &[u8]) -> bool {
    let head_end = match index_of(response, b"\r\n\r\n", true, 0, response.len()) {
        Some(index) => index,
        None => return false,
    };
    let body_start = head_end + 4;
    let head = to_string(&response[..head_end]);
    let mut lines = head.split("\r\n");

    let status = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok())
        .unwrap_or(0);
    if (100..200).contains(&status) || status == 204 || status == 304 {
        return true;
    }

    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.eq_ignore_ascii_case("Content-Length") {
            if let Ok(length) = value.trim().parse::<usize>() {
                return response.len() >= body_start + length;
            }
        } else if name.eq_ignore_ascii_case("Transfer-Encoding")
            && value.to_ascii_lowercase().contains("chunked")
        {
            return chunked_body_complete(response, body_start);
        }
    }

    false
}

/// Walks the chunk framing from `start`: size line, data, CRLF, until the zero
/// chunk and the blank line closing its trailer section.
fn chunked_body_complete(response: &[u8], start: usize) -> bool {
    let mut cursor = start;

    loop {
        let Some(line_end) = index_of(response, b"\r\n", true, cursor, response.len()) else {
            return false;
        };
        let size_line = to_string(&response[cursor..line_end]);
        let size_field = size_line.split(';').next().unwrap_or_default().trim();
        let Ok(size) = usize::from_str_radix(size_field, 16) else {
            return false;
        };
        cursor = line_end + 2;

        if size == 0 {
            break;
        }

        let Some(next) = cursor.checked_add(size).and_then(|end| end.checked_add(2)) else {
            return false;
        };
        if response.len() < next || &response[next - 2..next] != b"\r\n" {
            return false;
        }
        cursor = next;
    }

    // Trailer fields, then an empty line.
    loop {
        let Some(line_end) = index_of(response, b"\r\n", true, cursor, response.len()) else {
            return false;
        };
        if line_end == cursor {
            return true;
        }
        cursor = line_end + 2;
    }
}
