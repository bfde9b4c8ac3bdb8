// File: message.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::bytes::{index_of, to_string};
use crate::error::{RefreshError, RefreshResult};
use log::debug;
use std::fmt;
use std::ops::Range;
use url::Url;

pub const NEWLINE: &str = "\r\n";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

/// Where a request is delivered: host, port and protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpService {
    host: String,
    port: u16,
    protocol: Protocol,
}

impl HttpService {
    pub fn new(host: &str, port: u16, protocol: Protocol) -> Self {
        HttpService {
            host: host.to_string(),
            port,
            protocol,
        }
    }

    pub fn from_url(url: &Url) -> RefreshResult<Self> {
        let protocol = match url.scheme() {
            "http" => Protocol::Http,
            "https" => Protocol::Https,
            other => {
                return Err(RefreshError::MalformedRequest(format!(
                    "Unsupported scheme: {}",
                    other
                )))
            }
        };
        let host = url
            .host_str()
            .ok_or_else(|| RefreshError::MalformedRequest(format!("No host in URL: {}", url)))?;
        let port = url.port().unwrap_or(protocol.default_port());
        Ok(HttpService::new(host, port, protocol))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }
}

impl fmt::Display for HttpService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.protocol.scheme(), self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Url,
    Body,
    Cookie,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Url => write!(f, "url"),
            ParameterType::Body => write!(f, "body"),
            ParameterType::Cookie => write!(f, "cookie"),
        }
    }
}

/// A request parameter with its name and value exactly as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    value: String,
    kind: ParameterType,
}

impl Parameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> ParameterType {
        self.kind
    }
}

pub fn build_parameter(name: &str, value: &str, kind: ParameterType) -> Parameter {
    Parameter {
        name: name.to_string(),
        value: value.to_string(),
        kind,
    }
}

/// A raw request together with the service it is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    service: HttpService,
    request: Vec<u8>,
}

impl HttpRequest {
    pub fn new(service: HttpService, request: Vec<u8>) -> Self {
        HttpRequest { service, request }
    }

    pub fn service(&self) -> &HttpService {
        &self.service
    }

    pub fn request(&self) -> &[u8] {
        &self.request
    }

    pub fn set_request(&mut self, request: Vec<u8>) {
        self.request = request;
    }

    pub fn into_request(self) -> Vec<u8> {
        self.request
    }
}

#[derive(Debug, Clone)]
pub struct RequestInfo {
    method: String,
    url: Url,
    headers: Vec<String>,
    header_lines: Vec<Vec<u8>>,
    parameters: Vec<Parameter>,
    body_offset: usize,
}

impl RequestInfo {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Header lines in message order, without the request line.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The same header lines as sent on the wire, byte for byte.
    pub fn header_lines(&self) -> &[Vec<u8>] {
        &self.header_lines
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn body_offset(&self) -> usize {
        self.body_offset
    }
}

#[derive(Debug)]
struct ParameterSpan {
    name: String,
    kind: ParameterType,
    value: Range<usize>,
}

#[derive(Debug, PartialEq, Eq)]
enum BodyFormat {
    Form,
    Multipart(String),
    Other,
}

/// Byte offsets of the parts of a raw request. Every range is absolute.
#[derive(Debug)]
struct Layout {
    method: Range<usize>,
    target: Range<usize>,
    header_lines: Vec<Range<usize>>,
    head_end: usize,
    body_offset: usize,
}

impl Layout {
    fn parse(request: &[u8]) -> RefreshResult<Self> {
        let (head_end, body_offset) = match index_of(request, b"\r\n\r\n", true, 0, request.len())
        {
            Some(pos) => (pos, pos + 4),
            None => match index_of(request, b"\n\n", true, 0, request.len()) {
                Some(pos) => (pos, pos + 2),
                None => (request.len(), request.len()),
            },
        };

        let mut lines = Vec::new();
        let mut start = 0;
        while start <= head_end {
            let end = index_of(request, b"\n", true, start, head_end).unwrap_or(head_end);
            let trimmed = if end > start && request[end - 1] == b'\r' {
                end - 1
            } else {
                end
            };
            lines.push(start..trimmed);
            start = end + 1;
        }

        let request_line = lines
            .first()
            .cloned()
            .filter(|line| !line.is_empty())
            .ok_or_else(|| RefreshError::MalformedRequest("Empty request".to_string()))?;

        let method_end = index_of(request, b" ", true, request_line.start, request_line.end)
            .ok_or_else(|| {
                RefreshError::MalformedRequest(format!(
                    "No request target in: {}",
                    to_string(&request[request_line.clone()])
                ))
            })?;
        let target_start = method_end + 1;
        let target_end = index_of(request, b" ", true, target_start, request_line.end)
            .unwrap_or(request_line.end);
        if target_start >= target_end {
            return Err(RefreshError::MalformedRequest(
                "Empty request target".to_string(),
            ));
        }

        let header_lines = lines
            .into_iter()
            .skip(1)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(Layout {
            method: request_line.start..method_end,
            target: target_start..target_end,
            header_lines,
            head_end,
            body_offset,
        })
    }

    /// Name and trimmed value range of a header line, split at the first colon.
    fn header<'a>(
        &self,
        request: &'a [u8],
        line: &Range<usize>,
    ) -> Option<(&'a [u8], Range<usize>)> {
        let colon = index_of(request, b":", true, line.start, line.end)?;
        let mut value_start = colon + 1;
        while value_start < line.end && request[value_start] == b' ' {
            value_start += 1;
        }
        Some((&request[line.start..colon], value_start..line.end))
    }

    fn find_header(&self, request: &[u8], name: &str) -> Option<(Range<usize>, Range<usize>)> {
        self.header_lines.iter().find_map(|line| {
            let (header_name, value) = self.header(request, line)?;
            header_name
                .eq_ignore_ascii_case(name.as_bytes())
                .then(|| (line.clone(), value))
        })
    }

    fn query(&self, request: &[u8]) -> Option<Range<usize>> {
        let question = index_of(request, b"?", true, self.target.start, self.target.end)?;
        let end =
            index_of(request, b"#", true, question, self.target.end).unwrap_or(self.target.end);
        Some(question + 1..end)
    }

    fn body_format(&self, request: &[u8]) -> BodyFormat {
        let content_type = match self.find_header(request, "Content-Type") {
            Some((_, value)) => to_string(&request[value]),
            None => return BodyFormat::Form,
        };
        let lowered = content_type.to_ascii_lowercase();

        if lowered.contains("application/x-www-form-urlencoded") {
            return BodyFormat::Form;
        }
        if lowered.contains("multipart/form-data") {
            let boundary = content_type.split(';').skip(1).find_map(|param| {
                let (key, value) = param.split_once('=')?;
                key.trim()
                    .eq_ignore_ascii_case("boundary")
                    .then(|| value.trim().trim_matches('"').to_string())
            });
            if let Some(boundary) = boundary.filter(|b| !b.is_empty()) {
                return BodyFormat::Multipart(boundary);
            }
        }
        BodyFormat::Other
    }

    fn parameters(&self, request: &[u8]) -> Vec<ParameterSpan> {
        let mut spans = Vec::new();

        if let Some(query) = self.query(request) {
            spans.extend(scan_pairs(request, query, b'&', ParameterType::Url));
        }

        if self.body_offset < request.len() {
            let body = self.body_offset..request.len();
            match self.body_format(request) {
                BodyFormat::Form => {
                    spans.extend(scan_pairs(request, body, b'&', ParameterType::Body))
                }
                BodyFormat::Multipart(boundary) => {
                    spans.extend(scan_parts(request, body, boundary.as_bytes()))
                }
                BodyFormat::Other => {}
            }
        }

        for line in &self.header_lines {
            if let Some((name, value)) = self.header(request, line) {
                if name.eq_ignore_ascii_case(b"Cookie") {
                    spans.extend(scan_pairs(request, value, b';', ParameterType::Cookie));
                }
            }
        }

        spans
    }
}

fn scan_pairs(
    request: &[u8],
    region: Range<usize>,
    separator: u8,
    kind: ParameterType,
) -> Vec<ParameterSpan> {
    let mut spans = Vec::new();
    let mut start = region.start;

    while start <= region.end {
        let end = index_of(request, &[separator], true, start, region.end).unwrap_or(region.end);
        let mut name_start = start;
        while name_start < end && request[name_start] == b' ' {
            name_start += 1;
        }

        if name_start < end {
            let (name_end, value) = match index_of(request, b"=", true, name_start, end) {
                Some(eq) => (eq, eq + 1..end),
                None => (end, end..end),
            };
            spans.push(ParameterSpan {
                name: to_string(&request[name_start..name_end]),
                kind,
                value,
            });
        }

        start = end + 1;
    }

    spans
}

/// Fields of a `multipart/form-data` body. The value range covers the part
/// content between its blank line and the CRLF before the next delimiter.
fn scan_parts(request: &[u8], region: Range<usize>, boundary: &[u8]) -> Vec<ParameterSpan> {
    let delimiter = [b"--".as_slice(), boundary].concat();
    let next_delimiter = [b"\r\n".as_slice(), delimiter.as_slice()].concat();
    let mut spans = Vec::new();

    let Some(first) = index_of(request, &delimiter, true, region.start, region.end) else {
        return spans;
    };
    let mut cursor = first + delimiter.len();

    while !request[cursor..region.end].starts_with(b"--") {
        let Some(line_end) = index_of(request, b"\r\n", true, cursor, region.end) else {
            break;
        };
        let Some(part_end) = index_of(request, &next_delimiter, true, line_end, region.end) else {
            break;
        };

        if let Some(blank) = index_of(request, b"\r\n\r\n", true, line_end, part_end) {
            let head = to_string(request.get(line_end + 2..blank).unwrap_or_default());
            match disposition_name(&head) {
                Some(name) => spans.push(ParameterSpan {
                    name,
                    kind: ParameterType::Body,
                    value: blank + 4..part_end,
                }),
                None => debug!("Multipart part without a field name skipped"),
            }
        }

        cursor = part_end + next_delimiter.len();
    }

    spans
}

fn disposition_name(head: &str) -> Option<String> {
    head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case("Content-Disposition") {
            return None;
        }
        value.split(';').find_map(|param| {
            let (key, value) = param.split_once('=')?;
            (key.trim() == "name").then(|| value.trim().trim_matches('"').to_string())
        })
    })
}

fn splice(request: &[u8], range: Range<usize>, replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(request.len() + replacement.len());
    out.extend_from_slice(&request[..range.start]);
    out.extend_from_slice(replacement);
    out.extend_from_slice(&request[range.end..]);
    out
}

pub fn analyze_request(request: &[u8], service: &HttpService) -> RefreshResult<RequestInfo> {
    let layout = Layout::parse(request)?;

    let method = to_string(&request[layout.method.clone()]);
    let target = to_string(&request[layout.target.clone()]);

    let parsed = if target.starts_with("http://") || target.starts_with("https://") {
        Url::parse(&target)
    } else {
        let authority = match layout.find_header(request, "Host") {
            Some((_, value)) => to_string(&request[value]),
            None => format!("{}:{}", service.host(), service.port()),
        };
        Url::parse(&format!(
            "{}://{}{}",
            service.protocol().scheme(),
            authority.trim(),
            target
        ))
    };
    let url = parsed
        .map_err(|e| RefreshError::MalformedRequest(format!("Invalid URL {}: {}", target, e)))?;

    let header_lines: Vec<Vec<u8>> = layout
        .header_lines
        .iter()
        .map(|line| request[line.clone()].to_vec())
        .collect();
    let headers = header_lines.iter().map(|line| to_string(line)).collect();

    let parameters = layout
        .parameters(request)
        .into_iter()
        .map(|span| Parameter {
            value: to_string(&request[span.value]),
            name: span.name,
            kind: span.kind,
        })
        .collect();

    Ok(RequestInfo {
        method,
        url,
        headers,
        header_lines,
        parameters,
        body_offset: layout.body_offset,
    })
}

/// Default GET request for `url`; the first two lines are the request line and `Host`.
pub fn build_http_request(url: &Url) -> Vec<u8> {
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut host = url.host_str().unwrap_or_default().to_string();
    if let Some(port) = url.port() {
        host.push_str(&format!(":{}", port));
    }

    let mut request = String::new();
    request.push_str(&format!("GET {} HTTP/1.1{}", target, NEWLINE));
    request.push_str(&format!("Host: {}{}", host, NEWLINE));
    request.push_str(&format!("Accept: */*{}", NEWLINE));
    request.push_str(&format!("Accept-Language: en{}", NEWLINE));
    request.push_str(&format!("User-Agent: {}{}", USER_AGENT, NEWLINE));
    request.push_str(&format!("Connection: close{}", NEWLINE));
    request.push_str(NEWLINE);
    request.into_bytes()
}

/// Writes `parameter` into `request`, replacing the value of the first parameter
/// with the same name and type, or appending it when there is none.
///
/// Everything else is kept byte for byte, except `Content-Length` for body changes.
pub fn update_parameter(request: &[u8], parameter: &Parameter) -> RefreshResult<Vec<u8>> {
    let layout = Layout::parse(request)?;
    let existing = layout
        .parameters(request)
        .into_iter()
        .find(|span| span.kind == parameter.kind && span.name == parameter.name);

    if let Some(span) = existing {
        let updated = splice(request, span.value, parameter.value.as_bytes());
        return match parameter.kind {
            ParameterType::Body => fix_content_length(&updated),
            _ => Ok(updated),
        };
    }

    let pair = format!("{}={}", parameter.name, parameter.value);
    match parameter.kind {
        ParameterType::Url => {
            let (at, prefix) = match layout.query(request) {
                Some(query) if query.is_empty() => (query.end, ""),
                Some(query) => (query.end, "&"),
                None => (layout.target.end, "?"),
            };
            Ok(splice(request, at..at, format!("{}{}", prefix, pair).as_bytes()))
        }
        ParameterType::Body => {
            if let BodyFormat::Multipart(boundary) = layout.body_format(request) {
                let closing = format!("{}--{}--", NEWLINE, boundary);
                let body = layout.body_offset..request.len();
                let at = index_of(request, closing.as_bytes(), true, body.start, body.end)
                    .ok_or_else(|| {
                        RefreshError::MalformedRequest(format!(
                            "No closing delimiter for boundary {}",
                            boundary
                        ))
                    })?;
                let part = format!(
                    "{nl}--{}{nl}Content-Disposition: form-data; name=\"{}\"{nl}{nl}{}",
                    boundary,
                    parameter.name,
                    parameter.value,
                    nl = NEWLINE
                );
                return fix_content_length(&splice(request, at..at, part.as_bytes()));
            }
            let prefix = if layout.body_offset < request.len() { "&" } else { "" };
            let mut updated = request.to_vec();
            if layout.head_end == request.len() {
                if !updated.ends_with(NEWLINE.as_bytes()) {
                    updated.extend_from_slice(NEWLINE.as_bytes());
                }
                updated.extend_from_slice(NEWLINE.as_bytes());
            }
            updated.extend_from_slice(format!("{}{}", prefix, pair).as_bytes());
            fix_content_length(&updated)
        }
        ParameterType::Cookie => match layout.find_header(request, "Cookie") {
            Some((line, _)) => Ok(splice(
                request,
                line.end..line.end,
                format!("; {}", pair).as_bytes(),
            )),
            None => Ok(splice(
                request,
                layout.head_end..layout.head_end,
                format!("{}Cookie: {}", NEWLINE, pair).as_bytes(),
            )),
        },
    }
}

fn fix_content_length(request: &[u8]) -> RefreshResult<Vec<u8>> {
    let layout = Layout::parse(request)?;
    let length = request.len().saturating_sub(layout.body_offset).to_string();
    match layout.find_header(request, "Content-Length") {
        Some((_, value)) => Ok(splice(request, value, length.as_bytes())),
        None => Ok(splice(
            request,
            layout.head_end..layout.head_end,
            format!("{}Content-Length: {}", NEWLINE, length).as_bytes(),
        )),
    }
}
