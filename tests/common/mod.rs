// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use csrf_referer::{HttpService, Protocol};
use wiremock::{MockServer, ResponseTemplate};

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn service_for(server: &MockServer) -> HttpService {
    let address = server.address();
    HttpService::new(&address.ip().to_string(), address.port(), Protocol::Http)
}

pub fn create_html_response(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(content)
        .append_header("content-type", "text/html")
}

pub fn sample_form_page(csrf_name: &str, csrf_value: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Account</title>
</head>
<body>
    <form action="/account/update" method="post">
        <input type="hidden" name="{}" value="{}">
        <input type="text" name="email" value="">
        <button type="submit">Save</button>
    </form>
</body>
</html>"#,
        csrf_name, csrf_value
    )
}

/// A form POST whose `Referer` points at `page_path` on the mock server.
pub fn sample_post_request(server: &MockServer, page_path: &str, body: &str) -> Vec<u8> {
    let address = server.address();
    format!(
        "POST /account/update HTTP/1.1\r\n\
         Host: {addr}\r\n\
         User-Agent: Mozilla/5.0\r\n\
         Referer: http://{addr}{path}\r\n\
         Cookie: session=abc123\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Content-Length: {len}\r\n\
         \r\n\
         {body}",
        addr = address,
        path = page_path,
        len = body.len(),
        body = body
    )
    .into_bytes()
}
