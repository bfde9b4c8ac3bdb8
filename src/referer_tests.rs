// File: referer_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::error::RefreshError;
    use crate::referer::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn headers(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_split_headers() {
        let split = split_headers(&headers(&[
            "Host: example.com",
            "User-Agent: scanner",
            "Referer: http://example.com/page",
            "Cookie: session=abc",
            "Content-Type: application/x-www-form-urlencoded",
            "Content-Length: 10",
        ]));

        assert_eq!(split.referer_url.as_deref(), Some("http://example.com/page"));
        assert_eq!(split.forwarded, b"User-Agent: scanner\r\nCookie: session=abc\r\n".to_vec());
    }

    #[rstest]
    #[case("Host: example.com")]
    #[case("Content-Length: 10")]
    #[case("Content-Type: text/plain")]
    #[case("Referer: http://example.com/")]
    fn test_excluded_headers_never_forwarded(#[case] header: &str) {
        let split = split_headers(&headers(&[header, "Accept: */*"]));
        assert_eq!(split.forwarded, b"Accept: */*\r\n".to_vec());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let split = split_headers(&headers(&["NoSeparatorHere", "X-Odd:value", "Accept: */*"]));
        assert_eq!(split.referer_url, None);
        assert_eq!(split.forwarded, b"Accept: */*\r\n".to_vec());
    }

    #[test]
    fn test_first_referer_wins() {
        let split = split_headers(&headers(&[
            "Referer: http://example.com/first",
            "Referer: http://example.com/second",
        ]));
        assert_eq!(split.referer_url.as_deref(), Some("http://example.com/first"));
        assert!(split.forwarded.is_empty());
    }

    #[test]
    fn test_exclusion_is_case_sensitive() {
        let split = split_headers(&headers(&["referer: http://example.com/", "host: x"]));
        assert_eq!(split.referer_url, None);
        assert_eq!(split.forwarded, b"referer: http://example.com/\r\nhost: x\r\n".to_vec());
    }

    #[test]
    fn test_request_skeleton() {
        let request = b"GET / HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n";
        assert_eq!(
            request_skeleton(request),
            b"GET / HTTP/1.1\r\nHost: example.com\r\n".to_vec()
        );
    }

    #[test]
    fn test_build_referer_request() {
        let referer = build_referer_request(&headers(&[
            "Host: example.com",
            "Cookie: session=abc",
            "Referer: http://example.com/account?tab=2",
            "Content-Length: 12",
            "X-Requested-With: XMLHttpRequest",
        ]))
        .unwrap();

        assert_eq!(referer.url().as_str(), "http://example.com/account?tab=2");
        assert_eq!(
            String::from_utf8(referer.request().to_vec()).unwrap(),
            "GET /account?tab=2 HTTP/1.1\r\n\
             Host: example.com\r\n\
             Cookie: session=abc\r\n\
             X-Requested-With: XMLHttpRequest\r\n\
             \r\n"
        );
    }

    #[test]
    fn test_non_utf8_header_bytes_forwarded_unchanged() {
        let lines: Vec<Vec<u8>> = vec![
            b"Host: example.com".to_vec(),
            b"X-Name: caf\xe9".to_vec(),
            b"Referer: http://example.com/form".to_vec(),
        ];

        let split = split_headers(&lines);
        assert_eq!(split.forwarded, b"X-Name: caf\xe9\r\n".to_vec());

        let referer = build_referer_request(&lines).unwrap();
        assert_eq!(
            referer.request(),
            b"GET /form HTTP/1.1\r\nHost: example.com\r\nX-Name: caf\xe9\r\n\r\n"
        );
    }

    #[test]
    fn test_build_referer_request_without_referer() {
        let result = build_referer_request(&headers(&["Host: example.com"]));
        assert!(matches!(result, Err(RefreshError::NoRefererHeaderFound)));
    }

    #[test]
    fn test_build_referer_request_invalid_url() {
        let result = build_referer_request(&headers(&["Referer: /relative/only"]));
        assert!(matches!(result, Err(RefreshError::InvalidRefererUrl(_, _))));
    }
}
