// File: normalize_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::codec::*;
    use crate::config::TokenConfig;
    use crate::normalize::normalize_value;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn config(html_decode: bool, url_decode: bool, url_encode: bool) -> TokenConfig {
        let mut config = TokenConfig::new();
        config.set_html_decode(html_decode);
        config.set_url_decode(url_decode);
        config.set_url_encode(url_encode);
        config
    }

    #[rstest]
    #[case("&amp;", "&")]
    #[case("&lt;b&gt;", "<b>")]
    #[case("&quot;x&#39;", "\"x'")]
    #[case("&#x41;&#66;", "AB")]
    #[case("&#x27;&bogus;", "'&bogus;")]
    #[case("plain", "plain")]
    fn test_html_unescape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(html_unescape(input), expected);
    }

    #[rstest]
    #[case("%26amp%3B", "&amp;")]
    #[case("a+b%20c", "a b c")]
    #[case("100%", "100%")]
    #[case("%zz", "%zz")]
    fn test_url_decode(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(url_decode(input), expected);
    }

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("a b/c+d=="), "a%20b%2Fc%2Bd%3D%3D");
        assert_eq!(url_encode("abc-_.~09"), "abc-_.~09");
    }

    #[test]
    fn test_all_steps_disabled() {
        assert_eq!(normalize_value("%26amp%3B", &config(false, false, false)), "%26amp%3B");
    }

    #[test]
    fn test_url_decode_only() {
        assert_eq!(normalize_value("%26amp%3B", &config(false, true, false)), "&amp;");
    }

    #[test]
    fn test_html_decode_runs_before_url_decode() {
        assert_eq!(normalize_value("&amp;amp;", &config(true, false, false)), "&amp;");
        assert_eq!(normalize_value("&amp;amp;", &config(true, true, false)), "&amp;");
        assert_eq!(normalize_value("%26amp%3B", &config(true, true, false)), "&amp;");
        assert_eq!(normalize_value("a%26amp%3Bb", &config(true, true, false)), "a&amp;b");
        assert_eq!(normalize_value("%2B&amp;", &config(true, true, false)), "+&");
    }

    #[test]
    fn test_url_encode_runs_last() {
        assert_eq!(normalize_value("%26amp%3B", &config(true, true, true)), "%26amp%3B");
        assert_eq!(normalize_value("a+b&amp;", &config(true, true, true)), "a%20b%26");
        assert_eq!(normalize_value("a/b", &config(false, false, true)), "a%2Fb");
    }

    #[test]
    fn test_default_config_keeps_base64_token_wire_safe() {
        let token = "q1w2+e3/r4==";
        assert_eq!(
            normalize_value(&url_encode(token), &TokenConfig::default()),
            "q1w2%2Be3%2Fr4%3D%3D"
        );
    }
}
