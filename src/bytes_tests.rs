// File: bytes_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::bytes::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(b"hello world", b"world", 0, 11, Some(6))]
    #[case(b"hello world", b"o", 5, 11, Some(7))]
    #[case(b"hello world", b"world", 0, 10, None)]
    #[case(b"hello world", b"xyz", 0, 11, None)]
    #[case(b"abc", b"abcd", 0, 3, None)]
    #[case(b"abc", b"", 2, 3, Some(2))]
    #[case(b"abc", b"a", 3, 1, None)]
    fn test_index_of(
        #[case] haystack: &[u8],
        #[case] needle: &[u8],
        #[case] from: usize,
        #[case] to: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(index_of(haystack, needle, true, from, to), expected);
    }

    #[test]
    fn test_index_of_case_sensitivity() {
        let data = b"Content-Type: text/html";
        assert_eq!(index_of(data, b"content-type", true, 0, data.len()), None);
        assert_eq!(index_of(data, b"content-type", false, 0, data.len()), Some(0));
    }

    #[test]
    fn test_index_of_clamps_end() {
        assert_eq!(index_of(b"abc", b"c", true, 0, 100), Some(2));
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(to_bytes("tok"), b"tok".to_vec());
        assert_eq!(to_string(b"tok"), "tok");
        assert_eq!(to_string(&[0x66, 0xff, 0x6f]), "f\u{fffd}o");
    }
}
