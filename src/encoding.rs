//! Single-byte text encoding for PDF literal strings.
//!
//! PDF content streams and dictionary strings in this crate use a single-byte
//! Western-European encoding approximating WinAnsiEncoding: UTF-16 code units
//! at or below 0xFF pass through unchanged, everything else is substituted
//! with `?`. The substitution is a deliberate lossy-but-total policy; the
//! encoder never fails.

/// Encode text into WinAnsi-like single bytes.
///
/// Each UTF-16 code unit ≤ 0xFF maps to itself; any unit above 0xFF becomes
/// `?` (0x3F). Total over all input strings.
pub fn encode(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .map(|unit| if unit <= 0xFF { unit as u8 } else { b'?' })
        .collect()
}

/// Backslash-escape the characters that delimit a PDF literal string.
///
/// `\`, `(`, and `)` each gain a preceding backslash. Escaping happens on the
/// character level, before byte encoding.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape then encode text for embedding inside a `(...)` literal string.
///
/// Every literal-string operand in the crate goes through this function, so
/// an unescaped or out-of-range byte can never reach the output stream.
pub fn encode_literal(text: &str) -> Vec<u8> {
    encode(&escape_literal(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode("Hello, World!"), b"Hello, World!");
    }

    #[test]
    fn test_latin1_passthrough() {
        // é is U+00E9, within the single-byte range
        assert_eq!(encode("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_substitution_above_ff() {
        assert_eq!(encode("\u{0409}"), vec![b'?']);
        // Astral codepoints are two UTF-16 units, both above 0xFF
        assert_eq!(encode("\u{1F600}"), vec![b'?', b'?']);
    }

    #[test]
    fn test_encoder_is_total() {
        assert_eq!(encode(""), Vec::<u8>::new());
        let mixed = "a\u{00FF}\u{0100}b";
        assert_eq!(encode(mixed), vec![b'a', 0xFF, b'?', b'b']);
    }

    #[test]
    fn test_encoding_idempotence() {
        // Bytes already within 0x00-0xFF survive a second pass unchanged.
        let once = encode("caf\u{e9} stra\u{df}e");
        let as_string: String = once.iter().map(|&b| b as char).collect();
        assert_eq!(encode(&as_string), once);
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal("(50%)"), "\\(50%\\)");
        assert_eq!(escape_literal("a\\b"), "a\\\\b");
        assert_eq!(escape_literal("plain"), "plain");
    }

    #[test]
    fn test_encode_literal_scenario() {
        // "café (50%) \path" must escape the parens and backslash and keep é
        // as the single byte 0xE9, with nothing beyond 0xFF present.
        let bytes = encode_literal("caf\u{e9} (50%) \\path");
        let expected: Vec<u8> = {
            let mut v = Vec::new();
            v.extend_from_slice(b"caf");
            v.push(0xE9);
            v.extend_from_slice(b" \\(50%\\) \\\\path");
            v
        };
        assert_eq!(bytes, expected);
    }
}
