//! Text or binary heuristic for freshly loaded input
//!
//! Used to pre-select an initial action list. Not a contract: exotic
//! encodings may be misclassified.

use crate::format::Format;

/// Number of leading bytes inspected
pub const SNIFF_LEN: usize = 512;

/// Inputs shorter than this are always text
const MIN_BINARY_LEN: usize = 3;

/// Classify raw input as [`Format::Text`] or [`Format::Binary`]
#[must_use]
pub fn guess(raw: &[u8]) -> Format {
    if raw.len() >= MIN_BINARY_LEN && is_binary(raw) {
        Format::Binary
    } else {
        Format::Text
    }
}

/// Check the first [`SNIFF_LEN`] bytes for binary control bytes
///
/// Binary bytes follow the MIME sniffing rules: `0x00-0x08`, `0x0B`,
/// `0x0E-0x1A`, `0x1C-0x1F`.
#[must_use]
pub fn is_binary(raw: &[u8]) -> bool {
    raw.iter()
        .take(SNIFF_LEN)
        .any(|&b| matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_binary() {
        assert!(!is_binary(b"NOOOP"));
        assert!(!is_binary(b"tabs\tand\nnewlines\r\n and escape \x1b"));
    }

    #[test]
    fn control_bytes_are_binary() {
        assert!(is_binary(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]));
        assert!(is_binary(&[0x1C, 0x1D, 0x1E, 0x1F]));
        assert!(is_binary(b"ab\x0Bcd"));
    }

    #[test]
    fn only_prefix_is_inspected() {
        let mut long = "Compressing".repeat(60).into_bytes();
        assert!(!is_binary(&long));
        long.push(0x00);
        assert!(long.len() > SNIFF_LEN);
        assert!(!is_binary(&long));
    }

    #[test]
    fn guess_format() {
        assert_eq!(guess(b"hello"), Format::Text);
        assert_eq!(guess(&[0x00, 0x01, 0x02]), Format::Binary);
        assert_eq!(guess(&[0x00, 0x01]), Format::Text);
        assert_eq!(guess(b""), Format::Text);
    }
}
