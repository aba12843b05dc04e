//! Synchronous input classification. Invalid input is rejected before any
//! job record exists.

use regex::Regex;

use crate::core::jobs::InputKind;

/// Descriptions longer than this are rejected rather than truncated.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Figma file keys are 32 alphanumeric characters.
fn is_figma_key(input: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9]{32}$").unwrap().is_match(input)
}

/// Classify a raw `input` field: a Figma file key, a usable free-text
/// description, or neither.
pub fn classify(input: &str) -> Option<InputKind> {
    let trimmed = input.trim();
    if is_figma_key(trimmed) {
        Some(InputKind::Figma)
    } else if !trimmed.is_empty() && trimmed.len() <= MAX_DESCRIPTION_LEN {
        Some(InputKind::Text)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_32_char_alnum_key_is_figma() {
        assert_eq!(
            classify("aB3dEfGh1jKlMnOpQrStUvWxYz012345"),
            Some(InputKind::Figma)
        );
    }

    #[test]
    fn shorter_or_longer_keys_fall_back_to_text() {
        assert_eq!(classify("abc123"), Some(InputKind::Text));
        assert_eq!(classify(&"a".repeat(33)), Some(InputKind::Text));
    }

    #[test]
    fn empty_and_oversized_input_is_rejected() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
        assert_eq!(classify(&"x".repeat(MAX_DESCRIPTION_LEN + 1)), None);
    }

    #[test]
    fn a_description_is_text() {
        assert_eq!(
            classify("a dashboard with a login page"),
            Some(InputKind::Text)
        );
    }
}
