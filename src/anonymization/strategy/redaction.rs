//! Full and partial redaction strategies

/// Replaces any input with the configured literal
pub fn redact_full(replacement: &str) -> String {
    replacement.to_string()
}

/// Masks all but the last `visible_chars` characters of `input`
///
/// Characters are Unicode scalar values, so multi-byte text keeps its
/// character count. When `visible_chars` covers the whole input it is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use veil::anonymization::strategy::redaction::redact_partial;
///
/// assert_eq!(redact_partial("555-1234", 4, '*'), "****1234");
/// ```
pub fn redact_partial(input: &str, visible_chars: usize, mask_char: char) -> String {
    let len = input.chars().count();
    if visible_chars >= len {
        return input.to_string();
    }

    let masked = len - visible_chars;
    input
        .chars()
        .enumerate()
        .map(|(idx, c)| if idx < masked { mask_char } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_redact_full_ignores_input() {
        assert_eq!(redact_full("[REDACTED]"), "[REDACTED]");
        assert_eq!(redact_full(""), "");
    }

    #[test_case("555-1234", 4, '*', "****1234")]
    #[test_case("4111111111111111", 4, 'X', "XXXXXXXXXXXX1111")]
    #[test_case("abc", 3, '*', "abc")]
    #[test_case("abc", 10, '*', "abc")]
    #[test_case("abc", 0, '#', "###")]
    #[test_case("", 2, '*', "")]
    #[test_case("Zoë Ørsted", 3, '•', "•••••••ted")]
    fn test_redact_partial(input: &str, visible: usize, mask: char, expected: &str) {
        assert_eq!(redact_partial(input, visible, mask), expected);
    }

    #[test]
    fn test_length_and_suffix_preserved() {
        for input in ["john.doe@example.com", "12345", "日本語のテキスト"] {
            for visible in 0..8 {
                let output = redact_partial(input, visible, '*');
                let len = input.chars().count();
                assert_eq!(output.chars().count(), len);
                let keep = visible.min(len);
                let suffix: String = input.chars().skip(len - keep).collect();
                assert!(output.ends_with(&suffix));
            }
        }
    }
}
