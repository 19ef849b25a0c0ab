//! Identifier normalization for scanned and typed input.
//!
//! Barcode scanners in keyboard-wedge or camera mode often prepend an AIM
//! symbology identifier (`]C1`, `]Q3`, ...) and may leak control bytes
//! (GS separators, CR/LF terminators). [`normalize`] turns that raw text into
//! the canonical identifier used as the table lookup key.

/// Clean raw scanner/keyboard text into a canonical identifier.
///
/// Removes every C0 control character and DEL, trims surrounding whitespace,
/// and strips a leading `]XX` symbology marker (X = ASCII alphanumeric).
/// Returns an empty string for empty or all-noise input.
///
/// The result is a fixed point: `normalize(&normalize(s)) == normalize(s)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|&c| !is_control(c)).collect();
    let mut rest = cleaned.trim();
    // A second marker exposed by the first strip would be removed by a later
    // pass, so keep going until the head is clean.
    while let Some(stripped) = strip_symbology_marker(rest) {
        rest = stripped.trim_start();
    }
    rest.to_string()
}

#[inline]
fn is_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{1f}' | '\u{7f}')
}

/// Strip a single `]XX` marker from the head of `s`.
fn strip_symbology_marker(s: &str) -> Option<&str> {
    let rest = s.strip_prefix(']')?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    let second = chars.next()?;
    (first.is_ascii_alphanumeric() && second.is_ascii_alphanumeric()).then(|| chars.as_str())
}

/// Case-insensitive search prefix: the first `len` characters, uppercased.
///
/// Identifiers shorter than `len` use their full length.
#[must_use]
pub fn prefix_key(id: &str, len: usize) -> String {
    id.chars().take(len).flat_map(char::to_uppercase).collect()
}

/// Display group key: the first `len` characters, compared verbatim.
#[must_use]
pub fn group_key(id: &str, len: usize) -> &str {
    match id.char_indices().nth(len) {
        Some((end, _)) => id.get(..end).unwrap_or(id),
        None => id,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("" , "" ; "empty")]
    #[test_case("AAAAA111", "AAAAA111" ; "already clean")]
    #[test_case("  AAAAA111 \r\n", "AAAAA111" ; "whitespace and crlf")]
    #[test_case("]C1AAAAA111", "AAAAA111" ; "code128 marker")]
    #[test_case("]q3AAAAA111", "AAAAA111" ; "lowercase marker")]
    #[test_case("\u{2}]E0AAAAA111\u{3}", "AAAAA111" ; "stx etx framing")]
    #[test_case("AAA\u{1d}AA111", "AAAAA111" ; "embedded group separator")]
    #[test_case("AAAAA\u{7f}111", "AAAAA111" ; "delete byte")]
    #[test_case("]C", "]C" ; "truncated marker kept")]
    #[test_case("]-1AAAAA111", "]-1AAAAA111" ; "non alphanumeric marker kept")]
    #[test_case("AB]C1CD", "AB]C1CD" ; "marker only stripped at head")]
    #[test_case("]C1", "" ; "marker only")]
    #[test_case("]C1]d2AAAAA111", "AAAAA111" ; "double marker")]
    fn test_normalize(raw: &str, expected: &str) {
        assert_eq!(normalize(raw), expected);
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "",
            " ",
            "]C1 ]d2 X",
            "\u{1}]A0\u{1}]B1X",
            "]C1  AAAAA111  ",
            "  \t]Z9\u{0}abc def\n",
            "]]C1",
            "]C1]",
            "héllo wörld",
        ];
        for raw in inputs {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test_case("AAAAA111", 5, "AAAAA" ; "long id")]
    #[test_case("abcde999", 5, "ABCDE" ; "lowercase folded")]
    #[test_case("ab1", 5, "AB1" ; "short id uses full length")]
    #[test_case("", 5, "" ; "empty id")]
    fn test_prefix_key(id: &str, len: usize, expected: &str) {
        assert_eq!(prefix_key(id, len), expected);
    }

    #[test]
    fn test_group_key() {
        assert_eq!(group_key("AAAAA11122", 8), "AAAAA111");
        assert_eq!(group_key("AAAAA1", 8), "AAAAA1");
        assert_eq!(group_key("ÄÄÄÄÄ11122", 8), "ÄÄÄÄÄ111");
        assert_eq!(group_key("", 8), "");
    }
}
