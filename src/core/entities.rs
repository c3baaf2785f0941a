//! Markup escaping for computed output
//!
//! Lemmas and lemma classes written back into attribute values must not
//! break the surrounding markup:
//! - `<` `>` `&` become `&lt;` `&gt;` `&amp;`
//! - `'` `"` become `&apos;` `&quot;`
//!
//! Uses Cow for zero-copy when nothing needs escaping.

use memchr::memchr3;
use std::borrow::Cow;

#[inline]
fn needs_escape(b: u8) -> bool {
    matches!(b, b'<' | b'>' | b'&' | b'\'' | b'"')
}

/// Escape markup-significant bytes
///
/// Returns Borrowed if the input is already safe (zero-copy),
/// returns Owned if anything was replaced.
#[inline]
pub fn escape_markup(input: &[u8]) -> Cow<'_, [u8]> {
    // Fast path: the common case has no markup bytes at all
    if memchr3(b'<', b'>', b'&', input).is_none() && !input.iter().any(|&b| b == b'\'' || b == b'"')
    {
        return Cow::Borrowed(input);
    }
    let mut out = Vec::with_capacity(input.len() + 8);
    escape_into(input, &mut out);
    Cow::Owned(out)
}

/// Append `input` to `out`, escaping markup-significant bytes
pub fn escape_into(input: &[u8], out: &mut Vec<u8>) {
    let mut start = 0;
    for (pos, &b) in input.iter().enumerate() {
        if !needs_escape(b) {
            continue;
        }
        out.extend_from_slice(&input[start..pos]);
        out.extend_from_slice(match b {
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            b'&' => b"&amp;",
            b'\'' => b"&apos;",
            _ => b"&quot;",
        });
        start = pos + 1;
    }
    out.extend_from_slice(&input[start..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_escape_needed() {
        let result = escape_markup(b"hello world");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ref(), b"hello world");
    }

    #[test]
    fn test_escape_all() {
        let result = escape_markup(b"<a & 'b' \"c\">");
        assert_eq!(
            result.as_ref(),
            b"&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;" as &[u8]
        );
    }

    #[test]
    fn test_escape_into_appends() {
        let mut out = b"x=".to_vec();
        escape_into(b"a<b", &mut out);
        assert_eq!(out, b"x=a&lt;b");
    }

    #[test]
    fn test_quote_only_is_escaped() {
        assert_eq!(escape_markup(b"it's").as_ref(), b"it&apos;s");
    }
}
