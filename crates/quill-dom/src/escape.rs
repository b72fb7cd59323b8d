//! HTML escaping and entity decoding.

/// Escape text-node content: `&`, `<`, `>`, and non-breaking space.
pub fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Escape attribute values (double-quoted context).
pub fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Decode a named or numeric entity body (text between `&` and `;`).
///
/// Returns None for unrecognized names, in which case the caller keeps the
/// raw source text.
pub(crate) fn decode_entity(body: &str) -> Option<char> {
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let rest = body.strip_prefix('#')?;
            let code = if let Some(hex) = rest.strip_prefix('x').or_else(|| rest.strip_prefix('X'))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                rest.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        let mut out = String::new();
        escape_text(&mut out, "a < b & c > d\u{a0}e");
        assert_eq!(out, "a &lt; b &amp; c &gt; d&nbsp;e");
    }

    #[test]
    fn test_escape_attr_quotes() {
        let mut out = String::new();
        escape_attr(&mut out, r#"say "hi""#);
        assert_eq!(out, "say &quot;hi&quot;");
    }

    #[test]
    fn test_decode_entity() {
        assert_eq!(decode_entity("amp"), Some('&'));
        assert_eq!(decode_entity("nbsp"), Some('\u{a0}'));
        assert_eq!(decode_entity("#65"), Some('A'));
        assert_eq!(decode_entity("#x41"), Some('A'));
        assert_eq!(decode_entity("bogus"), None);
    }
}
