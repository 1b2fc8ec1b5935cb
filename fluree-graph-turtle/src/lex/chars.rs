//! Character class predicates for Turtle and TriG.
//!
//! `char` predicates follow the grammar productions shared with SPARQL
//! (PN_CHARS_BASE, PN_CHARS_U, PN_CHARS). The `u8` variants work on raw bytes
//! for scanners that never decode UTF-8; any byte >= 0x80 is treated as a name
//! character since non-ASCII code points only appear inside names, IRIs,
//! strings and comments.

/// PN_CHARS_BASE: ASCII letters plus the Unicode ranges of the grammar.
pub fn is_pn_chars_base(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(c,
            '\u{00C0}'..='\u{00D6}'
            | '\u{00D8}'..='\u{00F6}'
            | '\u{00F8}'..='\u{02FF}'
            | '\u{0370}'..='\u{037D}'
            | '\u{037F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}')
}

/// PN_CHARS_U: PN_CHARS_BASE or `_`.
pub fn is_pn_chars_u(c: char) -> bool {
    c == '_' || is_pn_chars_base(c)
}

/// PN_CHARS: PN_CHARS_U, `-`, digits, U+00B7 and the combining ranges.
pub fn is_pn_chars(c: char) -> bool {
    is_pn_chars_u(c)
        || c.is_ascii_digit()
        || matches!(c, '-' | '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// First character of a prefix label.
pub fn is_pn_prefix_start(c: char) -> bool {
    is_pn_chars_base(c)
}

/// First character of a local name (after the colon).
pub fn is_pn_local_start(c: char) -> bool {
    c == ':' || c.is_ascii_digit() || is_pn_chars_u(c)
}

/// Turtle whitespace.
pub fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Characters allowed unescaped inside `<...>`.
pub fn is_iri_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\x00'..='\x20')
}

/// Byte-level whitespace.
pub fn is_ws_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Byte-level name character: ASCII PN_CHARS or any non-ASCII byte.
pub fn is_pn_byte(b: u8) -> bool {
    b >= 0x80 || b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_chars() {
        assert!(is_pn_chars_base('é'));
        assert!(!is_pn_chars_base('_'));
        assert!(is_pn_chars_u('_'));
        assert!(is_pn_chars('-'));
        assert!(is_pn_chars('7'));
        assert!(!is_pn_chars('.'));
        assert!(is_pn_local_start(':'));
        assert!(!is_pn_prefix_start('1'));
    }

    #[test]
    fn test_iri_chars() {
        assert!(is_iri_char('/'));
        assert!(!is_iri_char(' '));
        assert!(!is_iri_char('{'));
    }

    #[test]
    fn test_byte_classes() {
        assert!(is_pn_byte(b'a'));
        assert!(is_pn_byte(0xC3));
        assert!(!is_pn_byte(b'.'));
        assert!(!is_pn_byte(b'"'));
        assert!(is_ws_byte(b'\n'));
        assert!(!is_ws_byte(b'#'));
    }
}
