//! Field name classification.
//!
//! Two questions are asked of a field name. Is it *numeric*, i.e. does it read
//! as a number literal at all? That decides retroactive sequence conversion
//! and whether a sequence accepts the write. Is it an *index*, i.e. a
//! canonical position inside a sequence? Numeric fields that are not indices
//! (`"01"`, `"-1"`, `"1.5"`) land in a sequence's detached properties.

/// Largest sequence position. Positions past it are not indices, so a
/// sequence length always fits in `u32`.
pub const MAX_INDEX: usize = (u32::MAX - 1) as usize;

/// Parse a field name as a sequence index.
///
/// # Example
///
/// ```
/// use easy_set::key::parse_index;
///
/// assert_eq!(parse_index("0"), Some(0));
/// assert_eq!(parse_index("42"), Some(42));
/// assert_eq!(parse_index("4294967294"), Some(4294967294));
/// assert_eq!(parse_index("4294967295"), None);
/// assert_eq!(parse_index("01"), None);
/// assert_eq!(parse_index("-1"), None);
/// assert_eq!(parse_index("foo"), None);
/// ```
pub fn parse_index(field: &str) -> Option<usize> {
    if !is_index(field) {
        return None;
    }
    field.parse().ok().filter(|idx| *idx <= MAX_INDEX)
}

/// Check if a field name is written as a canonical index literal.
///
/// Digits only, no sign, and no leading zero except for `"0"` itself. The
/// range is not checked here; see [`parse_index`].
pub fn is_index(field: &str) -> bool {
    if field.is_empty() {
        return false;
    }
    let bytes = field.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

/// Check if a field name reads as a number literal.
///
/// Surrounding whitespace is ignored and a blank field counts as zero.
/// Accepted forms are signed decimals with optional fraction and exponent,
/// `Infinity`, and unsigned `0x`/`0o`/`0b` integers.
///
/// # Example
///
/// ```
/// use easy_set::key::is_numeric;
///
/// assert!(is_numeric("2"));
/// assert!(is_numeric("01"));
/// assert!(is_numeric("-1.5e3"));
/// assert!(is_numeric("0x1f"));
/// assert!(!is_numeric("length"));
/// assert!(!is_numeric("1px"));
/// ```
pub fn is_numeric(field: &str) -> bool {
    let s = field.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return true;
    }
    if let Some(radix_digits) = radix_literal(s) {
        return radix_digits;
    }
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    unsigned == "Infinity" || is_decimal(unsigned)
}

/// `Some(valid)` when `s` carries a `0x`, `0o` or `0b` prefix.
fn radix_literal(s: &str) -> Option<bool> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &s[2..];
    Some(!digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)))
}

/// `digits [. digits] [e [sign] digits]` with at least one mantissa digit.
fn is_decimal(s: &str) -> bool {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if int.len() + frac.len() == 0 || !all_digits(int) || !all_digits(frac) {
        return false;
    }
    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}
