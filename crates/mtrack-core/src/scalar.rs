//! Scalar value coercion for loosely-typed config records.

/// A single loosely-typed value as it appears in a decoded config record.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl Scalar {
    /// Coerce a raw token into a typed scalar.
    ///
    /// Rules, in order:
    /// - a quoted token (matching single or double quotes) becomes the
    ///   unquoted string
    /// - `true` / `false` become booleans
    /// - `null` / `~` become [`Scalar::Null`]
    /// - an integer-or-decimal token becomes a number
    /// - anything else stays a string; an empty token is the empty string
    pub fn coerce(raw: &str) -> Scalar {
        let v = raw.trim();
        if v.is_empty() {
            return Scalar::Str(String::new());
        }
        if let Some(unquoted) = strip_matching_quotes(v) {
            return Scalar::Str(unquoted.to_owned());
        }
        match v {
            "true" => return Scalar::Bool(true),
            "false" => return Scalar::Bool(false),
            "null" | "~" => return Scalar::Null,
            _ => {}
        }
        if is_numeric_token(v) {
            if let Ok(n) = v.parse::<f64>() {
                return Scalar::Num(n);
            }
        }
        Scalar::Str(v.to_owned())
    }

    /// Render the scalar the way a permissive string field wants it.
    ///
    /// Returns `None` for values that cannot stand in for a non-empty string
    /// (null and the empty string), so callers can apply their field default.
    pub fn as_nonempty_string(&self) -> Option<String> {
        match self {
            Scalar::Str(s) if !s.is_empty() => Some(s.clone()),
            Scalar::Str(_) | Scalar::Null => None,
            Scalar::Num(n) => Some(format_number(*n)),
            Scalar::Bool(b) => Some(b.to_string()),
        }
    }

    /// The numeric value, if this scalar is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// The string value, if this scalar is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Strip a matching pair of single or double quotes, if present.
fn strip_matching_quotes(v: &str) -> Option<&str> {
    if v.len() < 2 {
        return None;
    }
    let bytes = v.as_bytes();
    let quote = bytes[0];
    if (quote == b'"' || quote == b'\'') && bytes[v.len() - 1] == quote {
        return Some(&v[1..v.len() - 1]);
    }
    None
}

/// Matches an optional minus sign, digits, and at most one decimal point
/// with digits on both sides. Exponents and leading dots are not numbers
/// in this config dialect.
fn is_numeric_token(v: &str) -> bool {
    let body = v.strip_prefix('-').unwrap_or(v);
    if body.is_empty() {
        return false;
    }
    let mut parts = body.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        None => true,
        Some(f) => !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()),
    }
}

/// Format a number without a trailing `.0` for whole values.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_strips_double_quotes() {
        assert_eq!(Scalar::coerce("\"hello\""), Scalar::Str("hello".into()));
    }

    #[test]
    fn coerce_strips_single_quotes() {
        assert_eq!(Scalar::coerce("'v1.2'"), Scalar::Str("v1.2".into()));
    }

    #[test]
    fn coerce_parses_numbers() {
        assert_eq!(Scalar::coerce("42"), Scalar::Num(42.0));
        assert_eq!(Scalar::coerce("0.95"), Scalar::Num(0.95));
        assert_eq!(Scalar::coerce("-3.5"), Scalar::Num(-3.5));
    }

    #[test]
    fn coerce_rejects_non_numeric_lookalikes() {
        assert_eq!(Scalar::coerce("1.2.3"), Scalar::Str("1.2.3".into()));
        assert_eq!(Scalar::coerce(".5"), Scalar::Str(".5".into()));
        assert_eq!(Scalar::coerce("1e5"), Scalar::Str("1e5".into()));
        assert_eq!(Scalar::coerce("-"), Scalar::Str("-".into()));
    }

    #[test]
    fn coerce_parses_booleans_and_null() {
        assert_eq!(Scalar::coerce("true"), Scalar::Bool(true));
        assert_eq!(Scalar::coerce("false"), Scalar::Bool(false));
        assert_eq!(Scalar::coerce("null"), Scalar::Null);
        assert_eq!(Scalar::coerce("~"), Scalar::Null);
    }

    #[test]
    fn coerce_empty_is_empty_string() {
        assert_eq!(Scalar::coerce(""), Scalar::Str(String::new()));
        assert_eq!(Scalar::coerce("   "), Scalar::Str(String::new()));
    }

    #[test]
    fn quoted_booleans_stay_strings() {
        assert_eq!(Scalar::coerce("\"true\""), Scalar::Str("true".into()));
    }

    #[test]
    fn nonempty_string_conversion() {
        assert_eq!(
            Scalar::Num(1.0).as_nonempty_string(),
            Some("1".to_owned())
        );
        assert_eq!(
            Scalar::Num(0.9).as_nonempty_string(),
            Some("0.9".to_owned())
        );
        assert_eq!(
            Scalar::Bool(true).as_nonempty_string(),
            Some("true".to_owned())
        );
        assert_eq!(Scalar::Null.as_nonempty_string(), None);
        assert_eq!(Scalar::Str(String::new()).as_nonempty_string(), None);
    }
}
