// DomainLens - core/coerce.rs
//
// Value coercion shared by the filter, grouping and colour stages.
// Every function here is pure and total over `Scalar`.

use crate::core::model::Scalar;

/// Affirmative tokens accepted for boolean flag columns (compared after
/// trimming and lowercasing).
pub const TRUTHY_TOKENS: &[&str] = &["true", "yes", "y", "1", "x", "\u{2713}", "check", "checked", "t"];

/// Canonical truthiness for flag columns (brand, moat and use-case flags).
///
/// - `Bool` maps directly.
/// - `Empty` is false.
/// - Zero (and NaN) is false; any other number is true.
/// - Text is true only when it is one of [`TRUTHY_TOKENS`].
pub fn is_truthy(value: &Scalar) -> bool {
    match value {
        Scalar::Empty => false,
        Scalar::Bool(b) => *b,
        Scalar::Number(n) => *n != 0.0 && !n.is_nan(),
        Scalar::Text(s) => {
            let token = s.trim().to_lowercase();
            TRUTHY_TOKENS.contains(&token.as_str())
        }
    }
}

/// Numeric form of a value, if it has one.
///
/// Text is parsed after trimming; booleans count as 1 and 0. Blank cells and
/// non-finite results yield `None`.
pub fn to_number(value: &Scalar) -> Option<f64> {
    let n = match value {
        Scalar::Empty => return None,
        Scalar::Bool(b) => f64::from(u8::from(*b)),
        Scalar::Number(n) => *n,
        Scalar::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    n.is_finite().then_some(n)
}

/// Display text of a value. Whole numbers print without a fractional part.
pub fn to_text(value: &Scalar) -> String {
    match value {
        Scalar::Empty => String::new(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Number(n) => format_number(*n),
        Scalar::Text(s) => s.clone(),
    }
}

/// Trimmed display text, used for domain, family and brand identities.
pub fn to_key(value: &Scalar) -> String {
    match value {
        Scalar::Text(s) => s.trim().to_string(),
        other => to_text(other),
    }
}

fn format_number(n: f64) -> String {
    // Integers below 2^53 are exact in f64.
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// URL/identifier-safe slug: lowercase ASCII alphanumerics separated by
/// single hyphens. Empty input slugs to `"domain"`.
pub fn slugify(value: &str) -> String {
    let source = if value.is_empty() { "domain" } else { value };
    let mut slug = String::with_capacity(source.len());
    let mut pending_hyphen = false;
    for ch in source.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
