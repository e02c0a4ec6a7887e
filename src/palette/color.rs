use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static HEX_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)^#(?:[0-9a-f]{3}|[0-9a-f]{6})$"));

static FUNCTION_START_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)^(?:rgba?|hsla?)\("));

pub(crate) static FUNCTION_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(rgba?|hsla?)\(\s*([^)]*?)\s*\)"));

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// Syntactic family of a color token, which decides how it is matched when rewriting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `#rgb` or `#rrggbb`.
    Hex,
    /// `rgb(..)`, `rgba(..)`, `hsl(..)`, `hsla(..)`.
    Function,
    /// Anything else that resolves to a color (keywords, other hex lengths).
    Named,
}

/// Classify a token by its literal spelling.
pub fn classify(token: &str) -> TokenKind {
    let t = token.trim();
    if HEX_TOKEN_RE.is_match(t) {
        TokenKind::Hex
    } else if FUNCTION_START_RE.is_match(t) {
        TokenKind::Function
    } else {
        TokenKind::Named
    }
}

/// Resolve a CSS/SVG color literal to lowercase `#rrggbb`.
///
/// Returns `None` for anything that is not a concrete opaque color, so `transparent`,
/// translucent functions and `#rgba` literals never resolve.
pub fn resolve_hex(token: &str) -> Option<String> {
    let c = svgtypes::Color::from_str(&token.trim().to_ascii_lowercase()).ok()?;
    if c.alpha != u8::MAX {
        return None;
    }
    Some(format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue))
}

/// Lowercase `#rrggbb` form of a 3- or 6-digit hex literal.
pub fn expand_hex(token: &str) -> Option<String> {
    let t = token.trim();
    if !HEX_TOKEN_RE.is_match(t) {
        return None;
    }
    let digits = t[1..].to_ascii_lowercase();
    if digits.len() == 6 {
        return Some(format!("#{digits}"));
    }
    let mut out = String::with_capacity(7);
    out.push('#');
    for ch in digits.chars() {
        out.push(ch);
        out.push(ch);
    }
    Some(out)
}

/// Short `#rgb` spelling of a `#rrggbb` literal, when each channel's digits repeat.
pub fn compress_hex(hex6: &str) -> Option<String> {
    let h = expand_hex(hex6)?;
    let b = h.as_bytes();
    if b[1] == b[2] && b[3] == b[4] && b[5] == b[6] {
        Some(format!("#{}{}{}", b[1] as char, b[3] as char, b[5] as char))
    } else {
        None
    }
}

/// Canonical spelling of every function color literal in `text`.
///
/// The function name is lowercased and arguments are trimmed and joined with `", "`.
pub fn normalize_function_colors(text: &str) -> String {
    FUNCTION_COLOR_RE
        .replace_all(text, |caps: &Captures<'_>| canonical_function(&caps[1], &caps[2]))
        .into_owned()
}

pub(crate) fn canonical_function(name: &str, args: &str) -> String {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    format!("{}({})", name.to_ascii_lowercase(), parts.join(", "))
}

#[cfg(test)]
#[path = "../../tests/unit/palette/color.rs"]
mod tests;
