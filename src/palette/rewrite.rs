use regex::{Captures, NoExpand, Regex};

use crate::palette::color::{
    FUNCTION_COLOR_RE, TokenKind, canonical_function, classify, compress_hex, expand_hex,
    normalize_function_colors,
};

/// Replace every occurrence of color `token` in `markup` with `new_color`.
///
/// Matching depends on the token's spelling:
///
/// - hex: both `#rrggbb` and (when it exists) `#rgb`, case-insensitive, never as the prefix of a
///   longer hex literal;
/// - function: literals are compared in canonical spelling, so `RGB(1,2,3)` matches
///   `rgb(1, 2, 3)`;
/// - anything else: whole word, case-insensitive.
///
/// Non-matching text is returned byte-for-byte. `new_color` is inserted literally.
pub fn rewrite(markup: &str, token: &str, new_color: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        return markup.to_string();
    }

    match classify(token) {
        TokenKind::Hex => rewrite_hex(markup, token, new_color),
        TokenKind::Function => rewrite_function(markup, token, new_color),
        TokenKind::Named => rewrite_word(markup, token, new_color),
    }
}

fn rewrite_hex(markup: &str, token: &str, new_color: &str) -> String {
    let Some(hex6) = expand_hex(token) else {
        return markup.to_string();
    };
    let mut spellings = vec![regex::escape(&hex6)];
    if let Some(hex3) = compress_hex(&hex6) {
        spellings.push(regex::escape(&hex3));
    }
    let pattern = format!(r"(?i)(?:{})\b", spellings.join("|"));
    replace_all_literal(markup, &pattern, new_color)
}

fn rewrite_function(markup: &str, token: &str, new_color: &str) -> String {
    let canonical = normalize_function_colors(token);
    FUNCTION_COLOR_RE
        .replace_all(markup, |caps: &Captures<'_>| {
            if canonical_function(&caps[1], &caps[2]) == canonical {
                new_color.to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn rewrite_word(markup: &str, token: &str, new_color: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(token.chars().next()) { r"\b" } else { "" };
    let trail = if is_word(token.chars().last()) { r"\b" } else { "" };
    let pattern = format!("(?i){lead}{}{trail}", regex::escape(token));
    replace_all_literal(markup, &pattern, new_color)
}

fn replace_all_literal(markup: &str, pattern: &str, new_color: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(markup, NoExpand(new_color)).into_owned(),
        Err(err) => {
            tracing::warn!(%pattern, error = %err, "color rewrite pattern rejected");
            markup.to_string()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/rewrite.rs"]
mod tests;
