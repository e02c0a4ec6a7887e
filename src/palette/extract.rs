use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::palette::color::{TokenKind, canonical_function, classify, resolve_hex};

static PAINT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"(?i)\s(?:fill|stroke|stop-color)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
});

static STYLE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)\sstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#));

static STYLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?is)<style\b[^>]*>(.*?)</style\s*>"));

static FUNCTION_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)^(rgba?|hsla?)\(\s*([^)]*?)\s*\)$"));

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// One editable color of a vector document.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaletteEntry {
    /// Literal token text as found in the markup (function literals in canonical spelling).
    pub token: String,
    /// Resolved display color, lowercase `#rrggbb`.
    pub hex: String,
    /// Number of paint declarations using this token.
    pub count: usize,
}

/// Collect the distinct paint colors of `markup`, most used first.
///
/// Scans `fill`/`stroke`/`stop-color` attributes, the same properties inside `style`
/// attributes, and declarations inside `<style>` blocks. Ties keep discovery order.
pub fn extract_colors(markup: &str) -> Vec<PaletteEntry> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    let mut bump = |raw: &str| {
        if let Some(token) = candidate_token(raw) {
            *counts.entry(token).or_insert(0) += 1;
        }
    };

    for caps in PAINT_ATTR_RE.captures_iter(markup) {
        if let Some(v) = caps.get(1).or_else(|| caps.get(2)) {
            bump(v.as_str());
        }
    }

    for caps in STYLE_ATTR_RE.captures_iter(markup) {
        if let Some(v) = caps.get(1).or_else(|| caps.get(2)) {
            for value in paint_declarations(v.as_str()) {
                bump(value);
            }
        }
    }

    for caps in STYLE_BLOCK_RE.captures_iter(markup) {
        for rule in caps[1].split('}') {
            let Some((_, body)) = rule.split_once('{') else {
                continue;
            };
            for value in paint_declarations(body) {
                bump(value);
            }
        }
    }

    let mut out: Vec<PaletteEntry> = counts
        .into_iter()
        .filter_map(|(token, count)| {
            let Some(hex) = resolve_hex(&token) else {
                tracing::debug!(%token, "dropping unresolvable color token");
                return None;
            };
            Some(PaletteEntry { token, hex, count })
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Values of paint properties in a `prop: value; ...` declaration list.
fn paint_declarations(decls: &str) -> impl Iterator<Item = &str> {
    decls.split(';').filter_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        let prop = prop.trim();
        let is_paint = ["fill", "stroke", "stop-color"]
            .iter()
            .any(|p| prop.eq_ignore_ascii_case(p));
        is_paint.then_some(value)
    })
}

/// Editable token for a raw paint value, or `None` for non-editable paints.
fn candidate_token(raw: &str) -> Option<String> {
    let v = raw.trim();
    let v = v
        .strip_suffix("!important")
        .map(str::trim_end)
        .unwrap_or(v);
    if v.is_empty() {
        return None;
    }
    if ["none", "currentcolor", "inherit"]
        .iter()
        .any(|k| v.eq_ignore_ascii_case(k))
    {
        return None;
    }
    if v.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("url(")) {
        return None;
    }

    match classify(v) {
        TokenKind::Hex => Some(v.to_string()),
        TokenKind::Function => {
            let caps = FUNCTION_TOKEN_RE.captures(v)?;
            Some(canonical_function(&caps[1], &caps[2]))
        }
        TokenKind::Named => resolve_hex(v).map(|_| v.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/extract.rs"]
mod tests;
