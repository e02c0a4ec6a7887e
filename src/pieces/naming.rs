use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Name given to meshes that arrive without one.
pub const UNNAMED_MESH: &str = "(unnamed)";

static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| re(r"[\s\-]+"));
static NUMERIC_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?:_\d+)+$"));

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// Derive the piece key for a raw mesh name.
///
/// `"Manga Izq-2"`, `"manga_izq_1"` and `"MANGA IZQ"` all map to `"MANGA_IZQ"`, so mirrored or
/// split meshes share one piece. The mapping is idempotent.
pub fn canonicalize(raw: &str) -> String {
    let raw = raw.trim();
    let raw = if raw.is_empty() { UNNAMED_MESH } else { raw };

    let upper = raw.to_uppercase();
    let stripped: String = upper.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let separated = SEPARATOR_RUN_RE.replace_all(&stripped, "_");
    let key = NUMERIC_SUFFIX_RE.replace(&separated, "");
    if key.is_empty() {
        UNNAMED_MESH.to_uppercase()
    } else {
        key.into_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pieces/naming.rs"]
mod tests;
