use std::sync::LazyLock;

use regex::{Captures, Regex};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Absolute tolerance when comparing a rect's geometry to the root viewBox.
const VIEWBOX_TOLERANCE: f64 = 0.01;

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?s)<!--.*?-->"));

static VIEWBOX_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(
        r#"(?i)<svg\b[^>]*\sviewBox\s*=\s*["']\s*([\d.+\-eE]+)[\s,]+([\d.+\-eE]+)[\s,]+([\d.+\-eE]+)[\s,]+([\d.+\-eE]+)\s*["'][^>]*>"#,
    )
});

static BACKGROUND_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(
        r#"(?is)<g\b[^>]*?\s(?:id|class)\s*=\s*(?:"[^"]*(?:background|fondo)[^"]*"|'[^']*(?:background|fondo)[^']*')[^>]*>"#,
    )
});

static GROUP_TAG_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?is)<g\b[^>]*?(/?)>|</g\s*>"));

static FULL_RECT_WH_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(
        r#"(?i)<rect\b[^>]*\swidth\s*=\s*(?:"100%"|'100%')[^>]*\sheight\s*=\s*(?:"100%"|'100%')[^>]*?(?:/>|>(?:\s*</rect\s*>)?)"#,
    )
});

static FULL_RECT_HW_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(
        r#"(?i)<rect\b[^>]*\sheight\s*=\s*(?:"100%"|'100%')[^>]*\swidth\s*=\s*(?:"100%"|'100%')[^>]*?(?:/>|>(?:\s*</rect\s*>)?)"#,
    )
});

static RECT_RE: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?i)<rect\b[^>]*?(?:/>|>(?:\s*</rect\s*>)?)"#));

static RECT_X_RE: LazyLock<Regex> = LazyLock::new(|| numeric_attr_re("x"));
static RECT_Y_RE: LazyLock<Regex> = LazyLock::new(|| numeric_attr_re("y"));
static RECT_W_RE: LazyLock<Regex> = LazyLock::new(|| numeric_attr_re("width"));
static RECT_H_RE: LazyLock<Regex> = LazyLock::new(|| numeric_attr_re("height"));

static ROOT_BG_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    re(
        r#"(?i)(<svg\b[^>]*?)\sstyle\s*=\s*(?:"[^"]*\bbackground(?:-color)?\s*:[^"]*"|'[^']*\bbackground(?:-color)?\s*:[^']*')"#,
    )
});

static HAS_ROOT_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<\s*svg[\s>]"));
static ROOT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<svg\b[^>]*>"));
static XMLNS_RE: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)\sxmlns\s*="));

fn re(pattern: &str) -> Regex {
    // Patterns are compile-time constants covered by unit tests.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

fn numeric_attr_re(name: &str) -> Regex {
    re(&format!(r#"(?i)\s{name}\s*=\s*["']([\d.+\-eE]+)["']"#))
}

/// Root `viewBox` of an SVG document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    /// Minimum x.
    pub x: f64,
    /// Minimum y.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

/// Read the root `viewBox` when all four numbers are present and finite.
pub fn read_view_box(markup: &str) -> Option<ViewBox> {
    let caps = VIEWBOX_RE.captures(markup)?;
    let num = |i: usize| -> Option<f64> {
        let v: f64 = caps.get(i)?.as_str().parse().ok()?;
        v.is_finite().then_some(v)
    };
    Some(ViewBox {
        x: num(1)?,
        y: num(2)?,
        w: num(3)?,
        h: num(4)?,
    })
}

/// Remove full-coverage background shapes so an overlay never floods its whole piece.
///
/// Removes comments, `<g>` layers whose id/class names a background (`background`/`fondo`),
/// `<rect>`s sized `100%`×`100%` and numeric `<rect>`s matching the root viewBox, plus a
/// background declared in the root `style`. Everything else is kept byte-for-byte.
pub fn sanitize_svg(markup: &str) -> String {
    let s = COMMENT_RE.replace_all(markup, "");
    let view_box = read_view_box(&s);

    let s = remove_background_groups(&s);
    let s = FULL_RECT_WH_RE.replace_all(&s, "");
    let s = FULL_RECT_HW_RE.replace_all(&s, "");

    let s = match view_box {
        Some(vb) => RECT_RE
            .replace_all(&s, |caps: &Captures<'_>| {
                let tag = &caps[0];
                if rect_matches_view_box(tag, vb) {
                    String::new()
                } else {
                    tag.to_string()
                }
            })
            .into_owned(),
        None => s.into_owned(),
    };

    ROOT_BG_STYLE_RE.replacen(&s, 1, "$1").into_owned()
}

/// Drop background layers up to their matching `</g>`, nested groups included.
///
/// A layer whose end tag is missing is left in place.
fn remove_background_groups(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut pos = 0;
    while let Some(open) = BACKGROUND_GROUP_RE.find_at(markup, pos) {
        out.push_str(&markup[pos..open.start()]);
        match group_end(markup, open.start()) {
            Some(end) => pos = end,
            None => {
                out.push_str(open.as_str());
                pos = open.end();
            }
        }
    }
    out.push_str(&markup[pos..]);
    out
}

/// Byte offset just past the element opened by the `<g>` tag at `start`.
fn group_end(markup: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for caps in GROUP_TAG_RE.captures_iter(&markup[start..]) {
        let tag = caps.get(0)?;
        if tag.as_str().starts_with("</") {
            depth = depth.checked_sub(1)?;
        } else if caps.get(1).is_some_and(|m| m.as_str().is_empty()) {
            depth += 1;
        }
        if depth == 0 {
            return Some(start + tag.end());
        }
    }
    None
}

fn rect_matches_view_box(tag: &str, vb: ViewBox) -> bool {
    let pick = |r: &Regex| -> Option<f64> {
        let v: f64 = r.captures(tag)?.get(1)?.as_str().parse().ok()?;
        v.is_finite().then_some(v)
    };
    let (Some(x), Some(y), Some(w), Some(h)) = (
        pick(&RECT_X_RE),
        pick(&RECT_Y_RE),
        pick(&RECT_W_RE),
        pick(&RECT_H_RE),
    ) else {
        return false;
    };

    (x - vb.x).abs() <= VIEWBOX_TOLERANCE
        && (y - vb.y).abs() <= VIEWBOX_TOLERANCE
        && (w - vb.w).abs() <= VIEWBOX_TOLERANCE
        && (h - vb.h).abs() <= VIEWBOX_TOLERANCE
}

/// Make `markup` a standalone SVG document.
///
/// Fragments are wrapped in an `<svg>` envelope sized `width`×`height`; a root lacking the SVG
/// namespace gets one so the decoder recognizes it.
pub fn ensure_svg_root(markup: &str, width: u32, height: u32) -> String {
    if !HAS_ROOT_RE.is_match(markup) {
        return format!(
            r#"<svg xmlns="{SVG_NS}" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{markup}</svg>"#
        );
    }

    let Some(root) = ROOT_TAG_RE.find(markup) else {
        return markup.to_string();
    };
    if XMLNS_RE.is_match(root.as_str()) {
        return markup.to_string();
    }

    let insert_at = root.start() + "<svg".len();
    let mut out = String::with_capacity(markup.len() + SVG_NS.len() + 10);
    out.push_str(&markup[..insert_at]);
    out.push_str(&format!(r#" xmlns="{SVG_NS}""#));
    out.push_str(&markup[insert_at..]);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sanitize.rs"]
mod tests;
