use super::*;

fn tokens(entries: &[PaletteEntry]) -> Vec<(&str, &str, usize)> {
    entries
        .iter()
        .map(|e| (e.token.as_str(), e.hex.as_str(), e.count))
        .collect()
}

#[test]
fn counts_attributes_and_orders_by_frequency() {
    let svg = r##"<svg>
        <path fill="blue"/>
        <path fill="#FF0000"/><path fill="#FF0000"/><path fill='#FF0000'/>
    </svg>"##;
    assert_eq!(
        tokens(&extract_colors(svg)),
        vec![("#FF0000", "#ff0000", 3), ("blue", "#0000ff", 1)]
    );
}

#[test]
fn ties_keep_discovery_order() {
    let svg = r##"<svg><a fill="#111"/><b stroke="green"/><c fill="#222"/><d stroke="green"/><e fill="#111"/></svg>"##;
    assert_eq!(
        tokens(&extract_colors(svg)),
        vec![
            ("#111", "#111111", 2),
            ("green", "#008000", 2),
            ("#222", "#222222", 1)
        ]
    );
}

#[test]
fn scans_style_attributes_and_style_blocks() {
    let svg = r##"<svg>
        <style>.a { fill: #00f; stroke:Red } .b{stop-color: rgb( 1,2 ,3 )} .c{opacity:1}</style>
        <rect style="fill:#00f;stroke-width:2"/>
        <stop stop-color="RGB(1, 2, 3)"/>
    </svg>"##;
    assert_eq!(
        tokens(&extract_colors(svg)),
        vec![
            ("rgb(1, 2, 3)", "#010203", 2),
            ("#00f", "#0000ff", 2),
            ("Red", "#ff0000", 1)
        ]
    );
}

#[test]
fn skips_non_editable_and_unresolvable_values() {
    let svg = r##"<svg>
        <a fill="none"/><b stroke="currentColor"/><c fill="inherit"/>
        <d fill="url(#grad)"/><e fill="bogus"/><f fill=""/>
        <g fill="orange"/>
    </svg>"##;
    assert_eq!(tokens(&extract_colors(svg)), vec![("orange", "#ffa500", 1)]);
}

#[test]
fn important_suffix_is_ignored() {
    let svg = r##"<svg><style>.x{fill:#abc !important}</style></svg>"##;
    assert_eq!(tokens(&extract_colors(svg)), vec![("#abc", "#aabbcc", 1)]);
}

#[test]
fn palette_is_sorted_descending() {
    let svg = r##"<svg><a fill="red"/><a fill="#000"/><a fill="#000"/><a fill="#fff"/><a fill="#fff"/><a fill="#fff"/></svg>"##;
    let out = extract_colors(svg);
    assert!(out.windows(2).all(|w| w[0].count >= w[1].count));
    assert_eq!(out[0].token, "#fff");
}

#[test]
fn invisible_paints_are_not_swatches() {
    let svg = r##"<svg>
        <path fill="transparent"/><path fill="rgba(255,0,0,0)"/>
        <path stroke="rgba(0, 0, 255, 0.5)"/><path fill="#f00a"/>
        <path fill="rgb(0,128,0)"/>
    </svg>"##;
    assert_eq!(
        tokens(&extract_colors(svg)),
        vec![("rgb(0, 128, 0)", "#008000", 1)]
    );
}
