use super::*;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PixelBuffer {
    PixelBuffer::filled(w, h, rgba).unwrap()
}

fn views() -> FourViews {
    FourViews {
        front: solid(160, 120, [255, 0, 0, 255]),
        back: solid(160, 120, [0, 255, 0, 255]),
        left: solid(160, 120, [0, 0, 255, 255]),
        right: solid(160, 120, [0, 0, 0, 255]),
    }
}

fn layout() -> SheetLayout {
    SheetLayout {
        px_per_pt: 1.0,
        ..SheetLayout::default()
    }
}

#[test]
fn title_carries_the_date() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
    assert_eq!(
        sheet_title(date),
        "Sketch views (front, back, left, right) · 2026-03-09"
    );
}

#[test]
fn cells_follow_the_two_by_two_layout() {
    let l = layout();
    let (cw, ch) = l.cell_size_pt();
    assert!((cw - (841.89 - 84.0) / 2.0).abs() < 1e-3);
    assert!((ch - (595.28 - 84.0) / 2.0).abs() < 1e-3);
    assert_eq!(l.cell_origin_pt(ViewDirection::Front), (28.0, 28.0));
    assert_eq!(l.cell_origin_pt(ViewDirection::Right), (56.0 + cw, 56.0 + ch));
}

#[test]
fn views_land_centered_in_their_cells() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
    let l = layout();
    let sheet = SketchSheet::compose(&views(), &l, date).unwrap();
    assert_eq!((sheet.page.width, sheet.page.height), (842, 595));

    let (cw, ch) = l.cell_size_pt();
    let center = |dir| {
        let (x, y) = l.cell_origin_pt(dir);
        ((x + cw / 2.0) as u32, (y + ch / 2.0) as u32)
    };
    let (x, y) = center(ViewDirection::Front);
    assert_eq!(sheet.page.pixel(x, y), [255, 0, 0, 255]);
    let (x, y) = center(ViewDirection::Back);
    assert_eq!(sheet.page.pixel(x, y), [0, 255, 0, 255]);
    let (x, y) = center(ViewDirection::Left);
    assert_eq!(sheet.page.pixel(x, y), [0, 0, 255, 255]);
    let (x, y) = center(ViewDirection::Right);
    assert_eq!(sheet.page.pixel(x, y), [0, 0, 0, 255]);

    // 4:3 views in a wider cell leave white bands left and right.
    let (fx, fy) = l.cell_origin_pt(ViewDirection::Front);
    assert_eq!(sheet.page.pixel(fx as u32 + 2, (fy + ch / 2.0) as u32), [255, 255, 255, 255]);
    // Gutter stays white.
    assert_eq!(sheet.page.pixel(420, 300), [255, 255, 255, 255]);
}

#[test]
fn escapes_markup_characters() {
    assert_eq!(escape_xml(r#"a<b>&"c""#), "a&lt;b&gt;&amp;&quot;c&quot;");
}
