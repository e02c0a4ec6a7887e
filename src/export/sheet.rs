use chrono::NaiveDate;
use image::imageops::{self, FilterType};

use crate::assets::svg_raster::{FitMode, rasterize};
use crate::capture::views::{FourViews, ViewDirection};
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::StudioResult;
use crate::render::composite::blit_over;

/// Page geometry of a sketch sheet, in points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Page width.
    pub page_width_pt: f32,
    /// Page height.
    pub page_height_pt: f32,
    /// Outer margin and gutter.
    pub margin_pt: f32,
    /// Title font size.
    pub title_size_pt: f32,
    /// Output pixels per point.
    pub px_per_pt: f32,
}

impl Default for SheetLayout {
    /// A4 landscape, 28pt margins, 2 px/pt.
    fn default() -> Self {
        Self {
            page_width_pt: 841.89,
            page_height_pt: 595.28,
            margin_pt: 28.0,
            title_size_pt: 14.0,
            px_per_pt: 2.0,
        }
    }
}

impl SheetLayout {
    /// Size of one of the four cells.
    pub fn cell_size_pt(&self) -> (f32, f32) {
        (
            (self.page_width_pt - self.margin_pt * 3.0) / 2.0,
            (self.page_height_pt - self.margin_pt * 3.0) / 2.0,
        )
    }

    /// Top-left corner of the cell showing `dir`: front and back on top, left and right below.
    pub fn cell_origin_pt(&self, dir: ViewDirection) -> (f32, f32) {
        let (cw, ch) = self.cell_size_pt();
        let m = self.margin_pt;
        match dir {
            ViewDirection::Front => (m, m),
            ViewDirection::Back => (m * 2.0 + cw, m),
            ViewDirection::Left => (m, m * 2.0 + ch),
            ViewDirection::Right => (m * 2.0 + cw, m * 2.0 + ch),
        }
    }

    fn px(&self, pt: f32) -> u32 {
        (pt * self.px_per_pt).round().max(0.0) as u32
    }
}

/// Title line of a sheet captured on `date`.
pub fn sheet_title(date: NaiveDate) -> String {
    format!(
        "Sketch views (front, back, left, right) · {}",
        date.format("%Y-%m-%d")
    )
}

/// The four views laid out on one page.
#[derive(Clone, Debug)]
pub struct SketchSheet {
    /// Title drawn in the top margin.
    pub title: String,
    /// Opaque page raster.
    pub page: PixelBuffer,
}

impl SketchSheet {
    /// Lay out `views` on a white page. Each view is scaled uniformly to fit its cell and
    /// centered in it.
    #[tracing::instrument(skip(views, layout))]
    pub fn compose(views: &FourViews, layout: &SheetLayout, date: NaiveDate) -> StudioResult<Self> {
        let title = sheet_title(date);
        let mut page = PixelBuffer::filled(
            layout.px(layout.page_width_pt),
            layout.px(layout.page_height_pt),
            [255, 255, 255, 255],
        )?;

        let (cw, ch) = layout.cell_size_pt();
        let (cell_w, cell_h) = (layout.px(cw), layout.px(ch));
        for (dir, view) in views.iter() {
            let Some(scaled) = fit_into(view, cell_w, cell_h)? else {
                continue;
            };
            let (ox, oy) = layout.cell_origin_pt(dir);
            let x = i64::from(layout.px(ox)) + i64::from((cell_w - scaled.width) / 2);
            let y = i64::from(layout.px(oy)) + i64::from((cell_h - scaled.height) / 2);
            blit_over(&mut page, &scaled, x, y);
        }

        match title_strip(&title, layout, page.width) {
            Some(strip) => blit_over(&mut page, &strip, 0, 0),
            None => tracing::warn!("sheet title could not be rendered"),
        }

        Ok(Self { title, page })
    }
}

/// Uniformly scale `view` to fit `w`×`h`; `None` for empty inputs.
fn fit_into(view: &PixelBuffer, w: u32, h: u32) -> StudioResult<Option<PixelBuffer>> {
    if view.width == 0 || view.height == 0 || w == 0 || h == 0 {
        return Ok(None);
    }
    let scale = (w as f32 / view.width as f32).min(h as f32 / view.height as f32);
    let dw = ((view.width as f32 * scale).round() as u32).clamp(1, w);
    let dh = ((view.height as f32 * scale).round() as u32).clamp(1, h);

    let img = view.to_rgba_image()?;
    let resized = imageops::resize(&img, dw, dh, FilterType::Triangle);
    PixelBuffer::from_rgba_image(&resized).map(Some)
}

fn title_strip(title: &str, layout: &SheetLayout, width: u32) -> Option<PixelBuffer> {
    let height = layout.px(layout.margin_pt).max(1);
    let markup = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><text x="{x}" y="{y}" font-family="Helvetica, Arial, sans-serif" font-weight="bold" font-size="{size}" fill="black">{text}</text></svg>"#,
        x = layout.px(layout.margin_pt),
        y = layout.px(layout.margin_pt - 8.0),
        size = layout.title_size_pt * layout.px_per_pt,
        text = escape_xml(title),
    );
    rasterize(&markup, width, height, FitMode::Stretch)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/sheet.rs"]
mod tests;
