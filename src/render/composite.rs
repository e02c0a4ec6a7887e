use crate::foundation::core::PixelBuffer;
use crate::foundation::math::{mul_div255_u8, mul_div255_u16};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over with an extra opacity in `[0, 1]`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u16(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255 - sa;

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u16(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u16(u16::from(src[i]), op);
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Multiply tint: `dst * (src + (1 - src_a))` per color channel; destination alpha is kept.
///
/// A transparent source leaves `dst` unchanged and an opaque white source is the identity.
pub fn multiply(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv_a = 255 - u16::from(src[3]);
    let mut out = dst;
    for i in 0..3 {
        let k = (u16::from(src[i]) + inv_a).min(255);
        out[i] = mul_div255_u8(u16::from(dst[i]), k);
    }
    out
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`, clipping to `dst`.
pub fn blit_over(dst: &mut PixelBuffer, src: &PixelBuffer, x: i64, y: i64) {
    let dst_w = i64::from(dst.width);
    let dst_h = i64::from(dst.height);
    for sy in 0..src.height {
        let dy = y + i64::from(sy);
        if dy < 0 || dy >= dst_h {
            continue;
        }
        for sx in 0..src.width {
            let dx = x + i64::from(sx);
            if dx < 0 || dx >= dst_w {
                continue;
            }
            let s = src.pixel(sx, sy);
            if s[3] == 0 {
                continue;
            }
            let (dx, dy) = (dx as u32, dy as u32);
            let out = over(dst.pixel(dx, dy), s, 1.0);
            dst.put_pixel(dx, dy, out);
        }
    }
}

fn add_sat_u8(a: u16, b: u16) -> u8 {
    (a + b).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
