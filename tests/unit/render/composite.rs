use super::*;

#[test]
fn over_respects_opacity_and_transparency() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [200, 0, 0, 255], 0.0), dst);
    assert_eq!(over(dst, [200, 0, 0, 255], 1.0), [200, 0, 0, 255]);
    let half = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert!((127..=129).contains(&half[0]));
    assert_eq!(half[3], 255);
}

#[test]
fn multiply_tints_and_keeps_alpha() {
    let base = [200, 100, 50, 255];
    assert_eq!(multiply(base, [255, 255, 255, 255]), base);
    assert_eq!(multiply(base, [0, 0, 0, 0]), base);
    assert_eq!(multiply(base, [255, 0, 0, 255]), [200, 0, 0, 255]);

    // Half-transparent black halves the base.
    let out = multiply(base, [0, 0, 0, 128]);
    assert!((99..=101).contains(&out[0]));
    assert_eq!(out[3], 255);
}

#[test]
fn blit_clips_to_destination() {
    let mut dst = PixelBuffer::filled(4, 4, [0, 0, 0, 255]).unwrap();
    let src = PixelBuffer::filled(3, 3, [255, 255, 255, 255]).unwrap();
    blit_over(&mut dst, &src, -1, 2);
    assert_eq!(dst.pixel(0, 2), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(1, 3), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(2, 2), [0, 0, 0, 255]);
    assert_eq!(dst.pixel(0, 1), [0, 0, 0, 255]);
}
