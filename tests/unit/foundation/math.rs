use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(0, 200), 0);
    assert_eq!(mul_div255_u8(100, 128), 50);
}

#[test]
fn premultiply_zeroes_transparent_and_scales_partial() {
    let mut px = vec![200u8, 100, 50, 0, 100, 50, 200, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[0, 0, 0, 0]);
    assert_eq!(
        &px[4..],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}

#[test]
fn unpremultiply_restores_opaque_and_partial_within_one() {
    let original = [100u8, 50, 200, 128];
    let mut px = original.to_vec();
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    for i in 0..3 {
        assert!((i32::from(px[i]) - i32::from(original[i])).abs() <= 1);
    }
    assert_eq!(px[3], 128);
}
