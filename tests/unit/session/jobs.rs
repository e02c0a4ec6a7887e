use super::*;

fn job(markup: &str) -> RasterJob {
    RasterJob {
        piece: "FRONT".into(),
        generation: 1,
        revision: 3,
        pass: RasterPass::Preview,
        markup: Arc::from(markup),
        size: 16,
        fit: FitMode::Stretch,
    }
}

#[test]
fn run_carries_identity_and_pixels() {
    let r = job(r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect x="1" y="1" width="2" height="2" fill="#00ff00"/></svg>"##).run();
    assert_eq!(r.piece, "FRONT");
    assert_eq!((r.generation, r.revision), (1, 3));
    assert_eq!(r.pass, RasterPass::Preview);
    let img = r.image.unwrap();
    assert_eq!((img.width, img.height), (16, 16));
    assert_eq!(img.pixel(8, 8), [0, 255, 0, 255]);
    assert_eq!(img.pixel(0, 0), [0, 0, 0, 0]);
}

#[test]
fn broken_markup_yields_no_image() {
    let r = job("<svg><g></svg").run();
    assert!(r.image.is_none());
}
