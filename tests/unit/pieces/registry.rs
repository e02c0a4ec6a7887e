use super::*;

fn record(i: usize) -> MeshRecord {
    MeshRecord {
        mesh: MeshId(i),
        bounds: UvBounds {
            u_min: 0.0,
            u_max: 0.5,
            v_min: 0.0,
            v_max: 0.5,
        },
    }
}

const ART: &str = r##"<svg xmlns="http://www.w3.org/2000/svg"><rect fill="#FF0000"/><circle fill="blue"/></svg>"##;

#[test]
fn registry_keeps_first_seen_order() {
    let mut reg = PieceRegistry::new();
    reg.insert_member("COLLAR", record(0));
    reg.insert_member("SLEEVE", record(1));
    reg.insert_member("COLLAR", record(2));

    assert_eq!(reg.names().collect::<Vec<_>>(), ["COLLAR", "SLEEVE"]);
    let collar = reg.get("COLLAR").unwrap();
    assert_eq!(
        collar.members().iter().map(|m| m.mesh).collect::<Vec<_>>(),
        [MeshId(0), MeshId(2)]
    );
    assert!(collar.palette().is_empty());

    reg.clear();
    assert!(reg.is_empty());
}

#[test]
fn artwork_and_recolor_bump_revision() {
    let mut piece = Piece::new("FRONT".into());
    assert_eq!(piece.revision(), 0);
    assert_eq!(piece.recolor("blue", "red"), None);

    assert_eq!(piece.set_artwork(VectorDocument::new(ART)), 1);
    assert_eq!(piece.palette().len(), 2);

    assert_eq!(piece.recolor("#FF0000", "#00FF00"), Some(2));
    assert!(piece.artwork().unwrap().markup().contains("#00FF00"));
    assert_eq!(piece.palette()[0].token, "#00FF00");

    // Nothing to replace: no new revision.
    assert_eq!(piece.recolor("purple", "red"), None);
    assert_eq!(piece.revision(), 2);
}

#[test]
fn stale_results_are_rejected() {
    let mut piece = Piece::new("FRONT".into());
    piece.set_artwork(VectorDocument::new(ART));
    piece.recolor("blue", "black");
    assert_eq!(piece.revision(), 2);

    assert!(!piece.accepts(1, RasterPass::Full));
    assert!(piece.accepts(2, RasterPass::Preview));

    piece.mark_applied(2, RasterPass::Full);
    assert!(!piece.accepts(2, RasterPass::Preview));
    assert!(piece.accepts(2, RasterPass::Full));
    assert_eq!(piece.applied(), Some((2, RasterPass::Full)));
}
