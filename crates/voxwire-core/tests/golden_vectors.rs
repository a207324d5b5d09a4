//! Byte-exact wire vectors for the octal-code format. These lock the
//! packing and axis conventions against the deployed fleet; changing any
//! expected value here is a wire-format break.

use voxwire_core::{CodeComparison, OctalCode};

#[test]
fn child_three_of_root_packs_to_01_60() {
    let code = OctalCode::root().child(3);
    assert_eq!(code.as_bytes(), &[0x01, 0x60]);
}

#[test]
fn hex_vector_02a8_roundtrips() {
    let code = OctalCode::from_bytes(&[0x02, 0xA8]).expect("vector should decode");
    assert_eq!(code.to_hex(), "02A8");
    let reparsed = OctalCode::from_hex("02A8").expect("hex vector should parse");
    assert_eq!(reparsed.as_bytes(), &[0x02, 0xA8]);
    assert_eq!(reparsed.section(0), 0b101);
    assert_eq!(reparsed.section(1), 0b010);
}

#[test]
fn zero_chain_ancestry_matches_the_fleet() {
    let one_deep = OctalCode::from_bytes(&[0x01, 0x00]).expect("vector should decode");
    let two_deep = OctalCode::from_bytes(&[0x02, 0x00]).expect("vector should decode");
    assert!(one_deep.is_ancestor_of(&two_deep, None));
    assert!(!two_deep.is_ancestor_of(&one_deep, None));
}

#[test]
fn section_msb_is_x_lsb_is_z() {
    // child 3 = 0b011 selects +y and +z at half scale
    let code = OctalCode::root().child(3);
    let extent = code.extent();
    assert_eq!([extent.x, extent.y, extent.z], [0.0, 0.5, 0.5]);
    assert_eq!(extent.size, 0.5);
}

#[test]
fn sibling_order_is_stable() {
    let lower = OctalCode::root().child(2);
    let higher = OctalCode::root().child(5);
    assert_eq!(lower.compare(&higher), CodeComparison::LessThan);
    assert_eq!(higher.compare(&lower), CodeComparison::GreaterThan);
}
