use ropsym_core::catalog::GadgetSymbol;
use ropsym_core::image::CodeRegion;
use ropsym_core::resolve::{resolve_gadget, Resolution};
use sha2::{Digest, Sha256};

fn region(bytes: Vec<u8>, base: u64) -> CodeRegion {
    CodeRegion { bytes, base }
}

fn gadget(label: &str, window: &[u8]) -> GadgetSymbol {
    GadgetSymbol {
        label: label.to_string(),
        digest: Sha256::digest(window).into(),
        size: window.len(),
    }
}

/// Distinct byte values so no two same-length windows are byte-identical.
fn distinct_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

#[test]
fn finds_gadget_at_aligned_offset() {
    let bytes = distinct_bytes(64);
    let wanted = gadget("$ROP_g", &bytes[8..24]);
    let result = resolve_gadget(&region(bytes, 0x0200_0000), &wanted, 0);
    assert_eq!(result, Resolution::Resolved { label: "$ROP_g".into(), address: 0x0200_0008 });
}

#[test]
fn first_match_wins_when_bytes_repeat() {
    // The same 8-byte run at offsets 16 and 32; everything else is zero.
    let mut bytes = vec![0u8; 64];
    let pattern = [1u8, 2, 3, 4, 5, 6, 7, 8];
    bytes[16..24].copy_from_slice(&pattern);
    bytes[32..40].copy_from_slice(&pattern);

    let wanted = gadget("$ROP_g", &pattern);
    let result = resolve_gadget(&region(bytes, 0), &wanted, 0);
    assert_eq!(result, Resolution::Resolved { label: "$ROP_g".into(), address: 16 });
}

#[test]
fn unmatched_digest_is_unresolved() {
    let bytes = distinct_bytes(64);
    let wanted = gadget("$ROP_g", &[0xde, 0xad, 0xbe, 0xef]);
    match resolve_gadget(&region(bytes, 0), &wanted, 0) {
        Resolution::Unresolved { label, detail } => {
            assert_eq!(label, "$ROP_g");
            assert!(detail.contains(&wanted.digest_hex()), "detail should carry the digest: {detail}");
            assert!(detail.contains("size=0x4"), "detail should carry the size: {detail}");
        }
        other => panic!("expected unresolved, got {other:?}"),
    }
}

/// Alignment is enforced, not incidental: a window that only exists at a
/// non-4-aligned offset is never found.
#[test]
fn match_at_unaligned_offset_only_is_unresolved() {
    let bytes = distinct_bytes(32);
    let wanted = gadget("$ROP_g", &bytes[2..10]);
    let result = resolve_gadget(&region(bytes, 0), &wanted, 0);
    assert!(matches!(result, Resolution::Unresolved { .. }), "got {result:?}");
}

#[test]
fn gadget_larger_than_region_is_unresolved() {
    let bytes = distinct_bytes(16);
    let wanted = GadgetSymbol {
        label: "$ROP_big".into(),
        digest: Sha256::digest(&distinct_bytes(32)).into(),
        size: 32,
    };
    let result = resolve_gadget(&region(bytes, 0), &wanted, 0);
    assert!(matches!(result, Resolution::Unresolved { .. }), "got {result:?}");
}

/// A gadget exactly as long as the region is compared once, at offset 0.
#[test]
fn gadget_spanning_whole_region_resolves_at_base() {
    let bytes = distinct_bytes(24);
    let wanted = gadget("$ROP_all", &bytes);
    let result = resolve_gadget(&region(bytes, 0x0100_0000), &wanted, 0);
    assert_eq!(result, Resolution::Resolved { label: "$ROP_all".into(), address: 0x0100_0000 });
}

#[test]
fn address_offset_is_applied() {
    let bytes = distinct_bytes(32);
    let wanted = gadget("$ROP_g", &bytes[4..12]);
    let result = resolve_gadget(&region(bytes.clone(), 0x0200_0000), &wanted, 0x1000_0000);
    assert_eq!(result, Resolution::Resolved { label: "$ROP_g".into(), address: 0x1200_0004 });

    let result = resolve_gadget(&region(bytes, 0x0200_0000), &wanted, -4);
    assert_eq!(result, Resolution::Resolved { label: "$ROP_g".into(), address: 0x0200_0000 });
}

#[test]
fn empty_region_leaves_everything_unresolved() {
    let wanted = gadget("$ROP_g", &[1, 2, 3, 4]);
    let result = resolve_gadget(&region(Vec::new(), 0), &wanted, 0);
    assert!(matches!(result, Resolution::Unresolved { .. }), "got {result:?}");
}
