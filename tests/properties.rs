//! Generative checks of the round-trip law, size invariants, and
//! determinism.

use std::io;

use bsdiff_core::Bsdiff;
use bsdiff_core_testutils::apply_raw;
use quickcheck_macros::quickcheck;

fn diff_raw(source: &[u8], target: &[u8]) -> Vec<u8> {
    let mut patch = Vec::new();
    Bsdiff::new(source)
        .expect("index build")
        .compare(target, io::Cursor::new(&mut patch))
        .expect("compare");
    patch
}

#[quickcheck]
fn round_trip(source: Vec<u8>, target: Vec<u8>) -> bool {
    let source = &source[..source.len().min(4096)];
    let target = &target[..target.len().min(4096)];
    let patch = diff_raw(source, target);
    apply_raw(source, &patch) == target
}

#[quickcheck]
fn determinism(source: Vec<u8>, target: Vec<u8>) -> bool {
    let source = &source[..source.len().min(2048)];
    let target = &target[..target.len().min(2048)];
    diff_raw(source, target) == diff_raw(source, target)
}

#[quickcheck]
fn size_invariant_sums_to_target_len(source: Vec<u8>, target: Vec<u8>) -> bool {
    let source = &source[..source.len().min(2048)];
    let target = &target[..target.len().min(2048)];
    let patch = diff_raw(source, target);

    let mut off = 0;
    let mut total = 0usize;
    let mut cursor: i64 = 0;
    while off < patch.len() {
        let lenf = bsdiff_core::decode_offt(&patch[off..off + 8]);
        let gap = bsdiff_core::decode_offt(&patch[off + 8..off + 16]);
        let jump = bsdiff_core::decode_offt(&patch[off + 16..off + 24]);
        off += 24;
        if lenf < 0 || gap < 0 {
            return false;
        }
        total += lenf as usize + gap as usize;
        off += lenf as usize + gap as usize;
        cursor += lenf + jump;
        if cursor < 0 || cursor > source.len() as i64 {
            return false;
        }
    }
    total == target.len()
}

#[test]
fn buffer_size_does_not_change_output() {
    let source = b"the quick brown fox jumps over the lazy dog".repeat(50);
    let target = {
        let mut t = source.clone();
        t.truncate(t.len() - 37);
        t.extend_from_slice(b"a rather different ending entirely");
        t
    };

    let index = Bsdiff::new(&source).unwrap();
    let mut small = Vec::new();
    index
        .buffer_size(1)
        .compare(&target, io::Cursor::new(&mut small))
        .unwrap();

    let index = Bsdiff::new(&source).unwrap();
    let mut large = Vec::new();
    index
        .buffer_size(1 << 20)
        .compare(&target, io::Cursor::new(&mut large))
        .unwrap();

    assert_eq!(small, large);
}
