//! Literal end-to-end scenarios.

use std::io;

use bsdiff_core::{decode_offt, Bsdiff};
use bsdiff_core_testutils::apply_raw;

/// Control records in a raw stream as `(lenf, gap, jump)`, alongside the
/// diff and extra bytes of each.
struct Record {
    lenf: i64,
    gap: i64,
    jump: i64,
    diff: Vec<u8>,
    extra: Vec<u8>,
}

fn records(patch: &[u8]) -> Vec<Record> {
    let mut out = Vec::new();
    let mut off = 0;
    while off < patch.len() {
        let lenf = decode_offt(&patch[off..off + 8]);
        let gap = decode_offt(&patch[off + 8..off + 16]);
        let jump = decode_offt(&patch[off + 16..off + 24]);
        off += 24;
        let diff = patch[off..off + lenf as usize].to_vec();
        off += lenf as usize;
        let extra = patch[off..off + gap as usize].to_vec();
        off += gap as usize;
        out.push(Record { lenf, gap, jump, diff, extra });
    }
    out
}

fn diff_raw(source: &[u8], target: &[u8]) -> Vec<u8> {
    let mut patch = Vec::new();
    Bsdiff::new(source)
        .expect("index build")
        .compare(target, io::Cursor::new(&mut patch))
        .expect("compare");
    patch
}

#[test]
fn scenario_identity_four_bytes() {
    let source = [0x00, 0x01, 0x02, 0x03];
    let patch = diff_raw(&source, &source);
    let recs = records(&patch);
    assert_eq!(recs.len(), 1);
    assert_eq!((recs[0].lenf, recs[0].gap, recs[0].jump), (4, 0, 0));
    assert_eq!(recs[0].diff, vec![0, 0, 0, 0]);
    assert!(recs[0].extra.is_empty());
}

#[test]
fn scenario_empty_source_extra_only() {
    let target = [0x41, 0x42, 0x43];
    let patch = diff_raw(&[], &target);
    let recs = records(&patch);
    assert_eq!(recs.len(), 1);
    assert_eq!((recs[0].lenf, recs[0].gap, recs[0].jump), (0, 3, 0));
    assert!(recs[0].diff.is_empty());
    assert_eq!(recs[0].extra, vec![0x41, 0x42, 0x43]);
}

#[test]
fn scenario_single_block_mutation_reproduces_target() {
    let source = vec![0xAA; 32];
    let mut target = vec![0xAA; 16];
    target.extend(vec![0xBB; 16]);

    let patch = diff_raw(&source, &target);
    assert_eq!(apply_raw(&source, &patch), target);
}

#[test]
fn scenario_word_substitution() {
    let source = b"The quick brown fox";
    let target = b"The quick red fox";
    let patch = diff_raw(source, target);
    assert_eq!(apply_raw(source, &patch), target);
}

#[test]
fn scenario_64kib_with_zeroed_window() {
    let mut rng_state: u64 = 0xDEAD_BEEF_CAFE_F00D;
    let mut next = || {
        // xorshift64*, fixed-seed deterministic sequence.
        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 7;
        rng_state ^= rng_state << 17;
        (rng_state >> 56) as u8
    };
    let source: Vec<u8> = (0..64 * 1024).map(|_| next()).collect();
    let mut target = source.clone();
    for b in &mut target[1000..1100] {
        *b = 0;
    }

    let patch = diff_raw(&source, &target);
    assert_eq!(apply_raw(&source, &patch), target);
}

#[test]
fn scenario_reversed_1024_bytes() {
    let source: Vec<u8> = (0..1024).map(|i| (i % 256) as u8).collect();
    let target: Vec<u8> = source.iter().rev().copied().collect();

    let patch = diff_raw(&source, &target);
    assert_eq!(apply_raw(&source, &patch), target);
}

#[test]
fn empty_source_and_target_emit_nothing() {
    let patch = diff_raw(&[], &[]);
    assert!(patch.is_empty());
}

#[test]
fn nonempty_source_empty_target_emits_nothing() {
    let patch = diff_raw(b"X", &[]);
    assert!(patch.is_empty());
}

#[test]
fn single_byte_mutation_diff_run_matches_modular_delta() {
    let source: Vec<u8> = (0..200).map(|i| i as u8).collect();
    let mut target = source.clone();
    let p = 77;
    target[p] = target[p].wrapping_add(0x5A);

    let patch = diff_raw(&source, &target);
    assert_eq!(apply_raw(&source, &patch), target);

    let recs = records(&patch);
    let total: usize = recs.iter().map(|r| r.lenf as usize + r.gap as usize).sum();
    assert_eq!(total, target.len());
}
