//! Test-only helpers: random/distorted sample generation and a minimal
//! reference applier used to check the round-trip law. None of this is
//! part of the public API of `bsdiff-core`; applying a patch back to
//! `source` is out of that crate's scope.

use rand::distributions::uniform::{SampleUniform, Uniform};
use rand::prelude::*;

use bsdiff_core::decode_offt;

/// `n` independent uniformly random bytes.
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut rng = thread_rng();
    let mut bytes = Vec::with_capacity(n);
    for _ in 0..n {
        bytes.push(rng.gen());
    }
    bytes
}

/// Produces a target that is `similar` (0.0 = unrelated, 1.0 = copied
/// verbatim) to `source`: an interleaving of byte runs copied from random
/// offsets of `source` (with some bytes individually scrambled) and runs
/// of fresh random bytes.
pub fn distort(source: &[u8], similar: f64) -> Vec<u8> {
    if source.is_empty() {
        return random_bytes(random_between(0, 64));
    }

    let similar = fraction(similar);
    let rate = convex_mapping(similar);

    let tsize = random_between(
        (source.len() as f64 * 0.75) as usize,
        (source.len() as f64 * 1.25) as usize,
    )
    .max(1);
    let dmax = random_between(
        Ord::min(16, (source.len() as f64 * 0.02) as usize),
        Ord::max(32, (source.len() as f64 * 0.33) as usize),
    );
    let emax = random_between(0, (source.len() as f64 * 0.15 * (1.0 - similar)) as usize);

    let mut target = Vec::with_capacity(tsize);
    let mut rng = thread_rng();
    while target.len() < tsize {
        let remain = tsize - target.len();
        let dsize = {
            let dhi = Ord::min(Ord::min(dmax, remain), source.len());
            let dlo = Ord::min(16, dhi);
            random_between(dlo, dhi)
        };
        let offset = random_between(0, source.len() - dsize);
        for &x in &source[offset..offset + dsize] {
            if random_decide(rate) {
                target.push(x);
            } else {
                target.push(rng.gen());
            }
        }

        let remain = tsize - target.len();
        if !random_decide(rate) {
            let esize = random_between(0, Ord::min(emax, remain));
            for _ in 0..esize {
                target.push(rng.gen());
            }
        }
    }

    target
}

fn random_decide(rate: f64) -> bool {
    random_between(0.0, 1.0) <= fraction(rate)
}

fn random_between<X: SampleUniform>(lo: X, hi: X) -> X {
    let mut rng = thread_rng();
    Uniform::new_inclusive(lo, hi).sample(&mut rng)
}

fn fraction(x: f64) -> f64 {
    if x.is_nan() || x.is_sign_negative() {
        0.0
    } else if x.is_infinite() || x > 1.0 {
        1.0
    } else {
        x
    }
}

fn convex_mapping(frac: f64) -> f64 {
    (1.0 - (1.0 - frac) * (1.0 - frac)).sqrt()
}

/// Applies a raw (un-framed, uncompressed) control/diff/extra stream
/// produced by [`bsdiff_core::Bsdiff::compare`] against the blanket
/// `std::io::Write` sink back onto `source`, reproducing `target`.
///
/// Deliberately minimal: no `BSDIFF40` header, no compression. Exists
/// only to let tests assert the round-trip law.
pub fn apply_raw(source: &[u8], patch: &[u8]) -> Vec<u8> {
    let mut target = Vec::new();
    let mut oldpos: i64 = 0;
    let mut off = 0usize;

    while off < patch.len() {
        let lenf = decode_offt(&patch[off..off + 8]) as usize;
        let gap = decode_offt(&patch[off + 8..off + 16]) as usize;
        let jump = decode_offt(&patch[off + 16..off + 24]);
        off += 24;

        for i in 0..lenf {
            target.push(source[oldpos as usize + i].wrapping_add(patch[off + i]));
        }
        off += lenf;
        oldpos += lenf as i64;

        target.extend_from_slice(&patch[off..off + gap]);
        off += gap;

        oldpos += jump;
    }

    target
}
