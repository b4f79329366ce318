//! Approximate-longest-prefix match search over the suffix index.
//!
//! This descends one side of the binary split without examining both
//! subtrees, so the returned length is only a lower bound on the true
//! longest common prefix. That is intentional: the probe loop in `diff.rs`
//! papers over the gap by scanning forward until a match beats simple
//! extrapolation by a wide enough margin. Turning this into a true LCP
//! search would produce smaller patches but stop matching the reference
//! algorithm byte for byte.

use crate::suffix::SuffixIndex;

/// Length of the common prefix of `a` and `b`.
#[inline]
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    let n = Ord::min(a.len(), b.len());
    a[..n].iter().zip(&b[..n]).take_while(|(x, y)| x == y).count()
}

/// Returns `(pos, len)`: `pos = I[k]` for some `k` in `[st, en]`, and
/// `len` is the length of the common prefix between `source[pos..]` and
/// `target[scan..]` found via iterative binary descent.
pub(crate) fn search_approx(
    index: &SuffixIndex,
    source: &[u8],
    target: &[u8],
    mut st: usize,
    mut en: usize,
) -> (usize, usize) {
    loop {
        if en - st < 2 {
            let i_st = index.at(st);
            let i_en = index.at(en);
            let len_st = common_prefix_len(&source[i_st..], target);
            let len_en = common_prefix_len(&source[i_en..], target);
            // Ties favor `I[en]`.
            return if len_st > len_en {
                (i_st, len_st)
            } else {
                (i_en, len_en)
            };
        }

        let x = st + (en - st) / 2;
        let i_x = index.at(x);
        let k = Ord::min(source.len() - i_x, target.len());
        if source[i_x..i_x + k] < target[..k] {
            st = x;
        } else {
            en = x;
        }
    }
}
