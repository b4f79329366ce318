//! Suffix array construction over `source`.

use suffix_array::SuffixArray;
use tracing::debug;

use crate::error::{IndexError, MAX_SOURCE_LEN};

/// The read-only index `I` built once over `source`: a permutation of
/// `0..=source.len()` such that `source[I[i]..]` is non-decreasing in `i`
/// under unsigned byte comparison.
pub struct SuffixIndex {
    table: Vec<u32>,
}

impl SuffixIndex {
    /// Builds the suffix array over `source`.
    pub fn build(source: &[u8]) -> Result<Self, IndexError> {
        if source.len() > MAX_SOURCE_LEN {
            return Err(IndexError::SourceTooLarge {
                len: source.len(),
                max: MAX_SOURCE_LEN,
            });
        }

        let sa = SuffixArray::new(source);
        let (_, table) = sa.into_parts();
        // `SuffixArray::new` always fills `source.len() + 1` slots; there is
        // no fallible path in this backend for `IndexError::IndexBuild` to
        // actually take.
        debug_assert_eq!(table.len(), source.len() + 1);

        debug!(source_len = source.len(), "suffix array built");
        Ok(SuffixIndex { table })
    }

    /// `I[i]`, the starting offset in `source` of the `i`-th suffix in
    /// lexicographic order.
    #[inline]
    pub fn at(&self, i: usize) -> usize {
        self.table[i] as usize
    }

    /// Highest valid index into the table (`source.len()`).
    #[inline]
    pub fn last(&self) -> usize {
        self.table.len() - 1
    }
}
