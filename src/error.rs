/// Max length of the source data.
pub const MAX_SOURCE_LEN: usize = suffix_array::MAX_LENGTH;

/// Errors raised by [`crate::Bsdiff::new`] before any output has been produced.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// `source` exceeds the maximum length the suffix array can index.
    #[error("source data too large to index ({len} bytes, max {max})")]
    SourceTooLarge { len: usize, max: usize },

    /// The suffix array construction failed to produce a usable index.
    #[error("failed to build suffix array over {source_len} source bytes")]
    IndexBuild { source_len: usize },
}

/// The caller-supplied sink returned an error while writing a control, diff,
/// or extra run. The only way [`crate::Bsdiff::compare`] can fail.
#[derive(Debug, thiserror::Error)]
#[error("sink write failed")]
pub struct DiffError<E: std::error::Error + Send + Sync + 'static>(#[source] pub E);
