use std::io;

/// Role of a byte run written to a [`Sink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// The 24-byte `(lenf, gap, jump)` control header.
    Control,
    /// `lenf` modular-difference bytes.
    Diff,
    /// `gap` literal bytes copied from `target`.
    Extra,
}

/// A capability to receive the byte runs the differ produces, tagged by
/// kind. Implement this to route each kind into its own stream, or rely
/// on the blanket impl over [`std::io::Write`] to collect everything into
/// a single writer, ignoring `kind`.
pub trait Sink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes `buf`, tagged as `kind`. All-or-nothing: either every byte
    /// is accepted, or the differ aborts at the returned error.
    fn write(&mut self, buf: &[u8], kind: WriteKind) -> Result<(), Self::Error>;
}

impl<W: io::Write> Sink for W {
    type Error = io::Error;

    fn write(&mut self, buf: &[u8], _kind: WriteKind) -> Result<(), io::Error> {
        self.write_all(buf)
    }
}

/// Splits a byte run into writes bounded by `chunk_size`.
pub(crate) fn write_chunked<S: Sink>(
    sink: &mut S,
    mut buf: &[u8],
    kind: WriteKind,
    chunk_size: usize,
) -> Result<(), S::Error> {
    debug_assert!(chunk_size > 0);
    if buf.is_empty() {
        return Ok(());
    }
    while !buf.is_empty() {
        let n = Ord::min(buf.len(), chunk_size);
        let (head, tail) = buf.split_at(n);
        sink.write(head, kind)?;
        buf = tail;
    }
    Ok(())
}
