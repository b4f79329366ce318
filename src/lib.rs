/*!
Fast and memory saving bsdiff 4.x compatible binary delta compressor core.

This crate implements the matching half of the bsdiff algorithm: it indexes
a `source` buffer once, then emits a stream of control/diff/extra records
describing how to reconstruct any `target` from it. It writes exactly that
stream, the 24-byte-header, sign-magnitude-integer wire format bsdiff
patch files are built from, through a caller-supplied [`Sink`], and
nothing past that boundary. Framing the record stream into a patch
container, compressing it, applying the result back to `source`, and
reading/writing files are all left to the caller. See
`cmd/bsdiff.rs` (behind the `cmd` feature) for a worked example of all of
those.

Add dependency to `Cargo.toml` under your project:
```toml
[dependencies]
bsdiff-core = "0.1"
```

Examples
--------

Collect the raw control/diff/extra stream into one buffer:
```rust
use std::io;
use bsdiff_core::Bsdiff;

fn diff(source: &[u8], target: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut patch = Vec::new();
    Bsdiff::new(source)?.compare(target, io::Cursor::new(&mut patch))?;
    Ok(patch)
}
```

Route each record kind into its own stream instead, as the classic
`BSDIFF40` container does (one bzip2 stream per kind):
```rust
use bsdiff_core::{Bsdiff, Sink, WriteKind};

struct ThreeStreams {
    control: Vec<u8>,
    diff: Vec<u8>,
    extra: Vec<u8>,
}

impl Sink for ThreeStreams {
    type Error = std::convert::Infallible;

    fn write(&mut self, buf: &[u8], kind: WriteKind) -> Result<(), Self::Error> {
        let stream = match kind {
            WriteKind::Control => &mut self.control,
            WriteKind::Diff => &mut self.diff,
            WriteKind::Extra => &mut self.extra,
        };
        stream.extend_from_slice(buf);
        Ok(())
    }
}
```
*/

mod diff;
mod error;
mod offt;
mod search;
mod sink;
mod suffix;

pub use diff::{Bsdiff, DEFAULT_BUFFER_SIZE};
pub use error::{DiffError, IndexError, MAX_SOURCE_LEN};
pub use offt::{decode_offt, encode_offt};
pub use sink::{Sink, WriteKind};
