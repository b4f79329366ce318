//! Match extender and emitter, and the public [`Bsdiff`] entry point.

use tracing::trace;

use crate::error::{DiffError, IndexError};
use crate::offt::encode_offt;
use crate::search::search_approx;
use crate::sink::{write_chunked, Sink, WriteKind};
use crate::suffix::SuffixIndex;

/// Threshold past which a freshly found match is worth a new control
/// record instead of letting the previous copy's offset keep explaining
/// `target` for free. Load-bearing for the output bytes; do not retune.
const DISMATCH_MARGIN: i64 = 8;

/// Default bound on how many diff/extra bytes are materialized and handed
/// to the sink per call.
pub const DEFAULT_BUFFER_SIZE: usize = 16384;

/// Delta compressor: indexes `source` once, then emits a bsdiff-style
/// control/diff/extra stream describing how to turn `source` into any
/// `target` via [`Bsdiff::compare`].
pub struct Bsdiff<'s> {
    source: &'s [u8],
    index: SuffixIndex,
    buffer_size: usize,
}

impl<'s> Bsdiff<'s> {
    /// Prepares for delta compression and immediately sorts the suffix array.
    ///
    /// Returns an error if `source` is too large to index.
    pub fn new(source: &'s [u8]) -> Result<Self, IndexError> {
        let index = SuffixIndex::build(source)?;
        Ok(Bsdiff {
            source,
            index,
            buffer_size: DEFAULT_BUFFER_SIZE,
        })
    }

    /// Sets the buffer size for delta calculation (`bs >= 128`, default
    /// [`DEFAULT_BUFFER_SIZE`]).
    pub fn buffer_size(mut self, mut bs: usize) -> Self {
        if bs < 128 {
            bs = 128;
        }
        self.buffer_size = bs;
        self
    }

    /// Searches matches in `target` and writes the control/diff/extra
    /// stream to `sink`.
    pub fn compare<S: Sink>(&self, target: &[u8], mut sink: S) -> Result<(), DiffError<S::Error>> {
        let _span = tracing::info_span!(
            "bsdiff::compare",
            source_len = self.source.len(),
            target_len = target.len()
        )
        .entered();

        let emitter = Emitter::new(self.source, target, &self.index);
        for emission in emitter {
            trace!(
                lastscan = emission.lastscan,
                lenf = emission.lenf,
                gap = emission.gap,
                jump = emission.jump,
                "emitting record"
            );
            write_emission(&mut sink, self.source, target, &emission, self.buffer_size)
                .map_err(DiffError)?;
        }
        Ok(())
    }
}

/// One accepted match, fully resolved: copy `lenf` bytes starting at
/// `(lastscan, lastpos)`, then `gap` literal bytes, then jump the source
/// cursor by `jump` before the next record.
struct Emission {
    lastscan: usize,
    lastpos: usize,
    lenf: usize,
    gap: usize,
    jump: i64,
}

/// Drives the match search as an iterator over accepted matches.
///
/// Position bookkeeping is signed 64-bit throughout: a jump can
/// legitimately be negative, so these are not sizes.
struct Emitter<'s, 't, 'i> {
    source: &'s [u8],
    target: &'t [u8],
    index: &'i SuffixIndex,

    scan: i64,
    pos: i64,
    len: i64,

    lastscan: i64,
    lastpos: i64,
    lastoffset: i64,
}

impl<'s, 't, 'i> Emitter<'s, 't, 'i> {
    fn new(source: &'s [u8], target: &'t [u8], index: &'i SuffixIndex) -> Self {
        Emitter {
            source,
            target,
            index,
            scan: 0,
            pos: 0,
            len: 0,
            lastscan: 0,
            lastpos: 0,
            lastoffset: 0,
        }
    }

    #[inline]
    fn slen(&self) -> i64 {
        self.source.len() as i64
    }

    #[inline]
    fn tlen(&self) -> i64 {
        self.target.len() as i64
    }

    /// Approximate-longest-prefix search at `target[scan..]` over the
    /// whole suffix index.
    fn search(&self, scan: i64) -> (i64, i64) {
        let (pos, len) = search_approx(
            self.index,
            self.source,
            &self.target[scan as usize..],
            0,
            self.index.last(),
        );
        (pos as i64, len as i64)
    }

    /// Would `target[i]` already be reproduced correctly by continuing the
    /// previous copy at `lastoffset`?
    #[inline]
    fn free_under_extrapolation(&self, i: i64) -> bool {
        let si = i + self.lastoffset;
        si >= 0 && si < self.slen() && self.source[si as usize] == self.target[i as usize]
    }

    /// Advances `scan` one byte at a time, searching at each step, until a
    /// newly found match is judged worth a new record or `target` is
    /// exhausted. Returns `true` if an emission should happen at the
    /// resulting `(scan, pos, len)`.
    fn probe(&mut self) -> bool {
        let mut oldscore: i64 = 0;
        self.scan += self.len;
        let mut scsc = self.scan;

        while self.scan < self.tlen() {
            let (pos, len) = self.search(self.scan);
            self.pos = pos;
            self.len = len;

            while scsc < self.scan + self.len {
                if self.free_under_extrapolation(scsc) {
                    oldscore += 1;
                }
                scsc += 1;
            }

            if (self.len == oldscore && self.len != 0) || self.len > oldscore + DISMATCH_MARGIN {
                break;
            }

            if self.free_under_extrapolation(self.scan) {
                oldscore -= 1;
            }
            self.scan += 1;
        }

        self.len != oldscore || self.scan == self.tlen()
    }

    /// Widens the copy backwards in `target` from `scan` to fill the gap
    /// left after the previous emission, maximizing the running score
    /// `2s - i`.
    fn extend_forward(&self) -> i64 {
        let mut s = 0i64;
        let mut best_score = 0i64;
        let mut lenf = 0i64;
        let mut i = 0i64;
        while self.lastscan + i < self.scan && self.lastpos + i < self.slen() {
            if self.source[(self.lastpos + i) as usize] == self.target[(self.lastscan + i) as usize] {
                s += 1;
            }
            i += 1;
            let score = 2 * s - i;
            if score > best_score {
                best_score = score;
                lenf = i;
            }
        }
        lenf
    }

    /// Widens the new match backwards from its start to fill the same gap
    /// from the other side.
    fn extend_backward(&self) -> i64 {
        if self.scan >= self.tlen() {
            return 0;
        }
        let mut s = 0i64;
        let mut best_score = 0i64;
        let mut lenb = 0i64;
        let mut i = 1i64;
        while self.scan >= self.lastscan + i && self.pos >= i {
            if self.source[(self.pos - i) as usize] == self.target[(self.scan - i) as usize] {
                s += 1;
            }
            let score = 2 * s - i;
            if score > best_score {
                best_score = score;
                lenb = i;
            }
            i += 1;
        }
        lenb
    }

    /// If the forward and backward extensions overlap, picks the split
    /// point maximizing forward-matches minus backward-matches in the
    /// contested region.
    fn resolve_overlap(&self, mut lenf: i64, mut lenb: i64) -> (i64, i64) {
        let overlap = (self.lastscan + lenf) - (self.scan - lenb);
        if overlap <= 0 {
            return (lenf, lenb);
        }

        let mut s = 0i64;
        let mut best_score = 0i64;
        let mut lens = 0i64;
        for i in 0..overlap {
            let fwd_match = self.target[(self.lastscan + lenf - overlap + i) as usize]
                == self.source[(self.lastpos + lenf - overlap + i) as usize];
            let bwd_match =
                self.target[(self.scan - lenb + i) as usize] == self.source[(self.pos - lenb + i) as usize];
            if fwd_match {
                s += 1;
            }
            if bwd_match {
                s -= 1;
            }
            if s > best_score {
                best_score = s;
                lens = i + 1;
            }
        }

        lenf += lens - overlap;
        lenb -= lens;
        (lenf, lenb)
    }
}

impl<'s, 't, 'i> Iterator for Emitter<'s, 't, 'i> {
    type Item = Emission;

    fn next(&mut self) -> Option<Emission> {
        while self.scan < self.tlen() {
            if !self.probe() {
                continue;
            }

            let lenf = self.extend_forward();
            let lenb = self.extend_backward();
            let (lenf, lenb) = self.resolve_overlap(lenf, lenb);

            let lastscan = self.lastscan;
            let lastpos = self.lastpos;
            let new_scan = self.scan - lenb;
            let new_pos = self.pos - lenb;
            let gap = new_scan - (lastscan + lenf);
            let jump = new_pos - (lastpos + lenf);

            self.lastscan = new_scan;
            self.lastpos = new_pos;
            self.lastoffset = self.pos - self.scan;

            return Some(Emission {
                lastscan: lastscan as usize,
                lastpos: lastpos as usize,
                lenf: lenf as usize,
                gap: gap as usize,
                jump,
            });
        }
        None
    }
}

/// Encodes and writes one emission's control header, diff run, and extra
/// run to `sink`, chunked to at most `buffer_size` bytes per write.
fn write_emission<S: Sink>(
    sink: &mut S,
    source: &[u8],
    target: &[u8],
    e: &Emission,
    buffer_size: usize,
) -> Result<(), S::Error> {
    let mut ctl = [0u8; 24];
    encode_offt(e.lenf as i64, &mut ctl[0..8]);
    encode_offt(e.gap as i64, &mut ctl[8..16]);
    encode_offt(e.jump, &mut ctl[16..24]);
    write_chunked(sink, &ctl, WriteKind::Control, buffer_size)?;

    let mut diff_buf = vec![0u8; Ord::min(e.lenf, buffer_size)];
    let mut remaining = e.lenf;
    let mut off = 0;
    while remaining > 0 {
        let k = Ord::min(remaining, diff_buf.len());
        let src = &source[e.lastpos + off..e.lastpos + off + k];
        let tgt = &target[e.lastscan + off..e.lastscan + off + k];
        for ((d, &s), &t) in diff_buf[..k].iter_mut().zip(src).zip(tgt) {
            *d = t.wrapping_sub(s);
        }
        write_chunked(sink, &diff_buf[..k], WriteKind::Diff, buffer_size)?;
        off += k;
        remaining -= k;
    }

    let extra = &target[e.lastscan + e.lenf..e.lastscan + e.lenf + e.gap];
    write_chunked(sink, extra, WriteKind::Extra, buffer_size)?;

    Ok(())
}
