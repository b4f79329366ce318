//! Sign-magnitude little-endian 8-byte integer encoding used for the
//! three fields of every control header.

/// Encodes `x` into `buf[0..8]` as sign-magnitude little-endian: the low
/// 7 bytes hold `|x|`, and the high bit of `buf[7]` is the sign flag, with
/// the remaining 7 bits holding the 8th magnitude byte.
pub fn encode_offt(x: i64, buf: &mut [u8]) {
    debug_assert!(buf.len() >= 8);
    let mut y = x.unsigned_abs();
    for b in buf[..7].iter_mut() {
        *b = y as u8;
        y >>= 8;
    }
    let mut last = y as u8;
    if x < 0 {
        last |= 0x80;
    }
    buf[7] = last;
}

/// Decodes a sign-magnitude little-endian 8-byte integer, the inverse of
/// [`encode_offt`].
pub fn decode_offt(buf: &[u8]) -> i64 {
    debug_assert!(buf.len() >= 8);
    let mut y: u64 = 0;
    for &b in buf[..7].iter().rev() {
        y = (y << 8) | b as u64;
    }
    let negative = buf[7] & 0x80 != 0;
    y = (y << 8) | (buf[7] & 0x7f) as u64;
    if negative {
        -(y as i64)
    } else {
        y as i64
    }
}
