const MSB_MASK: u64 = 0x8080_8080_8080_8080;
const LSB_MASK: u64 = 0x0101_0101_0101_0101;

pub trait ByteBuffer {
    fn byte_position(&self, needle: u8) -> Option<usize>;

    /// Splits on `delimiter` into exactly `N` fields. Returns `None` when the
    /// buffer holds more or fewer fields.
    fn split_fields<const N: usize>(&self, delimiter: u8) -> Option<[&[u8]; N]>;
}

impl ByteBuffer for [u8] {
    #[inline(always)]
    fn byte_position(&self, needle: u8) -> Option<usize> {
        let mut i = 0;

        let repeat = LSB_MASK * needle as u64;
        while i + 8 <= self.len() {
            let chunk = u64::from_le_bytes([
                self[i],
                self[i + 1],
                self[i + 2],
                self[i + 3],
                self[i + 4],
                self[i + 5],
                self[i + 6],
                self[i + 7],
            ]);
            let xored = chunk ^ repeat;
            let matching_bytes = xored.wrapping_sub(LSB_MASK) & !xored & MSB_MASK;

            if matching_bytes != 0 {
                // Little-endian load: the lowest set byte is the first match.
                let j = (matching_bytes.trailing_zeros() / 8) as usize;
                return Some(i + j);
            }

            i += 8;
        }

        while i < self.len() {
            if self[i] == needle {
                return Some(i);
            }
            i += 1;
        }

        None
    }

    #[inline(always)]
    fn split_fields<const N: usize>(&self, delimiter: u8) -> Option<[&[u8]; N]> {
        if N == 0 {
            return None;
        }

        let mut fields: [&[u8]; N] = [&[]; N];
        let mut rest = self;

        for field in fields.iter_mut().take(N - 1) {
            let pos = rest.byte_position(delimiter)?;
            *field = &rest[..pos];
            rest = &rest[pos + 1..];
        }

        if rest.byte_position(delimiter).is_some() {
            return None;
        }
        fields[N - 1] = rest;

        Some(fields)
    }
}

/// Number of delimited fields in `buf`, for error reporting.
pub fn field_count(buf: &[u8], delimiter: u8) -> usize {
    let mut count = 1;
    let mut rest = buf;
    while let Some(pos) = rest.byte_position(delimiter) {
        count += 1;
        rest = &rest[pos + 1..];
    }
    count
}
