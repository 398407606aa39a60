// Bit stream
//------------------------------------------------------------------------------

/// Growable MSB-first bit buffer with a fixed bit capacity.
///
/// Carries the serialized segments through padding, and the interleaved
/// codewords from the error correction coder to the matrix builder.
#[derive(Debug, Clone)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { data: vec![0; (capacity + 7) >> 3], len: 0, capacity }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Filled bytes, the trailing byte zero padded.
    pub fn data(&self) -> &[u8] {
        &self.data[..(self.len + 7) >> 3]
    }

    /// Pushes the `size` low bits of `bits`, most significant first.
    pub fn push_bits(&mut self, bits: u16, size: usize) {
        debug_assert!(
            size >= (16 - bits.leading_zeros()) as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        let mut remaining = size;
        while remaining > 0 {
            let offset = self.len & 7;
            let pos = self.len >> 3;
            let take = remaining.min(8 - offset);
            let chunk = ((bits >> (remaining - take)) & ((1 << take) - 1)) as u8;
            self.data[pos] |= chunk << (8 - offset - take);
            self.len += take;
            remaining -= take;
        }
    }

    pub fn push(&mut self, bit: bool) {
        debug_assert!(
            self.len < self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + 1
        );

        if bit {
            let offset = self.len & 7;
            let pos = self.len >> 3;
            self.data[pos] |= 0b10000000 >> offset;
        }

        self.len += 1;
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_bits(b as u16, 8);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| (self.data[i >> 3] >> (7 - (i & 7))) & 1 == 1)
    }
}
