/// A front-to-back sequence of single bits.
///
/// Writers append at the back; readers consume from the front through an
/// internal cursor. Multi-bit integers are packed least-significant bit first.
///
/// Reading past the end is an internal invariant violation: callers only pop
/// bits from streams whose length has already been validated, so every `pop_*`
/// method panics on underrun.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<bool>,
    pos: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(nbits: usize) -> Self {
        Self {
            bits: Vec::with_capacity(nbits),
            pos: 0,
        }
    }

    /// Number of bits not yet consumed.
    pub fn len(&self) -> usize {
        self.bits.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unconsumed bits, in stream order.
    pub fn bits(&self) -> &[bool] {
        &self.bits[self.pos..]
    }

    /// Append all unconsumed bits of `other`.
    pub fn concat(&mut self, other: &BitStream) {
        self.bits.extend_from_slice(other.bits());
    }

    #[inline]
    pub fn push_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn push_byte(&mut self, v: u8) {
        self.push_fixed(v as u32, 8);
    }

    pub fn push_u16(&mut self, v: u16) {
        self.push_fixed(v as u32, 16);
    }

    pub fn push_u32(&mut self, v: u32) {
        self.push_fixed(v, 32);
    }

    /// Values up to 0xFE take one byte; larger values take a 0xFF marker
    /// byte followed by the full 16 bits.
    pub fn push_var_u16(&mut self, v: u16) {
        if v <= 0xFE {
            self.push_byte(v as u8);
        } else {
            self.push_byte(0xFF);
            self.push_u16(v);
        }
    }

    /// Values up to 0xFFFE go through [`push_var_u16`](Self::push_var_u16);
    /// larger values take a `0xFFFF` marker then the low and high halves.
    pub fn push_var_u32(&mut self, v: u32) {
        if v <= 0xFFFE {
            self.push_var_u16(v as u16);
        } else {
            self.push_var_u16(0xFFFF);
            self.push_u16((v & 0xFFFF) as u16);
            self.push_u16((v >> 16) as u16);
        }
    }

    fn push_fixed(&mut self, mut v: u32, nbits: u32) {
        for _ in 0..nbits {
            self.bits.push(v & 1 == 1);
            v >>= 1;
        }
    }

    #[inline]
    pub fn pop_bit(&mut self) -> bool {
        assert!(self.pos < self.bits.len(), "unexpected end of bit stream");
        let bit = self.bits[self.pos];
        self.pos += 1;
        bit
    }

    pub fn pop_byte(&mut self) -> u8 {
        self.pop_fixed(8) as u8
    }

    pub fn pop_u16(&mut self) -> u16 {
        self.pop_fixed(16) as u16
    }

    pub fn pop_u32(&mut self) -> u32 {
        self.pop_fixed(32)
    }

    pub fn pop_var_u16(&mut self) -> u16 {
        let b = self.pop_byte();
        if b == 0xFF {
            self.pop_u16()
        } else {
            b as u16
        }
    }

    pub fn pop_var_u32(&mut self) -> u32 {
        let v = self.pop_var_u16();
        if v != 0xFFFF {
            return v as u32;
        }
        let lo = self.pop_u16() as u32;
        let hi = self.pop_u16() as u32;
        (hi << 16) | lo
    }

    fn pop_fixed(&mut self, nbits: u32) -> u32 {
        let mut v = 0u32;
        for i in 0..nbits {
            v |= (self.pop_bit() as u32) << i;
        }
        v
    }
}

impl FromIterator<bool> for BitStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
            pos: 0,
        }
    }
}

impl Extend<bool> for BitStream {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        self.bits.extend(iter);
    }
}
