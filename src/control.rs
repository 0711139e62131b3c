// Control word packing.
//
// Every operation in a delta stream starts with a 16-bit control word,
// stored big-endian:
//
//   bit 15      op flag (1 = INSERT, 0 = DELETE)
//   bits 14..7  OFFSET, unchanged bytes since the previous operation ended
//   bits 6..0   COUNT, bytes inserted or deleted by this operation
//
// INSERT words are followed by COUNT literal bytes. DELETE words carry no
// payload. A DELETE with COUNT 0 is a padding word: it only advances the
// cursor by OFFSET.

use std::fmt;

/// Largest value representable in the OFFSET field.
pub const MAX_OFFSET: usize = 0xFF;

/// Largest value representable in the COUNT field.
pub const MAX_COUNT: usize = 0x7F;

/// Encoded size of one control word in bytes.
pub const WORD_LEN: usize = 2;

const OP_BIT: u16 = 1 << 15;
const OFFSET_SHIFT: u16 = 7;
const COUNT_MASK: u16 = 0x7F;

// ---------------------------------------------------------------------------
// Op
// ---------------------------------------------------------------------------

/// Operation carried by a control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Insert,
    Delete,
}

impl Op {
    #[inline]
    fn bit(self) -> u16 {
        match self {
            Op::Insert => OP_BIT,
            Op::Delete => 0,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Insert => f.write_str("INSERT"),
            Op::Delete => f.write_str("DELETE"),
        }
    }
}

// ---------------------------------------------------------------------------
// ControlWord
// ---------------------------------------------------------------------------

/// A single unpacked control word.
///
/// Construction goes through [`ControlWord::new`], which refuses a COUNT
/// wider than seven bits, so every value of this type packs losslessly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlWord {
    op: Op,
    offset: u8,
    count: u8,
}

impl ControlWord {
    /// Build a control word, or `None` if either field is out of range.
    pub fn new(op: Op, offset: usize, count: usize) -> Option<Self> {
        if count > MAX_COUNT {
            return None;
        }
        let offset = u8::try_from(offset).ok()?;
        Some(Self {
            op,
            offset,
            count: count as u8,
        })
    }

    /// Build from fields already known to be in range.
    #[inline]
    pub(crate) fn from_fields(op: Op, offset: u8, count: u8) -> Self {
        debug_assert!(count as usize <= MAX_COUNT);
        Self { op, offset, count }
    }

    /// The padding word that skips [`MAX_OFFSET`] unchanged bytes.
    #[inline]
    pub const fn padding() -> Self {
        Self {
            op: Op::Delete,
            offset: MAX_OFFSET as u8,
            count: 0,
        }
    }

    #[inline]
    pub fn op(self) -> Op {
        self.op
    }

    #[inline]
    pub fn offset(self) -> usize {
        self.offset as usize
    }

    #[inline]
    pub fn count(self) -> usize {
        self.count as usize
    }

    /// True for a zero-count DELETE, which only moves the cursor.
    #[inline]
    pub fn is_padding(self) -> bool {
        self.op == Op::Delete && self.count == 0
    }

    /// Pack into the 16-bit wire value.
    #[inline]
    pub fn pack(self) -> u16 {
        self.op.bit() | (u16::from(self.offset) << OFFSET_SHIFT) | u16::from(self.count)
    }

    /// Unpack a 16-bit wire value. Every `u16` is a valid word.
    #[inline]
    pub fn unpack(value: u16) -> Self {
        let op = if value & OP_BIT != 0 {
            Op::Insert
        } else {
            Op::Delete
        };
        Self {
            op,
            offset: ((value & !OP_BIT) >> OFFSET_SHIFT) as u8,
            count: (value & COUNT_MASK) as u8,
        }
    }

    #[inline]
    pub fn to_be_bytes(self) -> [u8; WORD_LEN] {
        self.pack().to_be_bytes()
    }

    #[inline]
    pub fn from_be_bytes(bytes: [u8; WORD_LEN]) -> Self {
        Self::unpack(u16::from_be_bytes(bytes))
    }

    /// Append the packed word to `out`.
    #[inline]
    pub fn write_to(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
