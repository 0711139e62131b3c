// Delta stream reader.
//
// Walks an encoded stream word by word without applying it. Used to
// inspect and summarize deltas; applying one needs the old document and is
// left to the consumer.

use std::fmt;

use thiserror::Error;

use crate::control::{ControlWord, Op, WORD_LEN};
use crate::encoder::EncodeStats;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The stream ends inside a control word or an INSERT payload.
    #[error("truncated stream at byte {at}: need {needed} more bytes")]
    Truncated { at: usize, needed: usize },
}

// ---------------------------------------------------------------------------
// Instruction
// ---------------------------------------------------------------------------

/// One control word and, for INSERT, its literal payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// Byte position of the control word in the stream.
    pub position: usize,
    pub word: ControlWord,
    /// Empty for DELETE.
    pub payload: &'a [u8],
}

impl Instruction<'_> {
    #[inline]
    pub fn op(&self) -> Op {
        self.word.op()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.word.offset()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.word.count()
    }

    /// Total encoded size, word plus payload.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        WORD_LEN + self.payload.len()
    }
}

impl fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8}  {} offset={} count={}",
            self.position,
            self.op(),
            self.offset(),
            self.count()
        )?;
        if self.word.is_padding() {
            f.write_str(" (padding)")?;
        }
        if !self.payload.is_empty() {
            write!(
                f,
                " \"{}\"",
                String::from_utf8_lossy(self.payload).escape_debug()
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Iterator
// ---------------------------------------------------------------------------

/// Iterates the instructions of an encoded stream.
///
/// Yields `Err` once on malformed input and then stops.
pub struct InstructionIterator<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> InstructionIterator<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read(&mut self) -> Result<Instruction<'a>, FormatError> {
        let position = self.pos;
        let rest = &self.data[position..];
        let Some((&[hi, lo], rest)) = rest.split_first_chunk::<WORD_LEN>() else {
            return Err(FormatError::Truncated {
                at: position,
                needed: WORD_LEN - rest.len(),
            });
        };
        let word = ControlWord::from_be_bytes([hi, lo]);

        let payload_len = match word.op() {
            Op::Insert => word.count(),
            Op::Delete => 0,
        };
        if rest.len() < payload_len {
            return Err(FormatError::Truncated {
                at: position + WORD_LEN,
                needed: payload_len - rest.len(),
            });
        }

        self.pos = position + WORD_LEN + payload_len;
        Ok(Instruction {
            position,
            word,
            payload: &rest[..payload_len],
        })
    }
}

impl<'a> Iterator for InstructionIterator<'a> {
    type Item = Result<Instruction<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let result = self.read();
        if result.is_err() {
            self.pos = self.data.len();
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for InstructionIterator<'_> {}

/// Parse every instruction of `data`.
pub fn instructions(data: &[u8]) -> InstructionIterator<'_> {
    InstructionIterator::new(data)
}

/// Total the counters of an encoded stream.
pub fn summarize(data: &[u8]) -> Result<EncodeStats, FormatError> {
    let mut stats = EncodeStats::default();
    for inst in instructions(data) {
        let inst = inst?;
        stats.control_words += 1;
        match inst.op() {
            Op::Insert => stats.literal_bytes += inst.count(),
            Op::Delete if inst.word.is_padding() => stats.padding_words += 1,
            Op::Delete => stats.deleted_bytes += inst.count(),
        }
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
