// Delta encoder: run traversal and control-word emission.
//
// Consumes edit-script spans left to right and appends control words (and
// INSERT payloads) to an output buffer. KEEP spans emit nothing; they only
// grow the offset carried into the next word. Fields that would overflow
// are handled by splitting:
//
//   - an offset above 255 is drained with padding words (DELETE, 255, 0)
//   - a run longer than 127 bytes becomes several words, the first carrying
//     the offset and the rest carrying offset 0
//
// All lengths are UTF-8 byte lengths. A chunk boundary may fall inside a
// multi-byte character; INSERT payloads are raw bytes and concatenate back
// to the original text.

use log::{debug, trace};
use thiserror::Error;

use crate::control::{ControlWord, MAX_COUNT, MAX_OFFSET, Op, WORD_LEN};
use crate::span::{ScriptError, Span, Tag};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Precondition violations detected while encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A zero-length INSERT or DELETE reached the encoder.
    #[error("zero-length {0:?} span")]
    EmptySpan(Tag),
    /// The edit script does not describe the two documents.
    #[error("edit script does not match documents: {0}")]
    ScriptMismatch(#[from] ScriptError),
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Counters accumulated while encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Control words emitted, padding included.
    pub control_words: usize,
    /// Zero-count DELETE words emitted to drain large offsets.
    pub padding_words: usize,
    /// INSERT payload bytes.
    pub literal_bytes: usize,
    /// Bytes removed by DELETE words.
    pub deleted_bytes: usize,
}

impl EncodeStats {
    /// Size of the encoded stream these counters describe.
    pub fn encoded_len(&self) -> usize {
        self.control_words * WORD_LEN + self.literal_bytes
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Incremental delta encoder.
///
/// Feed spans in document order with [`keep`](Self::keep),
/// [`insert`](Self::insert), [`delete`](Self::delete) or
/// [`push`](Self::push), then take the stream with
/// [`finish`](Self::finish). Each value encodes one document pair; nothing
/// is shared between encoders.
#[derive(Debug, Default)]
pub struct DeltaEncoder {
    out: Vec<u8>,
    /// Unchanged bytes since the end of the last emitted operation.
    offset: usize,
    stats: EncodeStats,
}

impl DeltaEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder whose output buffer is pre-sized.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Skip `len` unchanged bytes.
    #[inline]
    pub fn keep(&mut self, len: usize) {
        self.offset += len;
    }

    /// Insert `text` at the current position.
    pub fn insert(&mut self, text: &str) -> Result<(), EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::EmptySpan(Tag::Insert));
        }
        self.emit(Op::Insert, text.len(), Some(text.as_bytes()));
        self.stats.literal_bytes += text.len();
        Ok(())
    }

    /// Delete `len` bytes at the current position.
    pub fn delete(&mut self, len: usize) -> Result<(), EncodeError> {
        if len == 0 {
            return Err(EncodeError::EmptySpan(Tag::Delete));
        }
        self.emit(Op::Delete, len, None);
        self.stats.deleted_bytes += len;
        Ok(())
    }

    /// Dispatch one span.
    pub fn push(&mut self, span: Span<'_>) -> Result<(), EncodeError> {
        match span {
            Span::Keep(text) => {
                self.keep(text.len());
                Ok(())
            }
            Span::Insert(text) => self.insert(text),
            Span::Delete(len) => self.delete(len),
        }
    }

    /// Counters so far.
    #[inline]
    pub fn stats(&self) -> EncodeStats {
        self.stats
    }

    /// Bytes emitted so far.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.out.len()
    }

    /// Return the encoded stream. Trailing KEEP bytes need no word.
    pub fn finish(self) -> Vec<u8> {
        debug!(
            "encoded {} bytes: {} words ({} padding), {} literal, {} deleted",
            self.out.len(),
            self.stats.control_words,
            self.stats.padding_words,
            self.stats.literal_bytes,
            self.stats.deleted_bytes
        );
        self.out
    }

    // -----------------------------------------------------------------------
    // Internal: splitting and packing
    // -----------------------------------------------------------------------

    /// Emit one operation of `len` bytes, splitting on field overflow.
    /// `payload` is `Some` for INSERT and holds exactly `len` bytes.
    fn emit(&mut self, op: Op, len: usize, payload: Option<&[u8]>) {
        debug_assert!(len > 0);
        debug_assert!(payload.is_none_or(|p| p.len() == len));

        while self.offset > MAX_OFFSET {
            self.write_word(ControlWord::padding());
            self.stats.padding_words += 1;
            self.offset -= MAX_OFFSET;
        }

        let mut offset = self.offset as u8;
        let mut done = 0usize;
        while done < len {
            let count = (len - done).min(MAX_COUNT);
            self.write_word(ControlWord::from_fields(op, offset, count as u8));
            if let Some(bytes) = payload {
                self.out.extend_from_slice(&bytes[done..done + count]);
            }
            done += count;
            offset = 0;
        }

        self.offset = 0;
    }

    #[inline]
    fn write_word(&mut self, word: ControlWord) {
        trace!("{} offset={} count={}", word.op(), word.offset(), word.count());
        word.write_to(&mut self.out);
        self.stats.control_words += 1;
    }
}

/// Encode a complete span sequence.
///
/// An empty sequence, or one made only of KEEP spans, yields an empty
/// stream. No partial output is returned on error.
pub fn encode_spans<'a, I>(spans: I) -> Result<Vec<u8>, EncodeError>
where
    I: IntoIterator<Item = Span<'a>>,
{
    let mut encoder = DeltaEncoder::new();
    for span in spans {
        encoder.push(span)?;
    }
    Ok(encoder.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
