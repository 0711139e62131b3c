//! Textdelta: compact binary deltas between two text documents.
//!
//! The crate provides:
//! - A delta encoder turning edit-script spans into 16-bit control words
//!   (`encoder`, `control`)
//! - A character-level Myers diff producing those spans (`diff`)
//! - Edit-script validation (`span`)
//! - A stream reader for inspecting encoded deltas (`reader`)
//!
//! All offsets and counts in the encoded stream are UTF-8 byte lengths.
//!
//! # Quick Start
//!
//! ```
//! use textdelta::control::{ControlWord, Op};
//!
//! let delta = textdelta::encode("Hello world!", "Hello big world!").unwrap();
//! assert_eq!(delta.len(), 6);
//! assert_eq!(
//!     ControlWord::from_be_bytes([delta[0], delta[1]]),
//!     ControlWord::new(Op::Insert, 6, 4).unwrap()
//! );
//! assert_eq!(&delta[2..], b"big ");
//! ```

pub mod control;
pub mod diff;
pub mod encoder;
pub mod reader;
pub mod span;

pub use control::{ControlWord, Op};
pub use diff::{DiffOptions, EditScriptSource, MyersDiff};
pub use encoder::{DeltaEncoder, EncodeError, EncodeStats, encode_spans};
pub use reader::{FormatError, Instruction, InstructionIterator};
pub use span::{ScriptError, Span, Tag};

// ---------------------------------------------------------------------------
// Encode options
// ---------------------------------------------------------------------------

/// Configuration for [`encode_with_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Options for the default diff.
    pub diff: DiffOptions,
    /// Check the edit script against both documents before encoding.
    pub validate: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            diff: DiffOptions::default(),
            validate: true,
        }
    }
}

// ---------------------------------------------------------------------------
// High-level encode
// ---------------------------------------------------------------------------

/// Encode the delta from `old` to `new`.
///
/// Identical documents produce an empty delta.
pub fn encode(old: &str, new: &str) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(old, new, &EncodeOptions::default())
}

/// Encode with custom options, using [`MyersDiff`].
pub fn encode_with_options(
    old: &str,
    new: &str,
    opts: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let source = MyersDiff::new(opts.diff.clone());
    encode_with_source(old, new, &source, opts)
}

/// Encode using any edit-script source.
///
/// `opts.diff` is ignored here; `source` carries its own configuration.
pub fn encode_with_source<S>(
    old: &str,
    new: &str,
    source: &S,
    opts: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError>
where
    S: EditScriptSource + ?Sized,
{
    let spans = source.edit_script(old, new);
    if opts.validate {
        span::validate(old, new, &spans)?;
    }
    encode_spans(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
