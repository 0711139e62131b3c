// Edit-script spans.
//
// An edit script is an ordered list of spans covering two documents. KEEP
// and DELETE spans walk the old document, KEEP and INSERT spans walk the new
// one. Lengths are UTF-8 byte lengths throughout.

use thiserror::Error;

/// Tag of a span, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Keep,
    Insert,
    Delete,
}

/// One run of an edit script.
///
/// `Keep` and `Insert` borrow their text. `Delete` only carries the byte
/// length of the removed run; the removed text lives in the old document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    Keep(&'a str),
    Insert(&'a str),
    Delete(usize),
}

impl Span<'_> {
    #[inline]
    pub fn tag(&self) -> Tag {
        match self {
            Span::Keep(_) => Tag::Keep,
            Span::Insert(_) => Tag::Insert,
            Span::Delete(_) => Tag::Delete,
        }
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Span::Keep(text) | Span::Insert(text) => text.len(),
            Span::Delete(len) => *len,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Ways an edit script can fail to describe a pair of documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("span {index}: zero-length {tag:?}")]
    EmptySpan { index: usize, tag: Tag },
    #[error("span {index}: kept text does not match old document at byte {at}")]
    KeepMismatchOld { index: usize, at: usize },
    #[error("span {index}: kept text does not match new document at byte {at}")]
    KeepMismatchNew { index: usize, at: usize },
    #[error("span {index}: inserted text does not match new document at byte {at}")]
    InsertMismatch { index: usize, at: usize },
    #[error("span {index}: delete of {len} bytes at byte {at} is out of bounds")]
    DeleteOutOfBounds { index: usize, at: usize, len: usize },
    #[error("span {index}: delete ends inside a character at byte {at}")]
    DeleteSplitsChar { index: usize, at: usize },
    #[error("script covers {covered} of {total} bytes of the old document")]
    OldNotCovered { covered: usize, total: usize },
    #[error("script covers {covered} of {total} bytes of the new document")]
    NewNotCovered { covered: usize, total: usize },
}

/// Check that `spans` rebuilds `old` from KEEP + DELETE and `new` from
/// KEEP + INSERT, with no zero-length INSERT or DELETE.
///
/// Zero-length KEEP spans are allowed and ignored.
pub fn validate(old: &str, new: &str, spans: &[Span<'_>]) -> Result<(), ScriptError> {
    let mut old_pos = 0usize;
    let mut new_pos = 0usize;

    for (index, span) in spans.iter().enumerate() {
        match *span {
            Span::Keep(text) => {
                if old.get(old_pos..old_pos + text.len()) != Some(text) {
                    return Err(ScriptError::KeepMismatchOld { index, at: old_pos });
                }
                if new.get(new_pos..new_pos + text.len()) != Some(text) {
                    return Err(ScriptError::KeepMismatchNew { index, at: new_pos });
                }
                old_pos += text.len();
                new_pos += text.len();
            }
            Span::Insert(text) => {
                if text.is_empty() {
                    return Err(ScriptError::EmptySpan {
                        index,
                        tag: Tag::Insert,
                    });
                }
                if new.get(new_pos..new_pos + text.len()) != Some(text) {
                    return Err(ScriptError::InsertMismatch { index, at: new_pos });
                }
                new_pos += text.len();
            }
            Span::Delete(len) => {
                if len == 0 {
                    return Err(ScriptError::EmptySpan {
                        index,
                        tag: Tag::Delete,
                    });
                }
                let end = old_pos
                    .checked_add(len)
                    .filter(|&end| end <= old.len())
                    .ok_or(ScriptError::DeleteOutOfBounds {
                        index,
                        at: old_pos,
                        len,
                    })?;
                if !old.is_char_boundary(end) {
                    return Err(ScriptError::DeleteSplitsChar { index, at: end });
                }
                old_pos = end;
            }
        }
    }

    if old_pos != old.len() {
        return Err(ScriptError::OldNotCovered {
            covered: old_pos,
            total: old.len(),
        });
    }
    if new_pos != new.len() {
        return Err(ScriptError::NewNotCovered {
            covered: new_pos,
            total: new.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_lengths_are_bytes() {
        assert_eq!(Span::Insert("繁").len(), 3);
        assert_eq!(Span::Keep("abc").len(), 3);
        assert_eq!(Span::Delete(7).len(), 7);
        assert!(Span::Keep("").is_empty());
        assert_eq!(Span::Delete(1).tag(), Tag::Delete);
    }

    #[test]
    fn accepts_well_formed_script() {
        let spans = [
            Span::Keep("Hello "),
            Span::Insert("big "),
            Span::Keep("world"),
            Span::Delete(1),
        ];
        assert_eq!(validate("Hello world!", "Hello big world", &spans), Ok(()));
    }

    #[test]
    fn accepts_empty_script_for_empty_documents() {
        assert_eq!(validate("", "", &[]), Ok(()));
    }

    #[test]
    fn ignores_empty_keep() {
        let spans = [Span::Keep(""), Span::Insert("x")];
        assert_eq!(validate("", "x", &spans), Ok(()));
    }

    #[test]
    fn rejects_empty_insert_and_delete() {
        let err = validate("a", "a", &[Span::Keep("a"), Span::Insert("")]).unwrap_err();
        assert_eq!(
            err,
            ScriptError::EmptySpan {
                index: 1,
                tag: Tag::Insert
            }
        );
        let err = validate("a", "a", &[Span::Delete(0), Span::Keep("a")]).unwrap_err();
        assert_eq!(
            err,
            ScriptError::EmptySpan {
                index: 0,
                tag: Tag::Delete
            }
        );
    }

    #[test]
    fn rejects_keep_that_differs() {
        let err = validate("abc", "abc", &[Span::Keep("abd")]).unwrap_err();
        assert_eq!(err, ScriptError::KeepMismatchOld { index: 0, at: 0 });
    }

    #[test]
    fn rejects_delete_past_end() {
        let err = validate("ab", "", &[Span::Delete(3)]).unwrap_err();
        assert_eq!(
            err,
            ScriptError::DeleteOutOfBounds {
                index: 0,
                at: 0,
                len: 3
            }
        );
    }

    #[test]
    fn rejects_delete_inside_character() {
        let err = validate("繁x", "x", &[Span::Delete(1)]).unwrap_err();
        assert_eq!(err, ScriptError::DeleteSplitsChar { index: 0, at: 1 });
    }

    #[test]
    fn rejects_partial_coverage() {
        let err = validate("abc", "ab", &[Span::Keep("ab")]).unwrap_err();
        assert_eq!(
            err,
            ScriptError::OldNotCovered {
                covered: 2,
                total: 3
            }
        );
        let err = validate("ab", "abc", &[Span::Keep("ab")]).unwrap_err();
        assert_eq!(
            err,
            ScriptError::NewNotCovered {
                covered: 2,
                total: 3
            }
        );
    }
}
