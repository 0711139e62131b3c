// Edit-script source: character-level diff between two documents.
//
// The encoder only needs an ordered span list; this module supplies one
// with a Myers middle-snake bisection over Unicode scalar values:
//
//   1. strip the common prefix and suffix
//   2. shortcut when one side is empty, or the shorter side occurs whole
//      inside the longer one, or the shorter side is a single character
//   3. otherwise find the middle snake and recurse on both halves
//
// A cleanup pass then merges every run of edits between two equalities into
// at most one DELETE followed by one INSERT, factoring out any common
// prefix or suffix the merge exposes. Spans borrow from the input strings,
// so span lengths are exact byte lengths.

use std::time::{Duration, Instant};

use log::debug;

use crate::span::Span;

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can turn two documents into an edit script.
///
/// Implementations must return spans in document order such that KEEP +
/// DELETE rebuild `old`, KEEP + INSERT rebuild `new`, and no INSERT or
/// DELETE is empty.
pub trait EditScriptSource {
    fn edit_script<'a>(&self, old: &'a str, new: &'a str) -> Vec<Span<'a>>;
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for [`MyersDiff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Give up refining after this long and report the remaining region as
    /// one DELETE + one INSERT. `None` never gives up, which keeps output
    /// deterministic.
    pub timeout: Option<Duration>,
}

// ---------------------------------------------------------------------------
// Myers diff
// ---------------------------------------------------------------------------

/// Default [`EditScriptSource`].
#[derive(Debug, Clone, Default)]
pub struct MyersDiff {
    options: DiffOptions,
}

impl MyersDiff {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }
}

impl EditScriptSource for MyersDiff {
    fn edit_script<'a>(&self, old: &'a str, new: &'a str) -> Vec<Span<'a>> {
        if old == new {
            return if old.is_empty() {
                Vec::new()
            } else {
                vec![Span::Keep(old)]
            };
        }

        let a = Text::new(old);
        let b = Text::new(new);

        let mut bisector = Bisector {
            deadline: self.options.timeout.map(|t| Instant::now() + t),
            timed_out: false,
            edits: Vec::new(),
        };
        bisector.diff(&a.chars, &b.chars);

        let edits = cleanup(&bisector.edits, &a.chars, &b.chars);
        let spans = to_spans(&edits, &a, &b);
        debug!(
            "diff: {} -> {} chars, {} spans{}",
            a.chars.len(),
            b.chars.len(),
            spans.len(),
            if bisector.timed_out {
                " (deadline hit)"
            } else {
                ""
            }
        );
        spans
    }
}

// ---------------------------------------------------------------------------
// Internal: character view of a document
// ---------------------------------------------------------------------------

struct Text<'a> {
    src: &'a str,
    chars: Vec<char>,
    /// `bounds[k]` is the byte offset of char `k`; the last entry is `src.len()`.
    bounds: Vec<usize>,
}

impl<'a> Text<'a> {
    fn new(src: &'a str) -> Self {
        let mut chars = Vec::with_capacity(src.len());
        let mut bounds = Vec::with_capacity(src.len() + 1);
        for (at, c) in src.char_indices() {
            chars.push(c);
            bounds.push(at);
        }
        bounds.push(src.len());
        Self { src, chars, bounds }
    }

    /// Byte range of chars `from..from + n`.
    #[inline]
    fn slice(&self, from: usize, n: usize) -> &'a str {
        &self.src[self.bounds[from]..self.bounds[from + n]]
    }
}

// ---------------------------------------------------------------------------
// Internal: edits in char units
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Equal(usize),
    Delete(usize),
    Insert(usize),
}

impl Edit {
    #[inline]
    fn len(self) -> usize {
        match self {
            Edit::Equal(n) | Edit::Delete(n) | Edit::Insert(n) => n,
        }
    }
}

/// Append `edit`, merging with the previous edit of the same kind.
fn push_edit(edits: &mut Vec<Edit>, edit: Edit) {
    if edit.len() == 0 {
        return;
    }
    if let Some(last) = edits.last_mut() {
        match (last, edit) {
            (Edit::Equal(n), Edit::Equal(m))
            | (Edit::Delete(n), Edit::Delete(m))
            | (Edit::Insert(n), Edit::Insert(m)) => {
                *n += m;
                return;
            }
            _ => {}
        }
    }
    edits.push(edit);
}

fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ---------------------------------------------------------------------------
// Internal: bisection
// ---------------------------------------------------------------------------

struct Bisector {
    deadline: Option<Instant>,
    timed_out: bool,
    edits: Vec<Edit>,
}

impl Bisector {
    fn expired(&mut self) -> bool {
        if !self.timed_out && self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.timed_out = true;
        }
        self.timed_out
    }

    fn diff(&mut self, a: &[char], b: &[char]) {
        if a == b {
            push_edit(&mut self.edits, Edit::Equal(a.len()));
            return;
        }

        let prefix = common_prefix(a, b);
        let (a, b) = (&a[prefix..], &b[prefix..]);
        let suffix = common_suffix(a, b);
        let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

        push_edit(&mut self.edits, Edit::Equal(prefix));
        self.compute(a, b);
        push_edit(&mut self.edits, Edit::Equal(suffix));
    }

    /// Diff two slices that share no common prefix or suffix.
    fn compute(&mut self, a: &[char], b: &[char]) {
        if a.is_empty() {
            push_edit(&mut self.edits, Edit::Insert(b.len()));
            return;
        }
        if b.is_empty() {
            push_edit(&mut self.edits, Edit::Delete(a.len()));
            return;
        }

        let old_longer = a.len() > b.len();
        let (long, short) = if old_longer { (a, b) } else { (b, a) };
        if let Some(at) = find(long, short) {
            let edit = |n| {
                if old_longer {
                    Edit::Delete(n)
                } else {
                    Edit::Insert(n)
                }
            };
            push_edit(&mut self.edits, edit(at));
            push_edit(&mut self.edits, Edit::Equal(short.len()));
            push_edit(&mut self.edits, edit(long.len() - at - short.len()));
            return;
        }

        // A single char that does not occur in the other side shares nothing.
        if short.len() == 1 || self.expired() {
            self.replace(a, b);
            return;
        }

        self.bisect(a, b);
    }

    fn replace(&mut self, a: &[char], b: &[char]) {
        push_edit(&mut self.edits, Edit::Delete(a.len()));
        push_edit(&mut self.edits, Edit::Insert(b.len()));
    }

    /// Find the middle snake of the shortest edit path and split there.
    fn bisect(&mut self, a: &[char], b: &[char]) {
        let n = a.len() as isize;
        let m = b.len() as isize;
        let max_d = (n + m + 1) / 2;
        let v_offset = max_d;
        let v_len = (2 * max_d + 2) as usize;
        let mut v1 = vec![-1isize; v_len];
        let mut v2 = vec![-1isize; v_len];
        v1[(v_offset + 1) as usize] = 0;
        v2[(v_offset + 1) as usize] = 0;

        let delta = n - m;
        // With an odd delta the forward path is checked for overlap.
        let front = delta % 2 != 0;
        let mut k1start = 0isize;
        let mut k1end = 0isize;
        let mut k2start = 0isize;
        let mut k2end = 0isize;

        for d in 0..max_d {
            if self.expired() {
                break;
            }

            // Forward path.
            let mut k1 = -d + k1start;
            while k1 <= d - k1end {
                let k1_off = (v_offset + k1) as usize;
                let mut x1 = if k1 == -d || (k1 != d && v1[k1_off - 1] < v1[k1_off + 1]) {
                    v1[k1_off + 1]
                } else {
                    v1[k1_off - 1] + 1
                };
                let mut y1 = x1 - k1;
                while x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                    x1 += 1;
                    y1 += 1;
                }
                v1[k1_off] = x1;
                if x1 > n {
                    k1end += 2;
                } else if y1 > m {
                    k1start += 2;
                } else if front {
                    let k2_off = v_offset + delta - k1;
                    if (0..v_len as isize).contains(&k2_off) && v2[k2_off as usize] != -1 {
                        let x2 = n - v2[k2_off as usize];
                        if x1 >= x2 {
                            self.split(a, b, x1, y1);
                            return;
                        }
                    }
                }
                k1 += 2;
            }

            // Reverse path.
            let mut k2 = -d + k2start;
            while k2 <= d - k2end {
                let k2_off = (v_offset + k2) as usize;
                let mut x2 = if k2 == -d || (k2 != d && v2[k2_off - 1] < v2[k2_off + 1]) {
                    v2[k2_off + 1]
                } else {
                    v2[k2_off - 1] + 1
                };
                let mut y2 = x2 - k2;
                while x2 < n && y2 < m && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize] {
                    x2 += 1;
                    y2 += 1;
                }
                v2[k2_off] = x2;
                if x2 > n {
                    k2end += 2;
                } else if y2 > m {
                    k2start += 2;
                } else if !front {
                    let k1_off = v_offset + delta - k2;
                    if (0..v_len as isize).contains(&k1_off) && v1[k1_off as usize] != -1 {
                        let x1 = v1[k1_off as usize];
                        let y1 = v_offset + x1 - k1_off;
                        if x1 >= n - x2 {
                            self.split(a, b, x1, y1);
                            return;
                        }
                    }
                }
                k2 += 2;
            }
        }

        // Deadline hit, or no snake: nothing in common worth keeping.
        self.replace(a, b);
    }

    fn split(&mut self, a: &[char], b: &[char], x: isize, y: isize) {
        let x = x.clamp(0, a.len() as isize) as usize;
        let y = y.clamp(0, b.len() as isize) as usize;
        // A split at either corner would recurse on the same input.
        if (x == 0 && y == 0) || (x == a.len() && y == b.len()) {
            self.replace(a, b);
            return;
        }
        self.diff(&a[..x], &b[..y]);
        self.diff(&a[x..], &b[y..]);
    }
}

// ---------------------------------------------------------------------------
// Internal: cleanup
// ---------------------------------------------------------------------------

/// Reorder each run of edits between equalities into DELETE then INSERT,
/// moving any common prefix or suffix of the pair into the equalities.
fn cleanup(edits: &[Edit], a: &[char], b: &[char]) -> Vec<Edit> {
    let mut out = Vec::with_capacity(edits.len());
    let mut i = 0usize;
    let mut j = 0usize;
    let mut del = 0usize;
    let mut ins = 0usize;

    let flush = |out: &mut Vec<Edit>, i: &mut usize, j: &mut usize, del: &mut usize, ins: &mut usize| {
        let old_run = &a[*i..*i + *del];
        let new_run = &b[*j..*j + *ins];
        let prefix = common_prefix(old_run, new_run);
        let suffix = common_suffix(&old_run[prefix..], &new_run[prefix..]);
        push_edit(out, Edit::Equal(prefix));
        push_edit(out, Edit::Delete(*del - prefix - suffix));
        push_edit(out, Edit::Insert(*ins - prefix - suffix));
        push_edit(out, Edit::Equal(suffix));
        *i += *del;
        *j += *ins;
        *del = 0;
        *ins = 0;
    };

    for &edit in edits {
        match edit {
            Edit::Delete(n) => del += n,
            Edit::Insert(n) => ins += n,
            Edit::Equal(n) => {
                flush(&mut out, &mut i, &mut j, &mut del, &mut ins);
                push_edit(&mut out, Edit::Equal(n));
                i += n;
                j += n;
            }
        }
    }
    flush(&mut out, &mut i, &mut j, &mut del, &mut ins);
    out
}

fn to_spans<'a>(edits: &[Edit], a: &Text<'a>, b: &Text<'a>) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(edits.len());
    let mut i = 0usize;
    let mut j = 0usize;
    for &edit in edits {
        match edit {
            Edit::Equal(n) => {
                spans.push(Span::Keep(a.slice(i, n)));
                i += n;
                j += n;
            }
            Edit::Delete(n) => {
                spans.push(Span::Delete(a.slice(i, n).len()));
                i += n;
            }
            Edit::Insert(n) => {
                spans.push(Span::Insert(b.slice(j, n)));
                j += n;
            }
        }
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::validate;

    fn script<'a>(old: &'a str, new: &'a str) -> Vec<Span<'a>> {
        let spans = MyersDiff::default().edit_script(old, new);
        validate(old, new, &spans).unwrap();
        spans
    }

    #[test]
    fn identical_documents() {
        assert!(script("", "").is_empty());
        assert_eq!(script("same", "same"), vec![Span::Keep("same")]);
    }

    #[test]
    fn empty_sides() {
        assert_eq!(script("", "abc"), vec![Span::Insert("abc")]);
        assert_eq!(script("abc", ""), vec![Span::Delete(3)]);
    }

    #[test]
    fn single_insert() {
        assert_eq!(
            script("Hello world!", "Hello big world!"),
            vec![
                Span::Keep("Hello "),
                Span::Insert("big "),
                Span::Keep("world!")
            ]
        );
    }

    #[test]
    fn deletes_around_kept_text() {
        assert_eq!(
            script("Hello world!", "Hell world"),
            vec![
                Span::Keep("Hell"),
                Span::Delete(1),
                Span::Keep(" world"),
                Span::Delete(1)
            ]
        );
    }

    #[test]
    fn containment_shortcut() {
        assert_eq!(
            script("xxabcyy", "abc"),
            vec![Span::Delete(2), Span::Keep("abc"), Span::Delete(2)]
        );
    }

    #[test]
    fn replacement_is_delete_then_insert() {
        assert_eq!(
            script("cat", "dog"),
            vec![Span::Delete(3), Span::Insert("dog")]
        );
    }

    #[test]
    fn multi_byte_spans_stay_on_char_boundaries() {
        let spans = script("Hello world!", "Hello 繁 world!");
        assert_eq!(
            spans,
            vec![
                Span::Keep("Hello "),
                Span::Insert("繁 "),
                Span::Keep("world!")
            ]
        );
        let spans = script("a繁b", "ab");
        assert_eq!(spans, vec![Span::Keep("a"), Span::Delete(3), Span::Keep("b")]);
    }

    #[test]
    fn interleaved_changes_validate() {
        let old = "this is some test. blah blah blah";
        let new = "this is other text. blah blah blah";
        let spans = script(old, new);
        for pair in spans.windows(2) {
            assert_ne!(pair[0].tag(), pair[1].tag());
        }
        assert!(spans.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn zero_timeout_still_produces_valid_script() {
        let diff = MyersDiff::new(DiffOptions {
            timeout: Some(Duration::ZERO),
        });
        let old = "the quick brown fox jumps over the lazy dog";
        let new = "the quack brawn fix jumped over a lazy cat";
        let spans = diff.edit_script(old, new);
        validate(old, new, &spans).unwrap();
    }

    #[test]
    fn cleanup_merges_interleaved_edits() {
        let a: Vec<char> = "xaby".chars().collect();
        let b: Vec<char> = "xcdy".chars().collect();
        let edits = [
            Edit::Equal(1),
            Edit::Delete(1),
            Edit::Insert(1),
            Edit::Delete(1),
            Edit::Insert(1),
            Edit::Equal(1),
        ];
        assert_eq!(
            cleanup(&edits, &a, &b),
            vec![
                Edit::Equal(1),
                Edit::Delete(2),
                Edit::Insert(2),
                Edit::Equal(1)
            ]
        );
    }

    #[test]
    fn cleanup_factors_common_affixes() {
        let a: Vec<char> = "abc".chars().collect();
        let b: Vec<char> = "abd".chars().collect();
        assert_eq!(
            cleanup(&[Edit::Delete(3), Edit::Insert(3)], &a, &b),
            vec![Edit::Equal(2), Edit::Delete(1), Edit::Insert(1)]
        );
    }
}
