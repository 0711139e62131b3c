// Reference decoder shared by the integration tests.
//
// Streams the old document forward: each word first copies OFFSET
// unchanged bytes, then either appends the INSERT payload or skips COUNT
// deleted bytes. A zero-count DELETE therefore only copies.

#![allow(dead_code)]

use textdelta::Op;
use textdelta::reader;

pub fn apply(old: &str, delta: &[u8]) -> Result<String, String> {
    let old = old.as_bytes();
    let mut out = Vec::with_capacity(old.len() + delta.len());
    let mut cursor = 0usize;

    for inst in reader::instructions(delta) {
        let inst = inst.map_err(|e| e.to_string())?;
        let end = cursor + inst.offset();
        let kept = old
            .get(cursor..end)
            .ok_or_else(|| format!("offset past end of old document at {}", inst.position))?;
        out.extend_from_slice(kept);
        cursor = end;

        match inst.op() {
            Op::Insert => out.extend_from_slice(inst.payload),
            Op::Delete => {
                cursor += inst.count();
                if cursor > old.len() {
                    return Err(format!("delete past end of old document at {}", inst.position));
                }
            }
        }
    }

    out.extend_from_slice(&old[cursor..]);
    String::from_utf8(out).map_err(|e| e.to_string())
}

/// Encode `old -> new`, check it decodes back, and return the delta.
pub fn roundtrip(old: &str, new: &str) -> Vec<u8> {
    let delta = textdelta::encode(old, new).expect("encode failed");
    let decoded = apply(old, &delta).expect("decode failed");
    assert_eq!(
        decoded,
        new,
        "roundtrip mismatch (old={}, new={}, delta={})",
        old.len(),
        new.len(),
        delta.len()
    );
    delta
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
