#![no_main]
use libfuzzer_sys::fuzz_target;
use textdelta::{Op, reader};

fn apply(old: &[u8], delta: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut cursor = 0usize;
    for inst in reader::instructions(delta) {
        let inst = inst.unwrap();
        out.extend_from_slice(&old[cursor..cursor + inst.offset()]);
        cursor += inst.offset();
        match inst.op() {
            Op::Insert => out.extend_from_slice(inst.payload),
            Op::Delete => cursor += inst.count(),
        }
    }
    out.extend_from_slice(&old[cursor..]);
    out
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the split point between the two documents.
    let split = (data[0] as usize * (data.len() - 1)) / 255;
    let payload = &data[1..];
    let split = split.min(payload.len());
    let old = String::from_utf8_lossy(&payload[..split]);
    let new = String::from_utf8_lossy(&payload[split..]);

    let delta = textdelta::encode(&old, &new).unwrap();
    assert_eq!(apply(old.as_bytes(), &delta), new.as_bytes());
});
