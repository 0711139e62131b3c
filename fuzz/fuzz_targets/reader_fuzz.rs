#![no_main]
use libfuzzer_sys::fuzz_target;
use textdelta::reader;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must parse or fail cleanly, never panic.
    let mut consumed = 0usize;
    for inst in reader::instructions(data) {
        match inst {
            Ok(inst) => {
                assert_eq!(inst.position, consumed);
                consumed += inst.encoded_len();
            }
            Err(_) => return,
        }
    }
    assert_eq!(consumed, data.len());
    let _ = reader::summarize(data).unwrap();
});
