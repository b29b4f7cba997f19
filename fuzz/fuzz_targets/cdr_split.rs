#![no_main]

use ck_core::CdrXmlSplitter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64_000 {
        return;
    }

    let mut splitter = match CdrXmlSplitter::open(data) {
        Ok(splitter) => splitter,
        Err(_) => return,
    };

    let mut batches = 0_u64;
    while splitter.next_batch().is_some() {
        batches += 1;
    }
    assert_eq!(batches, splitter.processed_count());
    assert!(splitter.next_batch().is_none());
});
