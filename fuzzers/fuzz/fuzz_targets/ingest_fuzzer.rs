#![no_main]
use devstream::StreamDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks a split point so chunking is exercised too.
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let mut decoder = StreamDecoder::new();
    let at = (split as usize).min(rest.len());
    if decoder.ingest(&rest[..at]).is_ok() {
        let _ = decoder.ingest(&rest[at..]);
    }
    let ids: Vec<u16> = decoder.store().device_ids().collect();
    for id in ids {
        for message in decoder.drain(id) {
            assert_eq!(message.device_id(), id);
        }
    }
    assert!(decoder.buffered_len() < 5 + 1 + 255 + 1);
});
