#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Archive, metadata and binary decoding end to end
    if let Ok(model) = meshpart::Model::from_reader(Cursor::new(data)) {
        // Whatever decodes must encode again
        let _ = model.to_bytes();
        let _ = model.with_values_from(Cursor::new(data));
    }
});
