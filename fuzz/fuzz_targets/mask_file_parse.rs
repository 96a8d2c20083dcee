#![no_main]

// Parses arbitrary text as a mask file. Parsing must never panic, and a parsed
// record written back out must parse to the same record.

use libfuzzer_sys::fuzz_target;
use pixel_mask_transform_file_formats_api::mask_file::{format_mask_text, parse_mask_text};

fuzz_target!(|text: &str| {
    let Ok(record) = parse_mask_text(text) else {
        return;
    };

    let reparsed = parse_mask_text(&format_mask_text(&record)).unwrap();
    assert_eq!(reparsed, record);
});
