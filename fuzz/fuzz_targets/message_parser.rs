//! Fuzz target for the ingestion pipeline
//!
//! Feeds arbitrary input through parse, classify and dispatch and checks
//! that nothing panics and that every line is kept in the history.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        if input.len() > 8191 {
            return;
        }

        // Parsing and classification should never panic
        if let Ok(message) = input.parse::<ircpipe::Message>() {
            let _ = ircpipe::classify(message);
        }

        // Neither should a full pipeline pass
        let mut pipeline = ircpipe::Pipeline::standard();
        let mut out = ircpipe::Capture::new();
        for line in input.split('\n') {
            let _ = pipeline.ingest(line, &mut out);
        }
        assert_eq!(pipeline.history().len(), input.split('\n').count());
    }
});
