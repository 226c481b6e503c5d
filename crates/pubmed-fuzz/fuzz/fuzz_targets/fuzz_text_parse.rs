#![no_main]

use libfuzzer_sys::fuzz_target;
use pubmed_analyzer_mcp::store::text;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = text::parse("fuzz.txt", content);
    }
});
