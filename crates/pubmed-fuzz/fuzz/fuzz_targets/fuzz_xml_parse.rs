#![no_main]

use libfuzzer_sys::fuzz_target;
use pubmed_analyzer_mcp::client::parse_pubmed_xml;

fuzz_target!(|data: &[u8]| {
    // Arbitrary efetch bodies must parse or fail, never panic
    if let Ok(xml) = std::str::from_utf8(data) {
        let _ = parse_pubmed_xml(xml);
    }
});
