#![no_main]

use libfuzzer_sys::fuzz_target;
use pubmed_analyzer_mcp::models::{ComprehensiveAnalysisInput, DateRange, Granularity};

fuzz_target!(|data: &[u8]| {
    // Tool arguments go through serde, then through the same validation the tools run
    if let Ok(input) = serde_json::from_slice::<ComprehensiveAnalysisInput>(data) {
        let _ = Granularity::resolve(input.granularity.as_deref(), input.months_per_period);
        let _ = DateRange::parse(input.start_date.as_deref(), input.end_date.as_deref());
    }
});
