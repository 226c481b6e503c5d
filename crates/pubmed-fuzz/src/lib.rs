//! Fuzzing library for pubmed-analyzer-mcp.
//!
//! This crate provides fuzzing targets for the parsers that read untrusted
//! input: efetch XML, saved text result files and tool arguments.
//!
//! # Usage
//!
//! ```bash
//! cd crates/pubmed-fuzz
//! cargo +nightly fuzz run fuzz_xml_parse -- -max_total_time=60
//! ```

pub use pubmed_analyzer_mcp::models;
pub use pubmed_analyzer_mcp::client::parse_pubmed_xml;
pub use pubmed_analyzer_mcp::store::text;
