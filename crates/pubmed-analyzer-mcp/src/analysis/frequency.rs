//! Keyword frequency counting and ranking.

use std::collections::{HashMap, HashSet};

use crate::config::CountingMode;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{ArticleRecord, KeywordCount};

use super::Tokenizer;

/// Keyword -> count for one scope.
pub type KeywordTally = HashMap<String, u64>;

/// Check that `top_n` is a positive integer.
pub fn validate_top_n(top_n: i64) -> AnalysisResult<usize> {
    if top_n <= 0 {
        return Err(AnalysisError::invalid("top_n", format!("must be positive, got {top_n}")));
    }
    usize::try_from(top_n).map_err(|_| AnalysisError::invalid("top_n", "too large"))
}

/// Count keyword candidates across `records`.
pub fn tally<'r>(
    tokenizer: &Tokenizer,
    records: impl IntoIterator<Item = &'r ArticleRecord>,
    mode: CountingMode,
) -> KeywordTally {
    let mut counts = KeywordTally::new();
    for record in records {
        match mode {
            CountingMode::Occurrences => {
                for keyword in tokenizer.candidates(record) {
                    *counts.entry(keyword).or_insert(0) += 1;
                }
            }
            CountingMode::Records => {
                let unique: HashSet<String> = tokenizer.candidates(record).collect();
                for keyword in unique {
                    *counts.entry(keyword).or_insert(0) += 1;
                }
            }
        }
    }
    counts
}

/// Top `top_n` keywords, count descending, ties broken by keyword ascending.
#[must_use]
pub fn rank(counts: &KeywordTally, top_n: usize) -> Vec<KeywordCount> {
    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    entries.sort_unstable_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries.into_iter().take(top_n).map(|(k, c)| KeywordCount::new(k.clone(), *c)).collect()
}

/// Add every count of `other` into `into`.
pub fn merge(into: &mut KeywordTally, other: &KeywordTally) {
    for (keyword, count) in other {
        *into.entry(keyword.clone()).or_insert(0) += count;
    }
}
