//! Fact extraction for storage commands.
//!
//! Extraction is composed from [`FactExtractor`] strategies: the pattern
//! extractor always runs, the semantic edge extractor runs when an embedding
//! capability is available, and the fallback only runs when both produced
//! nothing.

mod fallback;
mod pattern;
mod pipeline;
mod semantic;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::NewNode;

pub use fallback::FallbackExtractor;
pub use pattern::PatternExtractor;
pub use pipeline::ExtractionPipeline;
pub use semantic::SemanticEdgeExtractor;

/// One way of turning a remembered statement into nodes.
///
/// Extractors only propose nodes; persistence belongs to the pipeline.
#[async_trait]
pub trait FactExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract(&self, value: &str) -> Result<Vec<NewNode>>;
}

/// Sentence-ish clauses of `text`, trimmed and non-empty. A period only ends
/// a clause when followed by whitespace, so "3.5" stays whole.
pub(crate) fn split_clauses(text: &str) -> Vec<&str> {
    text.split([';', '!', '\n'])
        .flat_map(|part| part.split(". "))
        .map(|clause| clause.trim().trim_end_matches('.').trim_end())
        .filter(|clause| !clause.is_empty())
        .collect()
}

/// Clean a captured phrase: trim whitespace, trailing punctuation and
/// surrounding quotes, then bound its length.
pub(crate) fn clean_phrase(raw: &str, max_chars: usize) -> String {
    let trimmed = raw
        .trim()
        .trim_end_matches(|c: char| matches!(c, ',' | '.' | '!' | ';' | ':'))
        .trim_matches(|c: char| c == '"' || c == '\'')
        .trim();
    crate::intelligence::utils::truncate_graphemes(trimmed, max_chars)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_clauses() {
        assert_eq!(
            split_clauses("My name is Dana. I live in Porto;  \n"),
            vec!["My name is Dana", "I live in Porto"]
        );
        assert!(split_clauses(" . ; ").is_empty());
        assert_eq!(split_clauses("I am 5.5 feet tall."), vec!["I am 5.5 feet tall"]);
    }

    #[test]
    fn test_clean_phrase() {
        assert_eq!(clean_phrase("  \"blue\", ", 50), "blue");
        assert_eq!(clean_phrase("abcdef", 3), "abc");
    }
}
