use async_trait::async_trait;

use super::FactExtractor;
use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::intelligence::utils::{normalize_words, truncate_graphemes};
use crate::models::{NewNode, NodeKind};

pub const FALLBACK_LABEL: &str = "statement";

/// Stores the cleaned statement itself when nothing structured was found.
#[derive(Debug, Clone)]
pub struct FallbackExtractor {
    question_words: Vec<String>,
    min_len: usize,
    min_clean_len: usize,
    max_value_chars: usize,
    salience: f32,
}

impl FallbackExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            question_words: config
                .question_words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            min_len: config.fallback_min_len,
            min_clean_len: config.fallback_min_clean_len,
            max_value_chars: config.max_value_chars,
            salience: config.fallback_salience,
        }
    }

    /// Questions are not facts: any `?`, or a first word that is a question
    /// word. "Howard" and "whenever" are not "how" and "when".
    pub fn is_interrogative(&self, value: &str) -> bool {
        if value.contains('?') {
            return true;
        }
        normalize_words(value)
            .first()
            .is_some_and(|first| self.question_words.iter().any(|word| word == first))
    }
}

#[async_trait]
impl FactExtractor for FallbackExtractor {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn extract(&self, value: &str) -> Result<Vec<NewNode>> {
        if value.chars().count() <= self.min_len {
            tracing::debug!(min_len = self.min_len, "Statement too short for fallback");
            return Ok(Vec::new());
        }

        if self.is_interrogative(value) {
            tracing::debug!("Statement is a question, not storing");
            return Ok(Vec::new());
        }

        let cleaned = truncate_graphemes(value.trim(), self.max_value_chars).trim_end();
        if cleaned.chars().count() <= self.min_clean_len {
            return Ok(Vec::new());
        }

        Ok(vec![NewNode::new(
            NodeKind::Raw,
            FALLBACK_LABEL,
            cleaned,
            self.salience,
        )])
    }
}
