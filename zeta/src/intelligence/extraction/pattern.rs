use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::{clean_phrase, split_clauses, FactExtractor};
use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::intelligence::utils::to_label;
use crate::models::{NewNode, NodeKind};

/// Label given to every causal edge node.
pub const CAUSAL_EDGE_LABEL: &str = "causes";

/// Fixed-label statement shapes, tried in order; the first match wins.
const LABELLED_PATTERNS: &[(&str, &str)] = &[
    ("age", r"(?i)^.*\bi\s*(?:am|'m)\s+\d+\s+years?\s+old\b.*$"),
    ("location", r"(?i)\bi\s+(?:live|reside)\s+in\s+(.+)$"),
    ("employer", r"(?i)\bi\s+work\s+(?:at|for)\s+(.+)$"),
    ("preference", r"(?i)\bi\s+(?:really\s+)?(?:like|love|prefer|enjoy)\s+(.+)$"),
];

/// "my <subject> is <value>"; the subject becomes the label.
const POSSESSIVE_PATTERN: &str =
    r"(?i)\bmy\s+([a-z][a-z0-9 _'\-]{0,48}?)\s+(?:is|are|was|were)\s+(.+)$";

/// "and my ...", "but I ...": a conjunction that starts a new statement.
/// Group 1 is where the next statement begins.
const CONJOINED_PATTERN: &str = r"(?i),?\s+(?:and|but)\s+((?:my|i)\s)";

/// Hard causal connectives. `because` puts the cause on the right.
const CAUSAL_PATTERN: &str = r"(?i)^(.+?)\s+(because|causes|caused|leads\s+to|led\s+to|results\s+in|resulted\s+in|triggers|triggered)\s+(.+)$";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static extraction pattern must compile")
}

fn labelled_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        LABELLED_PATTERNS
            .iter()
            .map(|(label, pattern)| (*label, compile(pattern)))
            .collect()
    })
}

fn possessive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile(POSSESSIVE_PATTERN))
}

fn conjoined_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile(CONJOINED_PATTERN))
}

/// Split a clause where a conjunction starts another first-person statement,
/// so "I live in Porto and my door code is 4412" yields two segments.
fn conjoined_segments(clause: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for caps in conjoined_pattern().captures_iter(clause) {
        let (Some(whole), Some(next)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        segments.push(&clause[start..whole.start()]);
        start = next.start();
    }
    segments.push(&clause[start..]);
    segments.retain(|segment| !segment.trim().is_empty());
    segments
}

fn causal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile(CAUSAL_PATTERN))
}

/// Deterministic verb and connective patterns over each clause.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    fact_salience: f32,
    edge_salience: f32,
    max_value_chars: usize,
}

impl PatternExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            fact_salience: config.fact_salience,
            edge_salience: config.edge_salience,
            max_value_chars: config.max_value_chars,
        }
    }

    fn extract_fact(&self, clause: &str) -> Option<NewNode> {
        for (label, pattern) in labelled_patterns() {
            if let Some(caps) = pattern.captures(clause) {
                // Whole-clause patterns keep the sentence as the value.
                let raw = caps.get(1).map_or(clause, |m| m.as_str());
                let value = clean_phrase(raw, self.max_value_chars);
                if !value.is_empty() {
                    return Some(NewNode::fact(*label, value, self.fact_salience));
                }
            }
        }

        let caps = possessive_pattern().captures(clause)?;
        let label = to_label(&caps[1]);
        let value = clean_phrase(&caps[2], self.max_value_chars);
        if label.is_empty() || value.is_empty() {
            return None;
        }
        Some(NewNode::fact(label, value, self.fact_salience))
    }

    fn extract_edge(&self, clause: &str) -> Option<NewNode> {
        let caps = causal_pattern().captures(clause)?;
        let (left, connective, right) = (&caps[1], caps[2].to_lowercase(), &caps[3]);
        let (cause, effect) = if connective == "because" {
            (right, left)
        } else {
            (left, right)
        };
        causal_edge(cause, effect, self.edge_salience, self.max_value_chars)
    }
}

#[async_trait]
impl FactExtractor for PatternExtractor {
    fn name(&self) -> &'static str {
        "pattern"
    }

    async fn extract(&self, value: &str) -> Result<Vec<NewNode>> {
        let mut nodes = Vec::new();
        for clause in split_clauses(value) {
            if clause.ends_with('?') {
                continue;
            }
            if let Some(edge) = self.extract_edge(clause) {
                nodes.push(edge);
            }
            for segment in conjoined_segments(clause) {
                if let Some(fact) = self.extract_fact(segment) {
                    nodes.push(fact);
                }
            }
        }
        Ok(nodes)
    }
}

/// Build a `cause -> effect` edge node, or `None` when either side is empty.
pub(crate) fn causal_edge(
    cause: &str,
    effect: &str,
    salience: f32,
    max_value_chars: usize,
) -> Option<NewNode> {
    let side_budget = max_value_chars.saturating_sub(4) / 2;
    let cause = clean_phrase(cause, side_budget);
    let effect = clean_phrase(effect, side_budget);
    if cause.is_empty() || effect.is_empty() {
        return None;
    }
    Some(NewNode::new(
        NodeKind::CausalEdge,
        CAUSAL_EDGE_LABEL,
        format!("{cause} -> {effect}"),
        salience,
    ))
}
