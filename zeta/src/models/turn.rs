use serde::{Deserialize, Serialize};

use super::{DomainTag, Node};

/// Outcome of one storage command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub facts_created: usize,
    /// Persisted representations of every node created, in creation order.
    pub nodes: Vec<Node>,
    /// True when the raw-statement fallback produced the only node.
    pub used_fallback: bool,
}

impl ExtractionResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Facts chosen for injection ahead of a generation prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfacedContext {
    /// `None` when the query was a storage command and classification was skipped.
    pub query_domain: Option<DomainTag>,
    pub facts: Vec<Node>,
    pub text: String,
    /// Candidates dropped at the credential boundary.
    pub blocked: usize,
}

impl SurfacedContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Numeric contradictions between a prompt and stored facts.
///
/// An empty `warning` means no conflict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub count: usize,
    pub warning: String,
}

impl ConflictReport {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has_conflicts(&self) -> bool {
        self.count > 0
    }
}

/// What `handle_turn` did with an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnOutcome {
    Stored(ExtractionResult),
    Surfaced(SurfacedContext),
}

/// Prompt ready for the generation boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AugmentedPrompt {
    pub text: String,
    pub surfaced: SurfacedContext,
    pub conflicts: ConflictReport,
}

impl std::fmt::Display for AugmentedPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_results() {
        assert_eq!(ExtractionResult::empty().facts_created, 0);
        assert!(SurfacedContext::empty().is_empty());
        assert!(!ConflictReport::none().has_conflicts());
        assert!(ConflictReport::none().warning.is_empty());
    }

    #[test]
    fn test_turn_outcome_tagged_serialization() {
        let outcome = TurnOutcome::Stored(ExtractionResult::empty());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "stored");
        assert_eq!(json["facts_created"], 0);
    }
}
