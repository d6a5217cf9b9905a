use crate::config::{GuardConfig, SurfacingConfig};
use crate::intelligence::domain::DomainClassifier;
use crate::intelligence::guard::CredentialGuard;
use crate::intelligence::relevance::RelevanceFilter;
use crate::intelligence::utils::is_storage_command;
use crate::models::{Node, SurfacedContext};

/// Selects stored facts to inject ahead of a generation prompt.
///
/// Each call is independent. Candidates are visited in the order given and
/// never re-sorted; the credential guard runs before relevance for every one.
#[derive(Debug, Clone)]
pub struct SurfacingOrchestrator {
    classifier: DomainClassifier,
    guard: CredentialGuard,
    relevance: RelevanceFilter,
    storage_prefix: String,
    max_facts: usize,
    max_context_chars: usize,
}

impl SurfacingOrchestrator {
    pub fn new(guard: &GuardConfig, surfacing: &SurfacingConfig, storage_prefix: &str) -> Self {
        Self {
            classifier: DomainClassifier::new(),
            guard: CredentialGuard::new(guard),
            relevance: RelevanceFilter::new(surfacing),
            storage_prefix: storage_prefix.to_string(),
            max_facts: surfacing.max_facts,
            max_context_chars: surfacing.max_context_chars,
        }
    }

    pub fn surface(&self, query: &str, candidates: &[Node]) -> SurfacedContext {
        // A storage command never retrieves in the same turn.
        if is_storage_command(query, &self.storage_prefix) {
            tracing::debug!("Storage command, skipping surfacing");
            return SurfacedContext::empty();
        }

        let query_domain = self.classifier.classify(query);
        let mut context = SurfacedContext {
            query_domain: Some(query_domain),
            ..SurfacedContext::empty()
        };
        let mut text_chars = 0usize;

        for node in candidates {
            if !self.guard.permits(node, query_domain) {
                context.blocked += 1;
                tracing::warn!(
                    label = %node.label,
                    node_id = %node.id,
                    query_domain = self.classifier.domain_name(query_domain),
                    "Blocked credential fact from non-credential query"
                );
                continue;
            }

            if !self.relevance.is_eligible(node, query_domain) {
                tracing::trace!(label = %node.label, "Fact not relevant to query domain");
                continue;
            }

            if context.facts.len() >= self.max_facts {
                tracing::debug!(max_facts = self.max_facts, "Surfacing fact limit reached");
                break;
            }

            let line = format_fact_line(node);
            let line_chars = line.chars().count();
            // Lines are never cut; a shorter fact later may still fit.
            if text_chars + line_chars > self.max_context_chars {
                tracing::debug!(
                    label = %node.label,
                    max_context_chars = self.max_context_chars,
                    "Fact does not fit the context budget"
                );
                continue;
            }

            text_chars += line_chars;
            context.text.push_str(&line);
            context.facts.push(node.clone());
        }

        tracing::debug!(
            query_domain = %query_domain,
            surfaced = context.facts.len(),
            blocked = context.blocked,
            candidates = candidates.len(),
            "Surfacing complete"
        );

        context
    }
}

impl Default for SurfacingOrchestrator {
    fn default() -> Self {
        Self::new(
            &GuardConfig::default(),
            &SurfacingConfig::default(),
            "remember:",
        )
    }
}

fn format_fact_line(node: &Node) -> String {
    format!("[memory] {}: {}\n", node.label, node.value.trim())
}
