use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{ConflictConfig, GuardConfig};
use crate::db::FactStore;
use crate::intelligence::domain::DomainClassifier;
use crate::intelligence::guard::CredentialGuard;
use crate::intelligence::utils::{expand_contractions, normalize_words, truncate_graphemes};
use crate::models::{ConflictReport, Node, NodeKind};

/// Words that carry no subject information around a number.
const FILLER_WORDS: &[&str] = &[
    "actually", "really", "now", "just", "currently", "well", "so", "um", "and", "but", "still",
    "only", "about", "around", "roughly", "nearly", "almost", "the", "a", "an",
];

const LEAD_WORDS: usize = 3;
const EXCERPT_CHARS: usize = 60;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b\d+(?:\.\d+)?\b").expect("static number pattern must compile")
    })
}

/// A number together with the words that say what it measures.
#[derive(Debug, Clone, PartialEq)]
struct NumericClaim {
    raw: String,
    value: f64,
    /// Up to three significant words before the number, in order.
    lead: Vec<String>,
    /// First significant word after the number, if any.
    unit: Option<String>,
}

impl NumericClaim {
    fn context_words(&self) -> impl Iterator<Item = &str> {
        self.lead.iter().chain(self.unit.iter()).map(String::as_str)
    }
}

fn is_filler(word: &str) -> bool {
    FILLER_WORDS.contains(&word)
}

fn numeric_claims(text: &str) -> Vec<NumericClaim> {
    // "I'm 25" and "I am 30" must share their lead words.
    let text = expand_contractions(text);
    let text = text.as_ref();
    number_pattern()
        .find_iter(text)
        .filter_map(|m| {
            let value = m.as_str().parse::<f64>().ok()?;
            let before: Vec<String> = normalize_words(&text[..m.start()])
                .into_iter()
                .filter(|w| !is_filler(w))
                .collect();
            let lead = before[before.len().saturating_sub(LEAD_WORDS)..].to_vec();
            let unit = normalize_words(&text[m.end()..])
                .into_iter()
                .find(|w| !is_filler(w))
                .filter(|w| w.chars().all(char::is_alphabetic));
            Some(NumericClaim {
                raw: m.as_str().to_string(),
                value,
                lead,
                unit,
            })
        })
        .collect()
}

/// Whether a stored claim and a prompt claim talk about the same quantity.
fn same_subject(node: &Node, stored: &NumericClaim, prompt: &NumericClaim) -> bool {
    // "2 kids" and "3 dogs" are different quantities.
    if let (Some(a), Some(b)) = (&stored.unit, &prompt.unit) {
        if a != b {
            return false;
        }
    }

    let tail = |lead: &[String]| lead[lead.len().saturating_sub(2)..].to_vec();
    let stored_tail = tail(&stored.lead);
    if !stored_tail.is_empty() && stored_tail == tail(&prompt.lead) {
        return true;
    }

    let label_words = normalize_words(&node.label);
    if !label_words.is_empty()
        && label_words
            .iter()
            .all(|lw| prompt.context_words().any(|w| w == lw.as_str()))
    {
        return true;
    }

    match (&stored.unit, &prompt.unit) {
        (Some(a), Some(b)) if a == b => stored.lead.iter().any(|w| prompt.lead.contains(w)),
        _ => false,
    }
}

/// Flags numbers in a prompt that disagree with numbers in stored facts
/// about the same subject.
#[derive(Debug, Clone)]
pub struct NumericConflictDetector {
    classifier: DomainClassifier,
    guard: CredentialGuard,
    max_warning_chars: usize,
}

impl NumericConflictDetector {
    pub fn new(conflict: &ConflictConfig, guard: &GuardConfig) -> Self {
        Self {
            classifier: DomainClassifier::new(),
            guard: CredentialGuard::new(guard),
            max_warning_chars: conflict.max_warning_chars,
        }
    }

    pub async fn check_conflicts(&self, store: &dyn FactStore, prompt: &str) -> ConflictReport {
        let prompt_claims = numeric_claims(prompt);
        if prompt_claims.is_empty() {
            return ConflictReport::none();
        }

        let candidates = match store.find_by_subject(prompt).await {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(error = %e, "Conflict lookup failed, assuming no conflicts");
                return ConflictReport::none();
            }
        };

        let prompt_domain = self.classifier.classify(prompt);
        let mut report = ConflictReport::none();
        let mut seen = HashSet::new();
        let mut full = false;

        for node in &candidates {
            // Edges describe causation, not quantities.
            if node.kind == NodeKind::CausalEdge {
                continue;
            }
            // The warning is injected into the prompt, so it must not leak secrets.
            if !self.guard.permits(node, prompt_domain) {
                tracing::warn!(
                    label = %node.label,
                    node_id = %node.id,
                    "Credential fact withheld from conflict check"
                );
                continue;
            }

            for stored in numeric_claims(&node.value) {
                for claim in &prompt_claims {
                    if stored.value == claim.value || !same_subject(node, &stored, claim) {
                        continue;
                    }
                    if !seen.insert((node.id.clone(), stored.raw.clone(), claim.raw.clone())) {
                        continue;
                    }

                    report.count += 1;
                    if !full {
                        full = self.append_warning(&mut report.warning, node, &stored, claim);
                    }
                }
            }
        }

        if report.has_conflicts() {
            tracing::info!(
                conflicts = report.count,
                candidates = candidates.len(),
                "Numeric conflicts detected"
            );
        }

        report
    }

    /// Append one mismatch description; returns true once the bound is hit.
    fn append_warning(
        &self,
        warning: &mut String,
        node: &Node,
        stored: &NumericClaim,
        claim: &NumericClaim,
    ) -> bool {
        let excerpt = truncate_graphemes(node.value.trim(), EXCERPT_CHARS);
        let entry = format!(
            "[conflict] {}: stored {} (\"{}\") but prompt says {}. ",
            node.label, stored.raw, excerpt, claim.raw
        );

        let used = warning.chars().count();
        let remaining = self.max_warning_chars.saturating_sub(used);
        let entry_chars = entry.chars().count();
        if entry_chars <= remaining {
            warning.push_str(&entry);
            return entry_chars == remaining;
        }

        warning.push_str(truncate_graphemes(&entry, remaining));
        true
    }
}

impl Default for NumericConflictDetector {
    fn default() -> Self {
        Self::new(&ConflictConfig::default(), &GuardConfig::default())
    }
}
