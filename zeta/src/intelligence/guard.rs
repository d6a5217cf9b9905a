use crate::config::{GuardConfig, LabelMatch};
use crate::intelligence::domain::DomainClassifier;
use crate::models::{DomainTag, Node};

/// Hard security boundary for credential-bearing facts.
///
/// A node is credential-bearing when its value classifies as
/// [`DomainTag::Credentials`] or its label contains one of the configured
/// keywords. Such a node may only surface for a credentials query.
#[derive(Debug, Clone)]
pub struct CredentialGuard {
    classifier: DomainClassifier,
    label_keywords: Vec<String>,
    label_match: LabelMatch,
}

impl CredentialGuard {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            classifier: DomainClassifier::new(),
            label_keywords: config
                .label_keywords
                .iter()
                .map(|kw| kw.trim().to_lowercase())
                .filter(|kw| !kw.is_empty())
                .collect(),
            label_match: config.label_match,
        }
    }

    pub fn is_credential(&self, node: &Node) -> bool {
        self.classifier.classify(&node.value) == DomainTag::Credentials
            || self.label_has_keyword(&node.label)
    }

    /// Whether `node` may surface for a query of `query_domain`.
    /// Salience plays no part in this decision.
    pub fn permits(&self, node: &Node, query_domain: DomainTag) -> bool {
        query_domain == DomainTag::Credentials || !self.is_credential(node)
    }

    fn label_has_keyword(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        match self.label_match {
            LabelMatch::Substring => self.label_keywords.iter().any(|kw| label.contains(kw.as_str())),
            LabelMatch::Word => {
                let segments: Vec<&str> = label
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|s| !s.is_empty())
                    .collect();
                self.label_keywords.iter().any(|kw| {
                    let kw = kw.trim_matches(|c: char| !c.is_alphanumeric());
                    !kw.is_empty() && segments.contains(&kw)
                })
            }
        }
    }
}

impl Default for CredentialGuard {
    fn default() -> Self {
        Self::new(&GuardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewNode;

    fn node(label: &str, value: &str, salience: f32) -> Node {
        Node::new("n".to_string(), NewNode::fact(label, value, salience))
    }

    #[test]
    fn test_value_classification_flags_credentials() {
        let guard = CredentialGuard::default();
        assert!(guard.is_credential(&node("note", "my password is hunter2", 0.5)));
    }

    #[test]
    fn test_label_only_detection() {
        let guard = CredentialGuard::default();
        let n = node("api_token", "a81f9c0d", 0.5);
        assert!(guard.is_credential(&n));
        assert!(!guard.permits(&n, DomainTag::General));
    }

    #[test]
    fn test_label_match_is_case_insensitive() {
        let guard = CredentialGuard::default();
        assert!(guard.is_credential(&node("GitHub_SECRET", "abc", 0.1)));
        assert!(guard.is_credential(&node("Door Code", "4312", 0.1)));
    }

    #[test]
    fn test_plain_fact_is_not_credential() {
        let guard = CredentialGuard::default();
        assert!(!guard.is_credential(&node("name", "Alice", 0.5)));
        assert!(guard.permits(&node("name", "Alice", 0.5), DomainTag::General));
    }

    #[test]
    fn test_substring_mode_matches_inside_words() {
        let guard = CredentialGuard::default();
        assert!(guard.is_credential(&node("keyword", "rust", 0.1)));
    }

    #[test]
    fn test_word_mode_requires_whole_segment() {
        let guard = CredentialGuard::new(&GuardConfig {
            label_match: LabelMatch::Word,
            ..GuardConfig::default()
        });
        assert!(!guard.is_credential(&node("keyword", "rust", 0.1)));
        assert!(guard.is_credential(&node("ssh-key", "rust", 0.1)));
        // "api_" reduces to "api"
        assert!(guard.is_credential(&node("api_url", "https://x", 0.1)));
    }

    #[test]
    fn test_salience_never_overrides_block() {
        let guard = CredentialGuard::default();
        let n = node("password", "xyz123", 1.0);
        for domain in DomainTag::ALL {
            assert_eq!(guard.permits(&n, domain), domain == DomainTag::Credentials);
        }
    }

    #[test]
    fn test_configured_keywords_extend_the_set() {
        let guard = CredentialGuard::new(&GuardConfig {
            label_keywords: vec!["Passphrase".to_string(), " ".to_string()],
            label_match: LabelMatch::Substring,
        });
        assert!(guard.is_credential(&node("vault_passphrase", "correct horse", 0.1)));
        assert!(!guard.is_credential(&node("name", "Alice", 0.1)));
    }
}
