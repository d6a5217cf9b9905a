use crate::config::SurfacingConfig;
use crate::intelligence::domain::DomainClassifier;
use crate::models::{DomainTag, Node};

/// Decides whether a fact that already passed the credential guard is worth
/// surfacing for a query domain.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    classifier: DomainClassifier,
    salience_override: f32,
}

impl RelevanceFilter {
    pub fn new(config: &SurfacingConfig) -> Self {
        Self {
            classifier: DomainClassifier::new(),
            salience_override: config.salience_override,
        }
    }

    pub fn is_eligible(&self, node: &Node, query_domain: DomainTag) -> bool {
        let node_domain = self.classifier.classify_node(node);
        self.classifier.domains_related(query_domain, node_domain)
            || node.salience >= self.salience_override
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(&SurfacingConfig::default())
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
    fn test_related_domain_is_eligible() {
        let filter = RelevanceFilter::default();
        let n = node("location", "I live in Porto", 0.1);
        assert!(filter.is_eligible(&n, DomainTag::Location));
        assert!(filter.is_eligible(&n, DomainTag::Personal));
    }

    #[test]
    fn test_unrelated_low_salience_is_suppressed() {
        let filter = RelevanceFilter::default();
        let n = node("location", "I live in Porto", 0.85);
        assert!(!filter.is_eligible(&n, DomainTag::General));
        assert!(!filter.is_eligible(&n, DomainTag::Technical));
    }

    #[test]
    fn test_high_salience_crosses_domains() {
        let filter = RelevanceFilter::default();
        assert!(filter.is_eligible(&node("location", "I live in Porto", 0.9), DomainTag::General));
        assert!(filter.is_eligible(&node("location", "I live in Porto", 1.0), DomainTag::Work));
    }

    #[test]
    fn test_override_threshold_is_configurable() {
        let filter = RelevanceFilter::new(&SurfacingConfig {
            salience_override: 0.5,
            ..SurfacingConfig::default()
        });
        assert!(filter.is_eligible(&node("location", "I live in Porto", 0.6), DomainTag::General));
    }
}
