use crate::intelligence::utils::{contains_phrase, padded_words};
use crate::models::{DomainTag, Node};

/// Keyword phrases per domain. Phrases are matched on whole words after
/// lowercasing and collapsing punctuation, so "api-key" matches "api key".
const DOMAIN_KEYWORDS: &[(DomainTag, &[&str])] = &[
    (
        DomainTag::Credentials,
        &[
            "password",
            "passwords",
            "passcode",
            "passphrase",
            "pin",
            "token",
            "tokens",
            "secret",
            "secrets",
            "credential",
            "credentials",
            "api key",
            "apikey",
            "api token",
            "ssh key",
            "private key",
            "access key",
            "login",
            "username",
            "auth",
            "otp",
            "2fa",
        ],
    ),
    (
        DomainTag::Personal,
        &[
            "name", "age", "old", "born", "birthday", "wife", "husband", "partner", "son",
            "daughter", "mother", "father", "mom", "dad", "brother", "sister", "family", "friend",
            "pet", "dog", "cat", "married", "myself",
        ],
    ),
    (
        DomainTag::Preferences,
        &[
            "like", "likes", "love", "loves", "prefer", "prefers", "favorite", "favourite", "hate",
            "hates", "enjoy", "enjoys", "dislike", "dislikes", "preference", "preferences",
        ],
    ),
    (
        DomainTag::Location,
        &[
            "live", "lives", "lived", "city", "country", "address", "street", "home", "town",
            "moved", "located", "location", "where",
        ],
    ),
    (
        DomainTag::Work,
        &[
            "work", "works", "job", "office", "company", "employer", "boss", "colleague",
            "career", "salary", "project", "meeting", "manager",
        ],
    ),
    (
        DomainTag::Technical,
        &[
            "code", "server", "database", "rust", "python", "software", "program", "bug",
            "deploy", "computer", "laptop", "api", "compile",
        ],
    ),
    (
        DomainTag::Health,
        &[
            "doctor", "allergic", "allergy", "medication", "medicine", "sick", "health",
            "hospital", "diet", "blood", "exercise",
        ],
    ),
    (
        DomainTag::Temporal,
        &[
            "today",
            "tomorrow",
            "yesterday",
            "date",
            "time",
            "schedule",
            "deadline",
            "week",
            "month",
            "year",
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
            "sunday",
            "morning",
            "evening",
            "tonight",
            "when",
            "appointment",
        ],
    ),
    (
        DomainTag::Numeric,
        &["number", "count", "how many", "how much", "total", "percent", "amount"],
    ),
];

/// Unordered domain pairs that may surface each other's facts.
/// `Credentials` and `General` never appear here.
const RELATED_DOMAINS: &[(DomainTag, DomainTag)] = &[
    (DomainTag::Personal, DomainTag::Preferences),
    (DomainTag::Personal, DomainTag::Location),
    (DomainTag::Personal, DomainTag::Health),
    (DomainTag::Personal, DomainTag::Numeric),
    (DomainTag::Work, DomainTag::Technical),
    (DomainTag::Work, DomainTag::Temporal),
    (DomainTag::Work, DomainTag::Location),
    (DomainTag::Temporal, DomainTag::Numeric),
    (DomainTag::Health, DomainTag::Preferences),
];

/// Keyword-driven domain classifier.
///
/// Classification is a pure function of the text: the same input always
/// yields the same tag, and empty or unrecognised text is `General`.
#[derive(Debug, Clone, Default)]
pub struct DomainClassifier;

impl DomainClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> DomainTag {
        let padded = padded_words(text);
        if padded.trim().is_empty() {
            return DomainTag::General;
        }

        // Any credential signal wins outright.
        if keyword_hits(&padded, DomainTag::Credentials) > 0 {
            return DomainTag::Credentials;
        }

        let mut best = DomainTag::General;
        let mut best_hits = 0usize;
        for (tag, _) in DOMAIN_KEYWORDS.iter().skip(1) {
            let hits = keyword_hits(&padded, *tag);
            if hits > best_hits {
                best = *tag;
                best_hits = hits;
            }
        }

        if best_hits == 0 && has_standalone_number(&padded) {
            return DomainTag::Numeric;
        }

        best
    }

    /// Domain of a stored node: its value's domain, or its label's domain
    /// when the value alone says nothing ("xyz123" labelled `password`).
    pub fn classify_node(&self, node: &Node) -> DomainTag {
        match self.classify(&node.value) {
            DomainTag::General => self.classify(&node.label),
            domain => domain,
        }
    }

    pub fn domains_related(&self, a: DomainTag, b: DomainTag) -> bool {
        a == b
            || RELATED_DOMAINS
                .iter()
                .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    pub fn domain_name(&self, tag: DomainTag) -> &'static str {
        tag.as_str()
    }
}

fn keyword_hits(padded: &str, tag: DomainTag) -> usize {
    DOMAIN_KEYWORDS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, keywords)| {
            keywords
                .iter()
                .filter(|kw| contains_phrase(padded, kw))
                .count()
        })
        .unwrap_or(0)
}

fn has_standalone_number(padded: &str) -> bool {
    padded
        .split_whitespace()
        .any(|w| w.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewNode;

    fn classifier() -> DomainClassifier {
        DomainClassifier::new()
    }

    #[test]
    fn test_empty_text_is_general() {
        assert_eq!(classifier().classify(""), DomainTag::General);
        assert_eq!(classifier().classify("   ?!  "), DomainTag::General);
    }

    #[test]
    fn test_credential_queries() {
        let c = classifier();
        assert_eq!(c.classify("What's my password?"), DomainTag::Credentials);
        assert_eq!(c.classify("my github API-key"), DomainTag::Credentials);
        assert_eq!(c.classify("the wifi PIN"), DomainTag::Credentials);
    }

    #[test]
    fn test_credentials_take_precedence() {
        // work + office would otherwise win
        assert_eq!(
            classifier().classify("my work office login"),
            DomainTag::Credentials
        );
    }

    #[test]
    fn test_topical_domains() {
        let c = classifier();
        assert_eq!(c.classify("What's the weather?"), DomainTag::General);
        assert_eq!(c.classify("What is my name?"), DomainTag::Personal);
        assert_eq!(c.classify("I live in Lisbon"), DomainTag::Location);
        assert_eq!(c.classify("my boss moved the meeting"), DomainTag::Work);
        assert_eq!(c.classify("see you tomorrow morning"), DomainTag::Temporal);
        assert_eq!(c.classify("I love sushi"), DomainTag::Preferences);
    }

    #[test]
    fn test_bare_number_is_numeric() {
        assert_eq!(classifier().classify("42"), DomainTag::Numeric);
        // digits glued to letters are not a number
        assert_eq!(classifier().classify("xyz123"), DomainTag::General);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let c = classifier();
        for text in ["", "my password is hunter2", "I work at Acme", "zzz"] {
            assert_eq!(c.classify(text), c.classify(text));
        }
    }

    #[test]
    fn test_classify_node_falls_back_to_label() {
        let c = classifier();
        let node = crate::models::Node::new("n".into(), NewNode::fact("password", "xyz123", 0.8));
        assert_eq!(c.classify_node(&node), DomainTag::Credentials);

        let node = crate::models::Node::new("n".into(), NewNode::fact("api_token", "a9f0c2", 0.8));
        assert_eq!(c.classify_node(&node), DomainTag::Credentials);

        let node = crate::models::Node::new("n".into(), NewNode::fact("city", "I live in Oslo", 0.8));
        assert_eq!(c.classify_node(&node), DomainTag::Location);
    }

    #[test]
    fn test_domains_related() {
        let c = classifier();
        assert!(c.domains_related(DomainTag::General, DomainTag::General));
        assert!(c.domains_related(DomainTag::Location, DomainTag::Personal));
        assert!(c.domains_related(DomainTag::Personal, DomainTag::Location));
        assert!(!c.domains_related(DomainTag::General, DomainTag::Personal));
        for tag in DomainTag::ALL {
            if tag != DomainTag::Credentials {
                assert!(!c.domains_related(DomainTag::Credentials, tag));
            }
        }
    }

    #[test]
    fn test_domain_name() {
        assert_eq!(classifier().domain_name(DomainTag::Credentials), "CREDENTIALS");
    }
}
