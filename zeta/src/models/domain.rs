use serde::{Deserialize, Serialize};

/// Coarse semantic category assigned to a piece of text.
///
/// Variant order doubles as the tie-break order when two domains score the
/// same number of keyword hits during classification.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainTag {
    #[default]
    General,
    Credentials,
    Personal,
    Preferences,
    Location,
    Work,
    Technical,
    Health,
    Temporal,
    Numeric,
}

impl DomainTag {
    pub const ALL: [DomainTag; 10] = [
        DomainTag::General,
        DomainTag::Credentials,
        DomainTag::Personal,
        DomainTag::Preferences,
        DomainTag::Location,
        DomainTag::Work,
        DomainTag::Technical,
        DomainTag::Health,
        DomainTag::Temporal,
        DomainTag::Numeric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Credentials => "CREDENTIALS",
            Self::Personal => "PERSONAL",
            Self::Preferences => "PREFERENCES",
            Self::Location => "LOCATION",
            Self::Work => "WORK",
            Self::Technical => "TECHNICAL",
            Self::Health => "HEALTH",
            Self::Temporal => "TEMPORAL",
            Self::Numeric => "NUMERIC",
        }
    }
}

impl std::fmt::Display for DomainTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DomainTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        DomainTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == upper)
            .ok_or_else(|| format!("Unknown domain: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_default_is_general() {
        assert_eq!(DomainTag::default(), DomainTag::General);
    }

    #[test]
    fn test_domain_parse_case_insensitive() {
        assert_eq!(
            "credentials".parse::<DomainTag>().unwrap(),
            DomainTag::Credentials
        );
        assert_eq!(" Temporal ".parse::<DomainTag>().unwrap(), DomainTag::Temporal);
        assert!("weather".parse::<DomainTag>().is_err());
    }

    #[test]
    fn test_domain_serializes_screaming_case() {
        let json = serde_json::to_string(&DomainTag::Credentials).unwrap();
        assert_eq!(json, r#""CREDENTIALS""#);
    }
}
