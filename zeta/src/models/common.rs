use serde::{Deserialize, Serialize};

/// Kind of node held by the fact graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Labelled fact about the user or topic
    #[default]
    Fact,
    /// Cause -> effect relation extracted from a statement
    CausalEdge,
    /// Raw statement stored when structured extraction found nothing
    Raw,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fact => write!(f, "fact"),
            Self::CausalEdge => write!(f, "causal_edge"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fact" => Ok(Self::Fact),
            "causal_edge" => Ok(Self::CausalEdge),
            "raw" => Ok(Self::Raw),
            _ => Err(format!("Unknown node kind: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_default() {
        assert_eq!(NodeKind::default(), NodeKind::Fact);
    }

    #[test]
    fn test_node_kind_display_parses_back() {
        for kind in [NodeKind::Fact, NodeKind::CausalEdge, NodeKind::Raw] {
            assert_eq!(kind.to_string().parse::<NodeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_node_kind_serializes_snake_case() {
        let json = serde_json::to_string(&NodeKind::CausalEdge).unwrap();
        assert_eq!(json, r#""causal_edge""#);
    }

    #[test]
    fn test_unknown_node_kind() {
        assert!("edge".parse::<NodeKind>().is_err());
    }
}
