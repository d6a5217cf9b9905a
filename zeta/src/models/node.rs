use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NodeKind;

/// A node owned by the fact graph.
///
/// Domain is never stored; it is derived from the text whenever it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub value: String,
    /// Importance in `[0, 1]`, assigned at creation.
    pub salience: f32,
    pub created_at: DateTime<Utc>,
}

impl Node {
    pub fn new(id: String, new_node: NewNode) -> Self {
        Self {
            id,
            kind: new_node.kind,
            label: new_node.label,
            value: new_node.value,
            salience: new_node.salience,
            created_at: Utc::now(),
        }
    }
}

/// Everything the store needs to create a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNode {
    pub kind: NodeKind,
    pub label: String,
    pub value: String,
    pub salience: f32,
}

impl NewNode {
    pub fn new(kind: NodeKind, label: impl Into<String>, value: impl Into<String>, salience: f32) -> Self {
        Self {
            kind,
            label: label.into(),
            value: value.into(),
            salience: clamp_salience(salience),
        }
    }

    pub fn fact(label: impl Into<String>, value: impl Into<String>, salience: f32) -> Self {
        Self::new(NodeKind::Fact, label, value, salience)
    }
}

fn clamp_salience(salience: f32) -> f32 {
    if salience.is_nan() {
        return 0.0;
    }
    salience.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_clamps_salience() {
        assert_eq!(NewNode::fact("a", "b", 1.7).salience, 1.0);
        assert_eq!(NewNode::fact("a", "b", -0.2).salience, 0.0);
        assert_eq!(NewNode::fact("a", "b", f32::NAN).salience, 0.0);
        assert_eq!(NewNode::fact("a", "b", 0.85).salience, 0.85);
    }

    #[test]
    fn test_node_from_new_node() {
        let node = Node::new(
            "n1".to_string(),
            NewNode::new(NodeKind::Raw, "statement", "I parked on level 3", 0.85),
        );
        assert_eq!(node.id, "n1");
        assert_eq!(node.kind, NodeKind::Raw);
        assert_eq!(node.label, "statement");
        assert_eq!(node.value, "I parked on level 3");
    }

    #[test]
    fn test_node_serializes() {
        let node = Node::new("n2".to_string(), NewNode::fact("name", "Alice", 0.8));
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains(r#""kind":"fact""#));
        assert!(json.contains(r#""label":"name""#));
    }
}
