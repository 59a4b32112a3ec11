use super::calculators::SizeTag;
use crate::gameplay::Action;
use serde_json::Value;

/// Key that stands in for any missing branch of a rule tree.
const DEFAULTS: &str = "defaults";

/// A leaf of a postflop rule tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleNode {
    pub action: Option<Action>,
    pub size_tag: Option<SizeTag>,
    pub plan: Option<String>,
    /// per-facing overrides, e.g. `{"third": {"action": "raise"}}`
    pub facing: Option<Value>,
}

impl RuleNode {
    /// A node must name an action or a size to count as a leaf.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let action = map.get("action").and_then(Value::as_str).and_then(|s| Action::try_from(s).ok());
        let size_tag = map.get("size_tag").and_then(Value::as_str).and_then(|s| SizeTag::try_from(s).ok());
        if action.is_none() && size_tag.is_none() {
            return None;
        }
        Some(Self {
            action,
            size_tag,
            plan: map.get("plan").and_then(Value::as_str).map(String::from),
            facing: map.get("facing").cloned(),
        })
    }
    /// Override for the faced bet size, by any of its spellings.
    pub fn facing(&self, keys: &[&str]) -> Option<RuleNode> {
        let facing = self.facing.as_ref()?;
        keys.iter().find_map(|k| facing.get(*k)).and_then(Self::from_value)
    }
    pub fn is_betlike(&self) -> bool {
        matches!(self.action, Some(Action::Bet | Action::Raise))
    }
}

/// A matched leaf and the path walked to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub node: RuleNode,
    pub path: Vec<String>,
}

impl Match {
    pub fn path(&self) -> String {
        self.path.join("/")
    }
}

/// Walks `keys` through a rule tree, stepping into `defaults` wherever a
/// key is absent.
///
/// With `early_stop` the first leaf met on the way wins. Without it the
/// walk must consume every key and end on a leaf.
pub fn lookup(tree: &Value, keys: &[&str], early_stop: bool) -> Option<Match> {
    let mut node = tree;
    let mut path = Vec::with_capacity(keys.len());
    for key in keys {
        if early_stop {
            if let Some(leaf) = RuleNode::from_value(node) {
                return Some(Match { node: leaf, path });
            }
        }
        match (node.get(*key), node.get(DEFAULTS)) {
            (Some(next), _) => {
                path.push(key.to_string());
                node = next;
            }
            (None, Some(next)) => {
                path.push(format!("{}:{}", DEFAULTS, key));
                node = next;
            }
            (None, None) => return None,
        }
    }
    RuleNode::from_value(node)
        .or_else(|| node.get(DEFAULTS).and_then(RuleNode::from_value))
        .map(|leaf| Match { node: leaf, path })
}
