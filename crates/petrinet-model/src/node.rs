use petrinet_common::{make_key, parse_key, NodeKind};

/// Identifies a node by kind and id without borrowing it
/// (`spec.md` §9: "do not store live references inside `Arc`; store
/// endpoint keys or indices"). Cheap, `Copy`, hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Place(u32),
    Transition(u32),
}

impl NodeKey {
    pub fn kind(self) -> NodeKind {
        match self {
            NodeKey::Place(_) => NodeKind::Place,
            NodeKey::Transition(_) => NodeKind::Transition,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            NodeKey::Place(id) | NodeKey::Transition(id) => id,
        }
    }

    pub fn to_key_string(self) -> String {
        make_key(self.kind(), self.id())
    }

    pub fn parse(s: &str) -> Option<Self> {
        parse_key(s).map(|(kind, id)| match kind {
            NodeKind::Place => NodeKey::Place(id),
            NodeKind::Transition => NodeKey::Transition(id),
        })
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_key_string())
    }
}

/// A place: holds tokens (`spec.md` §3). GRAFCET treats any positive count
/// as "active"; there is no separate boolean field.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: u32,
    pub caption: String,
    pub x: f32,
    pub y: f32,
    pub tokens: u64,
}

impl Place {
    pub fn key(&self) -> NodeKey {
        NodeKey::Place(self.id)
    }

    pub fn is_active(&self) -> bool {
        self.tokens > 0
    }
}

/// A transition. `is_input`/`is_output`/`is_state` are derived from the
/// net's arc index, not stored (`spec.md` §3); `index` is a scratch field
/// used by analyses to number inputs/states/outputs and is never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub id: u32,
    pub caption: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub index: i32,
}

impl Transition {
    pub fn key(&self) -> NodeKey {
        NodeKey::Transition(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_key_round_trips_through_string() {
        let key = NodeKey::Place(7);
        assert_eq!(key.to_key_string(), "P7");
        assert_eq!(NodeKey::parse("P7"), Some(key));
        assert_eq!(NodeKey::parse("T3"), Some(NodeKey::Transition(3)));
        assert_eq!(NodeKey::parse("garbage"), None);
    }

    #[test]
    fn place_is_active_iff_positive_tokens() {
        let mut p = Place {
            id: 0,
            caption: String::new(),
            x: 0.0,
            y: 0.0,
            tokens: 0,
        };
        assert!(!p.is_active());
        p.tokens = 1;
        assert!(p.is_active());
    }
}
