use petrinet_common::{ArcConflict, Message, NetError, NetType, NodeKind};
use rustc_hash::FxHashMap;

use crate::arc::Arc;
use crate::node::{NodeKey, Place, Transition};

/// A reference to a node returned by [`Net::find_node`], borrowed from the
/// net so callers don't need to know which vector it lives in.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Place(&'a Place),
    Transition(&'a Transition),
}

impl NodeRef<'_> {
    pub fn key(&self) -> NodeKey {
        match self {
            NodeRef::Place(p) => p.key(),
            NodeRef::Transition(t) => t.key(),
        }
    }
}

/// A Petri net / GRAFCET chart (`spec.md` §3). Owns its places,
/// transitions, and arcs; `arcs_in`/`arcs_out` are a derived index rebuilt
/// after every mutation rather than stored references, which breaks the
/// `Node <-> Arc` reference cycle the original object model has
/// (`spec.md` §9).
#[derive(Debug, Clone)]
pub struct Net {
    name: String,
    ty: NetType,
    places: Vec<Place>,
    transitions: Vec<Transition>,
    arcs: Vec<Arc>,
    messages: Vec<Message>,
    next_place_id: u32,
    next_transition_id: u32,
    arcs_in: FxHashMap<NodeKey, Vec<usize>>,
    arcs_out: FxHashMap<NodeKey, Vec<usize>>,
}

impl Net {
    pub fn new(name: impl Into<String>, ty: NetType) -> Self {
        Net {
            name: name.into(),
            ty,
            places: Vec::new(),
            transitions: Vec::new(),
            arcs: Vec::new(),
            messages: Vec::new(),
            next_place_id: 0,
            next_transition_id: 0,
            arcs_in: FxHashMap::default(),
            arcs_out: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn ty(&self) -> NetType {
        self.ty
    }

    pub fn set_ty(&mut self, ty: NetType) {
        self.ty = ty;
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty() && self.transitions.is_empty()
    }

    pub fn clear(&mut self) {
        self.places.clear();
        self.transitions.clear();
        self.arcs.clear();
        self.messages.clear();
        self.next_place_id = 0;
        self.next_transition_id = 0;
        self.arcs_in.clear();
        self.arcs_out.clear();
    }

    // --- construction -----------------------------------------------

    /// Add a place. `id` is assigned from the next-free counter when
    /// omitted; ids are never recycled within a session even after
    /// `remove_node`, matching editor undo/redo expectations
    /// (`SPEC_FULL.md` §4.4).
    pub fn add_place(
        &mut self,
        id: Option<u32>,
        caption: impl Into<String>,
        x: f32,
        y: f32,
        tokens: u64,
    ) -> NodeKey {
        let id = id.unwrap_or(self.next_place_id);
        self.next_place_id = self.next_place_id.max(id + 1);
        self.places.push(Place {
            id,
            caption: caption.into(),
            x,
            y,
            tokens,
        });
        NodeKey::Place(id)
    }

    pub fn add_transition(
        &mut self,
        id: Option<u32>,
        caption: impl Into<String>,
        x: f32,
        y: f32,
        angle: f32,
    ) -> NodeKey {
        let id = id.unwrap_or(self.next_transition_id);
        self.next_transition_id = self.next_transition_id.max(id + 1);
        self.transitions.push(Transition {
            id,
            caption: caption.into(),
            x,
            y,
            angle,
            index: 0,
        });
        NodeKey::Transition(id)
    }

    fn node_exists(&self, key: NodeKey) -> bool {
        match key {
            NodeKey::Place(id) => self.places.iter().any(|p| p.id == id),
            NodeKey::Transition(id) => self.transitions.iter().any(|t| t.id == id),
        }
    }

    /// Add an arc between two nodes of opposite kind (`spec.md` §4.4). The
    /// bipartite invariant is enforced here and only here, so every other
    /// consumer may rely on it without re-checking.
    pub fn add_arc(
        &mut self,
        from: NodeKey,
        to: NodeKey,
        duration: Option<f32>,
    ) -> Result<usize, NetError> {
        if !self.node_exists(from) {
            return Err(NetError::UnknownNode(from.to_key_string()));
        }
        if !self.node_exists(to) {
            return Err(NetError::UnknownNode(to.to_key_string()));
        }
        if from.kind() == to.kind() {
            return Err(NetError::ArcConflict {
                from: from.to_key_string(),
                to: to.to_key_string(),
                kind: ArcConflict::SameKindEndpoints,
            });
        }
        if self.arcs.iter().any(|a| a.from == from && a.to == to) {
            return Err(NetError::ArcConflict {
                from: from.to_key_string(),
                to: to.to_key_string(),
                kind: ArcConflict::DuplicateArc,
            });
        }
        if let Some(d) = duration {
            if !d.is_finite() || d < 0.0 {
                return Err(NetError::InvalidInput(format!(
                    "arc duration must be a non-negative finite number, got {d}"
                )));
            }
        }

        let arc = match from.kind() {
            NodeKind::Place => Arc::place_to_transition(from, to),
            NodeKind::Transition => Arc::transition_to_place(from, to, duration.unwrap_or(0.0)),
        };
        let index = self.arcs.len();
        self.arcs.push(arc);
        self.rebuild_index();
        Ok(index)
    }

    /// Remove a node and every arc incident to it (`spec.md` §4.4).
    pub fn remove_node(&mut self, key: NodeKey) {
        self.arcs.retain(|a| a.from != key && a.to != key);
        match key {
            NodeKey::Place(id) => self.places.retain(|p| p.id != id),
            NodeKey::Transition(id) => self.transitions.retain(|t| t.id != id),
        }
        self.rebuild_index();
    }

    /// Remove a single arc, leaving both endpoint nodes in place. Returns
    /// `true` if a matching arc was found. Used by canonicalization, which
    /// rewires arcs without deleting the nodes they touch.
    pub fn remove_arc(&mut self, from: NodeKey, to: NodeKey) -> bool {
        let before = self.arcs.len();
        self.arcs.retain(|a| !(a.from == from && a.to == to));
        let removed = self.arcs.len() != before;
        if removed {
            self.rebuild_index();
        }
        removed
    }

    pub fn find_node(&self, key: &str) -> Option<NodeRef<'_>> {
        match NodeKey::parse(key)? {
            NodeKey::Place(id) => self.place(id).map(NodeRef::Place),
            NodeKey::Transition(id) => self.transition(id).map(NodeRef::Transition),
        }
    }

    fn rebuild_index(&mut self) {
        self.arcs_in.clear();
        self.arcs_out.clear();
        for (i, arc) in self.arcs.iter().enumerate() {
            self.arcs_out.entry(arc.from).or_default().push(i);
            self.arcs_in.entry(arc.to).or_default().push(i);
        }
    }

    // --- accessors -----------------------------------------------------

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.iter()
    }

    pub fn places_mut(&mut self) -> impl Iterator<Item = &mut Place> {
        self.places.iter_mut()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn transitions_mut(&mut self) -> impl Iterator<Item = &mut Transition> {
        self.transitions.iter_mut()
    }

    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.iter()
    }

    pub fn place(&self, id: u32) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    pub fn place_mut(&mut self, id: u32) -> Option<&mut Place> {
        self.places.iter_mut().find(|p| p.id == id)
    }

    pub fn transition(&self, id: u32) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    pub fn transition_mut(&mut self, id: u32) -> Option<&mut Transition> {
        self.transitions.iter_mut().find(|t| t.id == id)
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Arcs whose `to` is `key` (`spec.md` §3: `arcs_in(n) = {a | a.to = n}`).
    pub fn arcs_in(&self, key: NodeKey) -> impl Iterator<Item = &Arc> {
        self.arcs_in
            .get(&key)
            .into_iter()
            .flatten()
            .map(move |&i| &self.arcs[i])
    }

    /// Arcs whose `from` is `key` (`spec.md` §3: `arcs_out(n) = {a | a.from = n}`).
    pub fn arcs_out(&self, key: NodeKey) -> impl Iterator<Item = &Arc> {
        self.arcs_out
            .get(&key)
            .into_iter()
            .flatten()
            .map(move |&i| &self.arcs[i])
    }

    pub fn is_input(&self, transition_id: u32) -> bool {
        self.arcs_in(NodeKey::Transition(transition_id)).next().is_none()
    }

    pub fn is_output(&self, transition_id: u32) -> bool {
        self.arcs_out(NodeKey::Transition(transition_id)).next().is_none()
    }

    pub fn is_state(&self, transition_id: u32) -> bool {
        !self.is_input(transition_id) && !self.is_output(transition_id)
    }

    // --- diagnostics -----------------------------------------------------

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Re-check the structural invariants listed in `spec.md` §3/§8. Used
    /// by tests and by importers right after construction.
    pub fn check_invariants(&self) -> Result<(), NetError> {
        let mut seen = std::collections::HashSet::new();
        for arc in &self.arcs {
            if arc.from.kind() == arc.to.kind() {
                return Err(NetError::ArcConflict {
                    from: arc.from.to_key_string(),
                    to: arc.to.to_key_string(),
                    kind: ArcConflict::SameKindEndpoints,
                });
            }
            if !self.node_exists(arc.from) {
                return Err(NetError::UnknownNode(arc.from.to_key_string()));
            }
            if !self.node_exists(arc.to) {
                return Err(NetError::UnknownNode(arc.to.to_key_string()));
            }
            if !seen.insert((arc.from, arc.to)) {
                return Err(NetError::ArcConflict {
                    from: arc.from.to_key_string(),
                    to: arc.to.to_key_string(),
                    kind: ArcConflict::DuplicateArc,
                });
            }
        }
        Ok(())
    }
}
