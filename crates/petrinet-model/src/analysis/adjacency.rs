//! Collapse a (timed) event graph's places into transition-to-transition
//! edges so [`petrinet_maxplus`] can run Howard/Semi-Howard on it
//! (`spec.md` §4.6, grounded on `original_source/src/Net/Howard.h`'s
//! adjacency-matrix contract).

use rustc_hash::FxHashMap;

use petrinet_common::NetError;
use petrinet_maxplus::SparseMatrix;

use super::event_graph::check_event_graph;
use crate::net::Net;
use crate::node::NodeKey;

/// The transition adjacency extracted from an event graph: `n` is the
/// number of transitions, `order` maps a transition id to its row/column
/// index, `weights[i][j]` is the duration of the place on the `i -> j`
/// edge (tropical-max accumulated when several places parallel the same
/// pair), `delays[i][j]` is that place's token count.
pub struct EventGraphAdjacency {
    pub order: Vec<u32>,
    pub index: FxHashMap<u32, usize>,
    pub weights: SparseMatrix,
    pub delays: SparseMatrix,
}

impl EventGraphAdjacency {
    /// Flatten the sparse matrices into the `(arcs, weights, delays)`
    /// triple `petrinet_maxplus::semi_howard` expects.
    pub fn to_arc_lists(&self) -> (Vec<(usize, usize)>, Vec<f64>, Vec<f64>) {
        let mut arcs = Vec::new();
        let mut weights = Vec::new();
        let mut delays = Vec::new();
        for (i, j, w) in self.weights.iter_row_major() {
            arcs.push((i, j));
            weights.push(w);
            delays.push(self.delays.get(i, j));
        }
        (arcs, weights, delays)
    }

    pub fn transition_id_at(&self, index: usize) -> u32 {
        self.order[index]
    }
}

/// Build the adjacency. Fails with `NotAnEventGraph` if the structural
/// precondition does not hold.
pub fn build_adjacency(net: &Net) -> Result<EventGraphAdjacency, NetError> {
    check_event_graph(net)?;

    let order: Vec<u32> = net.transitions().map(|t| t.id).collect();
    let index: FxHashMap<u32, usize> = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let n = order.len();
    let mut weights = SparseMatrix::new(n, n);
    let mut delays = SparseMatrix::new(n, n);

    for place in net.places() {
        let key = NodeKey::Place(place.id);
        let from_transition = net
            .arcs_in(key)
            .next()
            .expect("event graph place has exactly one in-arc")
            .from
            .id();
        let to_transition = net
            .arcs_out(key)
            .next()
            .expect("event graph place has exactly one out-arc")
            .to
            .id();
        let i = index[&from_transition];
        let j = index[&to_transition];
        let duration = net
            .arcs_in(key)
            .next()
            .map(|a| a.effective_duration() as f64)
            .unwrap_or(0.0);
        weights.accumulate_max(i, j, duration);
        delays.accumulate_max(i, j, place.tokens as f64);
    }

    Ok(EventGraphAdjacency {
        order,
        index,
        weights,
        delays,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrinet_common::NetType;

    #[test]
    fn two_place_cycle_builds_a_two_by_two_adjacency() {
        // spec.md §8 scenario 1.
        let mut net = Net::new("n", NetType::TimedEventGraph);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        let t1 = net.add_transition(None, "t1", 0.0, 0.0, 0.0);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 1);
        net.add_arc(t0, p0, Some(3.0)).unwrap();
        net.add_arc(p0, t1, None).unwrap();
        net.add_arc(t1, p1, Some(5.0)).unwrap();
        net.add_arc(p1, t0, None).unwrap();

        let adjacency = build_adjacency(&net).unwrap();
        let (arcs, weights, delays) = adjacency.to_arc_lists();
        assert_eq!(arcs.len(), 2);
        assert_eq!(weights.iter().sum::<f64>(), 8.0);
        assert_eq!(delays.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn rejects_a_net_that_is_not_an_event_graph() {
        let mut net = Net::new("n", NetType::Petri);
        net.add_place(None, "p0", 0.0, 0.0, 1);
        assert!(build_adjacency(&net).is_err());
    }
}
