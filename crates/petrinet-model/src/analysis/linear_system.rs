//! Extract the Max-Plus state-space matrices `(D, A, B, C)` from an event
//! graph (`spec.md` §4.6, §4.7), partitioning transitions into inputs
//! (no predecessor place: externally triggered), states (both a
//! predecessor and a successor place), and outputs (no successor place:
//! observed only).
//!
//! `x(k) = D ⊗ x(k) ⊕ A ⊗ x(k-1) ⊕ B ⊗ u(k)`, `y(k) = C ⊗ x(k)`. `D`
//! carries zero-token (same-event) coupling between states, `A` carries
//! one-token (previous-event) coupling. This assumes the net has already
//! been passed through [`crate::analysis::canonicalize`], so every place
//! holds 0 or 1 token; a place with more tokens is folded into `A` with
//! its duration unchanged, which under-counts the delay but keeps the
//! matrices finite (`SPEC_FULL.md` §4.6).

use petrinet_common::NetError;
use petrinet_maxplus::SparseMatrix;

use super::event_graph::check_event_graph;
use crate::net::Net;
use crate::node::NodeKey;

pub struct LinearSystem {
    pub inputs: Vec<u32>,
    pub states: Vec<u32>,
    pub outputs: Vec<u32>,
    pub d: SparseMatrix,
    pub a: SparseMatrix,
    pub b: SparseMatrix,
    pub c: SparseMatrix,
}

pub fn build_linear_system(net: &Net) -> Result<LinearSystem, NetError> {
    check_event_graph(net)?;

    let mut inputs = Vec::new();
    let mut states = Vec::new();
    let mut outputs = Vec::new();
    for t in net.transitions() {
        if net.is_input(t.id) {
            inputs.push(t.id);
        } else if net.is_output(t.id) {
            outputs.push(t.id);
        } else {
            states.push(t.id);
        }
    }

    let state_index = |id: u32| states.iter().position(|&s| s == id);
    let input_index = |id: u32| inputs.iter().position(|&s| s == id);

    let mut d = SparseMatrix::new(states.len(), states.len());
    let mut a = SparseMatrix::new(states.len(), states.len());
    let mut b = SparseMatrix::new(states.len(), inputs.len());
    let mut c = SparseMatrix::new(outputs.len(), states.len());

    for place in net.places() {
        let key = NodeKey::Place(place.id);
        let source = net
            .arcs_in(key)
            .next()
            .expect("event graph place has exactly one in-arc");
        let dest = net
            .arcs_out(key)
            .next()
            .expect("event graph place has exactly one out-arc");
        let from = source.from.id();
        let to = dest.to.id();
        let duration = source.effective_duration() as f64;

        if let (Some(i), Some(j)) = (state_index(from), state_index(to)) {
            if place.tokens == 0 {
                d.accumulate_max(j, i, duration);
            } else {
                a.accumulate_max(j, i, duration);
            }
            continue;
        }
        if let (Some(i), Some(j)) = (input_index(from), state_index(to)) {
            b.accumulate_max(j, i, duration);
            continue;
        }
        if let (Some(i), Some(j)) = (state_index(from), outputs.iter().position(|&s| s == to)) {
            c.accumulate_max(j, i, duration);
        }
    }

    Ok(LinearSystem {
        inputs,
        states,
        outputs,
        d,
        a,
        b,
        c,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrinet_common::NetType;

    #[test]
    fn input_state_output_chain_populates_b_and_c() {
        let mut net = Net::new("n", NetType::TimedEventGraph);
        let t_in = net.add_transition(None, "in", 0.0, 0.0, 0.0);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 0);
        let t_state = net.add_transition(None, "state", 0.0, 0.0, 0.0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 0);
        let t_out = net.add_transition(None, "out", 0.0, 0.0, 0.0);
        net.add_arc(t_in, p0, Some(1.0)).unwrap();
        net.add_arc(p0, t_state, None).unwrap();
        net.add_arc(t_state, p1, Some(2.0)).unwrap();
        net.add_arc(p1, t_out, None).unwrap();

        let system = build_linear_system(&net).unwrap();
        assert_eq!(system.inputs, vec![0]);
        assert_eq!(system.states, vec![1]);
        assert_eq!(system.outputs, vec![2]);
        assert_eq!(system.b.get(0, 0), 1.0);
        assert_eq!(system.c.get(0, 0), 2.0);
    }
}
