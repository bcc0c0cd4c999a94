//! Rewrite a net into canonical event-graph form (`spec.md` §4.6, Open
//! Question on canonicalization ordering resolved in `DESIGN.md`):
//!
//! 1. Split every place holding `k` tokens into a chain of `k`
//!    single-token places joined by `k - 1` zero-duration synthetic
//!    transitions, so a place with `k` tokens and no arcs becomes `k`
//!    places and `k - 1` synthetic transitions (`spec.md` §8 worked
//!    example).
//! 2. Push any token still sitting on a place adjacent to a boundary
//!    input or output transition one hop into the interior, through
//!    another zero-duration synthetic transition, so every boundary
//!    place starts empty.
//!
//! Both passes build the result through [`Net`]'s public API rather than
//! mutating field vectors directly, so id assignment and invariant
//! maintenance stay centralized in one place.

use std::collections::HashMap;

use crate::net::Net;
use crate::node::NodeKey;

pub fn canonicalize(net: &Net) -> Net {
    let mut out = Net::new(format!("{} (canonical)", net.name()), net.ty());

    let mut transition_map: HashMap<u32, NodeKey> = HashMap::new();
    for t in net.transitions() {
        let key = out.add_transition(None, t.caption.clone(), t.x, t.y, t.angle);
        transition_map.insert(t.id, key);
    }

    let mut synthetic_count = 0usize;

    for place in net.places() {
        let key = NodeKey::Place(place.id);
        let in_arcs: Vec<(NodeKey, f32)> = net
            .arcs_in(key)
            .map(|a| (a.from, a.effective_duration()))
            .collect();
        let out_arcs: Vec<NodeKey> = net.arcs_out(key).map(|a| a.to).collect();

        let chain_len = place.tokens.max(1) as usize;
        let mut chain = Vec::with_capacity(chain_len);
        for i in 0..chain_len {
            let tokens = if place.tokens == 0 { 0 } else { 1 };
            let chain_key = out.add_place(
                None,
                format!("{}#{}", place.caption, i),
                place.x + i as f32,
                place.y,
                tokens,
            );
            chain.push(chain_key);
        }
        for pair in chain.windows(2) {
            synthetic_count += 1;
            let synth = out.add_transition(
                None,
                format!("sigma{synthetic_count}"),
                place.x,
                place.y,
                0.0,
            );
            out.add_arc(pair[0], synth, None)
                .expect("split chain arc is well-formed");
            out.add_arc(synth, pair[1], Some(0.0))
                .expect("split chain arc is well-formed");
        }

        let head = chain[0];
        let tail = *chain.last().unwrap();
        for (from, duration) in in_arcs {
            let new_from = transition_map[&from.id()];
            out.add_arc(new_from, head, Some(duration))
                .expect("arc carried over from source net");
        }
        for to in out_arcs {
            let new_to = transition_map[&to.id()];
            out.add_arc(tail, new_to, None)
                .expect("arc carried over from source net");
        }
    }

    push_boundary_tokens(&mut out, &mut synthetic_count);
    out
}

fn push_boundary_tokens(net: &mut Net, synthetic_count: &mut usize) {
    let input_transitions: Vec<u32> = net
        .transitions()
        .map(|t| t.id)
        .filter(|&id| net.is_input(id))
        .collect();
    for tid in input_transitions {
        let places: Vec<u32> = net
            .arcs_out(NodeKey::Transition(tid))
            .map(|a| a.to.id())
            .collect();
        for pid in places {
            push_token_downstream(net, pid, synthetic_count);
        }
    }

    let output_transitions: Vec<u32> = net
        .transitions()
        .map(|t| t.id)
        .filter(|&id| net.is_output(id))
        .collect();
    for tid in output_transitions {
        let places: Vec<u32> = net
            .arcs_in(NodeKey::Transition(tid))
            .map(|a| a.from.id())
            .collect();
        for pid in places {
            push_token_upstream(net, pid, synthetic_count);
        }
    }
}

/// Move `pid`'s token one hop downstream, through a fresh zero-duration
/// transition, so `pid` itself (adjacent to an input transition) ends up
/// empty.
fn push_token_downstream(net: &mut Net, pid: u32, synthetic_count: &mut usize) {
    let tokens = net.place(pid).map(|p| p.tokens).unwrap_or(0);
    if tokens == 0 {
        return;
    }
    let (x, y) = net.place(pid).map(|p| (p.x, p.y)).unwrap_or((0.0, 0.0));
    let targets: Vec<NodeKey> = net.arcs_out(NodeKey::Place(pid)).map(|a| a.to).collect();
    for to in &targets {
        net.remove_arc(NodeKey::Place(pid), *to);
    }

    *synthetic_count += 1;
    let synth = net.add_transition(None, format!("sigma{synthetic_count}"), x, y, 0.0);
    let relay = net.add_place(None, format!("p{pid}_interior"), x, y, tokens);
    net.add_arc(NodeKey::Place(pid), synth, None)
        .expect("fresh arc is well-formed");
    net.add_arc(synth, relay, Some(0.0))
        .expect("fresh arc is well-formed");
    for to in targets {
        net.add_arc(relay, to, None).expect("fresh arc is well-formed");
    }
    if let Some(place) = net.place_mut(pid) {
        place.tokens = 0;
    }
}

/// Move `pid`'s token one hop upstream, so `pid` (adjacent to an output
/// transition) ends up empty while the token it held is preserved one hop
/// further from the boundary.
fn push_token_upstream(net: &mut Net, pid: u32, synthetic_count: &mut usize) {
    let tokens = net.place(pid).map(|p| p.tokens).unwrap_or(0);
    if tokens == 0 {
        return;
    }
    let (x, y) = net.place(pid).map(|p| (p.x, p.y)).unwrap_or((0.0, 0.0));
    let sources: Vec<NodeKey> = net.arcs_in(NodeKey::Place(pid)).map(|a| a.from).collect();
    for from in &sources {
        net.remove_arc(*from, NodeKey::Place(pid));
    }

    let relay = net.add_place(None, format!("p{pid}_interior"), x, y, tokens);
    *synthetic_count += 1;
    let synth = net.add_transition(None, format!("sigma{synthetic_count}"), x, y, 0.0);
    for from in sources {
        net.add_arc(from, relay, None).expect("fresh arc is well-formed");
    }
    net.add_arc(relay, synth, None)
        .expect("fresh arc is well-formed");
    net.add_arc(synth, NodeKey::Place(pid), Some(0.0))
        .expect("fresh arc is well-formed");
    if let Some(place) = net.place_mut(pid) {
        place.tokens = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::event_graph::is_event_graph;
    use petrinet_common::NetType;

    #[test]
    fn isolated_place_with_k_tokens_splits_into_k_places() {
        // spec.md §8: "Single place with k tokens and no arcs: canonical
        // form has k places with one token each and k-1 zero-duration
        // transitions between them."
        let mut net = Net::new("n", NetType::Petri);
        net.add_place(None, "p0", 0.0, 0.0, 3);

        let canon = canonicalize(&net);
        assert_eq!(canon.place_count(), 3);
        assert_eq!(canon.transition_count(), 2);
        assert!(canon.places().all(|p| p.tokens == 1));
    }

    #[test]
    fn boundary_place_loses_its_token_after_canonicalization() {
        let mut net = Net::new("n", NetType::TimedEventGraph);
        let t_in = net.add_transition(None, "in", 0.0, 0.0, 0.0);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 1);
        let t_out = net.add_transition(None, "out", 0.0, 0.0, 0.0);
        net.add_arc(t_in, p0, Some(1.0)).unwrap();
        net.add_arc(p0, t_out, None).unwrap();

        let canon = canonicalize(&net);
        let boundary_in = canon
            .transitions()
            .find(|t| t.caption == "in")
            .map(|t| t.id)
            .unwrap();
        let boundary_place_id = canon
            .arcs_out(NodeKey::Transition(boundary_in))
            .next()
            .unwrap()
            .to
            .id();
        assert_eq!(canon.place(boundary_place_id).unwrap().tokens, 0);
        assert!(canon.places().any(|p| p.tokens == 1));
        assert!(is_event_graph(&canon));
    }

    #[test]
    fn canonicalize_is_idempotent() {
        // spec.md §8: "For event graphs, canonicalize is idempotent."
        let mut net = Net::new("n", NetType::TimedEventGraph);
        let t_in = net.add_transition(None, "in", 0.0, 0.0, 0.0);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 2);
        let t_out = net.add_transition(None, "out", 0.0, 0.0, 0.0);
        net.add_arc(t_in, p0, Some(1.0)).unwrap();
        net.add_arc(p0, t_out, None).unwrap();

        let once = canonicalize(&net);
        let twice = canonicalize(&once);
        assert_eq!(once.place_count(), twice.place_count());
        assert_eq!(once.transition_count(), twice.transition_count());
        assert_eq!(once.arcs().count(), twice.arcs().count());
        assert!(twice.places().all(|p| p.tokens <= 1));
    }
}
