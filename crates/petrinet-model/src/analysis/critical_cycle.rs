//! Bottleneck-cycle analysis for event graphs: run Semi-Howard on the
//! transition adjacency and translate the winning policy back into the
//! net's own arcs (`spec.md` §4.6: "feed the transition graph into Howard;
//! the cycle achieving the maximum mean identifies the system's
//! bottleneck loop. Return the list of arcs on the cycle.").

use petrinet_common::NetError;
use petrinet_maxplus::{semi_howard, HowardResult, Verbosity};

use super::adjacency::{build_adjacency, EventGraphAdjacency};
use crate::net::Net;
use crate::node::NodeKey;

/// The per-token cycle time of a dominant (critical) cycle, and the net's
/// own `Transition -> Place -> Transition` arcs that realize it, in
/// firing order.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalCycle {
    pub cycle_time: f64,
    pub arcs: Vec<(NodeKey, NodeKey)>,
}

/// Find the net's bottleneck loop: the policy-graph component with the
/// largest cycle time among every component Semi-Howard finds, searched
/// automatically rather than requiring the caller to already know a
/// vertex on it (`spec.md` §4.6 — the critical cycle is a global property
/// of the whole transition graph, not of one chosen starting point).
pub fn critical_cycle(net: &Net) -> Result<CriticalCycle, NetError> {
    let adjacency = build_adjacency(net)?;
    let (arcs, weights, delays) = adjacency.to_arc_lists();
    let n = adjacency.order.len();
    let result = semi_howard(&arcs, &weights, &delays, n, Verbosity::Normal)
        .map_err(|e| NetError::InvalidInput(e.to_string()))?;

    let start = (0..n)
        .max_by(|&a, &b| result.chi[a].partial_cmp(&result.chi[b]).unwrap())
        .ok_or_else(|| NetError::InvalidInput("event graph has no transitions".to_string()))?;

    Ok(build_cycle(net, &adjacency, &result, start))
}

/// Compute the critical cycle of the policy-graph component containing
/// `from_transition`, instead of the global maximum-mean component. Useful
/// when a caller already knows which loop they care about.
pub fn critical_cycle_from(net: &Net, from_transition: u32) -> Result<CriticalCycle, NetError> {
    let adjacency = build_adjacency(net)?;
    let (arcs, weights, delays) = adjacency.to_arc_lists();
    let n = adjacency.order.len();
    let result = semi_howard(&arcs, &weights, &delays, n, Verbosity::Normal)
        .map_err(|e| NetError::InvalidInput(e.to_string()))?;

    let start = *adjacency
        .index
        .get(&from_transition)
        .ok_or_else(|| NetError::UnknownNode(format!("T{from_transition}")))?;

    Ok(build_cycle(net, &adjacency, &result, start))
}

fn build_cycle(
    net: &Net,
    adjacency: &EventGraphAdjacency,
    result: &HowardResult,
    start: usize,
) -> CriticalCycle {
    let n = adjacency.order.len();
    let cycle_time = result.chi[start];

    // Walk the optimal policy from `start` until it repeats, which
    // recovers the cycle this vertex belongs to.
    let mut visited = vec![false; n];
    let mut path = Vec::new();
    let mut cur = start;
    while !visited[cur] {
        visited[cur] = true;
        path.push(cur);
        cur = result.policy[cur];
    }
    let split = path.iter().position(|&v| v == cur).unwrap_or(0);
    let cycle_indices = &path[split..];

    let transition_ids: Vec<u32> = cycle_indices
        .iter()
        .map(|&i| adjacency.transition_id_at(i))
        .collect();

    let len = transition_ids.len();
    let mut arcs = Vec::with_capacity(len * 2);
    for i in 0..len {
        let cur_t = transition_ids[i];
        let next_t = transition_ids[(i + 1) % len];
        if let Some(place_id) = connecting_place(net, cur_t, next_t) {
            arcs.push((NodeKey::Transition(cur_t), NodeKey::Place(place_id)));
            arcs.push((NodeKey::Place(place_id), NodeKey::Transition(next_t)));
        }
    }

    CriticalCycle { cycle_time, arcs }
}

/// The single place realizing the event-graph edge `from_t -> to_t`
/// (`spec.md` §4.6: event graph places have exactly one in-arc and one
/// out-arc, so this is unambiguous).
fn connecting_place(net: &Net, from_t: u32, to_t: u32) -> Option<u32> {
    net.arcs_out(NodeKey::Transition(from_t))
        .filter_map(|a| match a.to {
            NodeKey::Place(id) => Some(id),
            NodeKey::Transition(_) => None,
        })
        .find(|&place_id| {
            net.arcs_out(NodeKey::Place(place_id))
                .any(|a| a.to == NodeKey::Transition(to_t))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Net;
    use petrinet_common::NetType;

    fn two_place_cycle() -> Net {
        // spec.md §8 scenario 1: chi = 8.0.
        let mut net = Net::new("n", NetType::TimedEventGraph);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        let t1 = net.add_transition(None, "t1", 0.0, 0.0, 0.0);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 1);
        net.add_arc(t0, p0, Some(3.0)).unwrap();
        net.add_arc(p0, t1, None).unwrap();
        net.add_arc(t1, p1, Some(5.0)).unwrap();
        net.add_arc(p1, t0, None).unwrap();
        net
    }

    #[test]
    fn from_a_known_transition_matches_semi_howard_worked_example() {
        let net = two_place_cycle();
        let cycle = critical_cycle_from(&net, 0).unwrap();
        assert_eq!(cycle.cycle_time, 8.0);
        // T0 -> P0 -> T1 -> P1 -> T0: four real arcs round the loop.
        assert_eq!(cycle.arcs.len(), 4);
        assert_eq!(
            cycle.arcs[0],
            (NodeKey::Transition(0), NodeKey::Place(0))
        );
    }

    #[test]
    fn global_search_finds_the_same_single_component() {
        let net = two_place_cycle();
        let cycle = critical_cycle(&net).unwrap();
        assert_eq!(cycle.cycle_time, 8.0);
        assert_eq!(cycle.arcs.len(), 4);
    }

    #[test]
    fn global_search_picks_the_component_with_the_larger_mean() {
        // Two disconnected self-looped transitions, one place each, with
        // different per-token cycle times; the global search must find the
        // larger one (9.0) without being told where to start.
        let mut net = Net::new("n", NetType::TimedEventGraph);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 1);
        net.add_arc(t0, p0, Some(2.0)).unwrap();
        net.add_arc(p0, t0, None).unwrap();

        let t1 = net.add_transition(None, "t1", 0.0, 0.0, 0.0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 1);
        net.add_arc(t1, p1, Some(9.0)).unwrap();
        net.add_arc(p1, t1, None).unwrap();

        let cycle = critical_cycle(&net).unwrap();
        assert_eq!(cycle.cycle_time, 9.0);
        assert_eq!(
            cycle.arcs,
            vec![
                (NodeKey::Transition(1), NodeKey::Place(1)),
                (NodeKey::Place(1), NodeKey::Transition(1)),
            ]
        );
    }
}
