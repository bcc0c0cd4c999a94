//! Textual dater/counter equations for an event graph (`spec.md` §4.6,
//! §4.7): the same Max-Plus state-space the adjacency module builds,
//! rendered as the two classical algebraic forms instead of as matrices.
//!
//! For a place between transition `i` and transition `j` carrying `m`
//! tokens and duration `d`, firing `j` for the `k`-th time needs `i`'s
//! `(k - m)`-th firing to have happened at least `d` time units earlier:
//! `x_j(k) = max_i (d + x_i(k - m))`. The counter form is the dual,
//! swapping `max`/`+` for `min`/`-` and counting firings up to time `t`.

use petrinet_common::NetError;

use super::event_graph::check_event_graph;
use crate::net::Net;
use crate::node::NodeKey;

struct Term {
    source: u32,
    duration: f32,
    tokens: u64,
}

fn incoming_terms(net: &Net, transition_id: u32) -> Vec<Term> {
    net.arcs_in(NodeKey::Transition(transition_id))
        .map(|arc| {
            let place_id = arc.from.id();
            let place = net.place(place_id).expect("place referenced by arc exists");
            let duration = net
                .arcs_in(NodeKey::Place(place_id))
                .next()
                .map(|a| a.effective_duration())
                .unwrap_or(0.0);
            let source = net
                .arcs_in(NodeKey::Place(place_id))
                .next()
                .expect("event graph place has exactly one in-arc")
                .from
                .id();
            Term {
                source,
                duration,
                tokens: place.tokens,
            }
        })
        .collect()
}

/// `x_j(k) = max_i (duration + x_i(k - tokens))` for every transition `j`.
pub fn dater_equations(net: &Net) -> Result<Vec<String>, NetError> {
    check_event_graph(net)?;
    let mut lines = Vec::new();
    for transition in net.transitions() {
        let terms = incoming_terms(net, transition.id);
        if terms.is_empty() {
            continue;
        }
        let rhs = terms
            .iter()
            .map(|t| format!("{} + x{}(k - {})", fmt_f32(t.duration), t.source, t.tokens))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("x{}(k) = max({})", transition.id, rhs));
    }
    Ok(lines)
}

/// `k_j(t) = min_i (tokens + k_i(t - duration))`, the counter-form dual of
/// [`dater_equations`].
pub fn counter_equations(net: &Net) -> Result<Vec<String>, NetError> {
    check_event_graph(net)?;
    let mut lines = Vec::new();
    for transition in net.transitions() {
        let terms = incoming_terms(net, transition.id);
        if terms.is_empty() {
            continue;
        }
        let rhs = terms
            .iter()
            .map(|t| format!("{} + k{}(t - {})", t.tokens, t.source, fmt_f32(t.duration)))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("k{}(t) = min({})", transition.id, rhs));
    }
    Ok(lines)
}

fn fmt_f32(v: f32) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}
