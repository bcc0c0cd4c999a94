//! The structural test a net must pass before Howard/Semi-Howard apply
//! (`spec.md` §4.6): every place has exactly one in-arc and one out-arc.

use petrinet_common::NetError;

use crate::net::Net;
use crate::node::NodeKey;

/// Check that `net` is a (timed) event graph. On failure, every place that
/// violates the one-in/one-out rule contributes its incident arcs to
/// [`NetError::NotAnEventGraph`]'s offending list.
pub fn check_event_graph(net: &Net) -> Result<(), NetError> {
    let mut offending = Vec::new();
    for place in net.places() {
        let key = NodeKey::Place(place.id);
        let in_arcs: Vec<_> = net.arcs_in(key).collect();
        let out_arcs: Vec<_> = net.arcs_out(key).collect();
        if in_arcs.len() == 1 && out_arcs.len() == 1 {
            continue;
        }
        if in_arcs.is_empty() && out_arcs.is_empty() {
            // an isolated place has no incident arc to report; name the
            // place itself so the violation is still visible.
            let k = key.to_key_string();
            offending.push((k.clone(), k));
            continue;
        }
        for arc in in_arcs {
            offending.push((arc.from.to_key_string(), arc.to.to_key_string()));
        }
        for arc in out_arcs {
            offending.push((arc.from.to_key_string(), arc.to.to_key_string()));
        }
    }
    if offending.is_empty() {
        Ok(())
    } else {
        Err(NetError::NotAnEventGraph { offending })
    }
}

pub fn is_event_graph(net: &Net) -> bool {
    check_event_graph(net).is_ok()
}
