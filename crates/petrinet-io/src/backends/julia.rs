//! Julia/MaxPlus script export (`spec.md` §9), grounded on
//! `original_source/src/formats/ExportJulia.hpp`: canonicalizes the net,
//! emits input/state/output transition labels as comments, the two
//! transition-adjacency matrices `N` (tokens) and `T` (durations) as
//! `sparse(I, J, V, m, n)` triplets, the dater/counter equations as
//! comments, and the `D, A, B, C` state-space matrices feeding
//! `S = MPSysLin(A, B, C, D)`. Export-only.

use petrinet_common::NetError;
use petrinet_model::analysis::{
    build_adjacency, build_linear_system, canonicalize, counter_equations, dater_equations,
};
use petrinet_model::Net;

use crate::traits::NetWriter;

pub struct JuliaFormat;

impl NetWriter for JuliaFormat {
    fn write_net(net: &Net) -> Result<String, NetError> {
        let canonical = canonicalize(net);

        let mut out = String::new();
        out.push_str("# This file has been generated\n\n");
        out.push_str("using MaxPlus, SparseArrays\n\n");
        out.push_str("## Petri Transitions:\n");

        let mut nb_inputs = 0usize;
        for t in canonical.transitions() {
            if canonical.is_input(t.id) {
                nb_inputs += 1;
                out.push_str(&format!("# T{}: input (U{})\n", t.id, nb_inputs));
            }
        }
        let mut nb_states = 0usize;
        for t in canonical.transitions() {
            if !canonical.is_input(t.id) && !canonical.is_output(t.id) {
                nb_states += 1;
                out.push_str(&format!("# T{}: state (X{})\n", t.id, nb_states));
            }
        }
        let mut nb_outputs = 0usize;
        for t in canonical.transitions() {
            if canonical.is_output(t.id) {
                nb_outputs += 1;
                out.push_str(&format!("# T{}: output (Y{})\n", t.id, nb_outputs));
            }
        }

        out.push_str("\n## Timed event graph as two transition-adjacency matrices:\n");
        out.push_str("# Nodes are transitions, arcs are the collapsed places.\n");
        let adjacency = build_adjacency(&canonical)?;
        out.push_str(&adjacency.delays.to_julia_triplets("N")); // Tokens
        out.push_str(&adjacency.weights.to_julia_triplets("T")); // Durations

        out.push('\n');
        for line in dater_equations(&canonical)? {
            out.push_str(&format!("# {line}\n"));
        }
        out.push('\n');
        for line in counter_equations(&canonical)? {
            out.push_str(&format!("# {line}\n"));
        }

        out.push_str("\n## Max-Plus implicit linear dynamic system of the dater form:\n");
        out.push_str("# X(n) = D X(n) (+) A X(n-1) (+) B U(n)\n");
        out.push_str("# Y(n) = C X(n)\n");
        let system = build_linear_system(&canonical)?;
        out.push_str(&system.d.to_julia_triplets("D"));
        out.push_str(&system.a.to_julia_triplets("A"));
        out.push_str(&system.b.to_julia_triplets("B"));
        out.push_str(&system.c.to_julia_triplets("C"));
        out.push_str("S = MPSysLin(A, B, C, D)\n");

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrinet_common::NetType;
    use petrinet_model::Net;

    #[test]
    fn emits_sparse_triplets_and_syslin_call() {
        let mut net = Net::new("n", NetType::TimedEventGraph);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        let t1 = net.add_transition(None, "t1", 0.0, 0.0, 0.0);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 1);
        net.add_arc(t0, p0, Some(3.0)).unwrap();
        net.add_arc(p0, t1, None).unwrap();
        net.add_arc(t1, p1, Some(5.0)).unwrap();
        net.add_arc(p1, t0, None).unwrap();

        let text = JuliaFormat::write_net(&net).unwrap();
        assert!(text.contains("using MaxPlus, SparseArrays"));
        assert!(text.contains("sparse(NI, NJ, NV"));
        assert!(text.contains("sparse(TI, TJ, TV"));
        assert!(text.contains("S = MPSysLin(A, B, C, D)"));
    }

    #[test]
    fn rejects_a_net_that_is_not_an_event_graph() {
        let mut net = Net::new("n", NetType::Petri);
        net.add_place(None, "isolated", 0.0, 0.0, 1);
        assert!(JuliaFormat::write_net(&net).is_err());
    }
}
