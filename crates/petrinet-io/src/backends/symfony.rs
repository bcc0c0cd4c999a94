//! Symfony Workflow YAML export (`spec.md` §9), grounded on
//! `original_source/src/formats/ExportSymfony.hpp`: a
//! `framework.workflows.<name>` block with `places`, `initial_marking`
//! (captions of places holding a token) and one `from`/`to` list per
//! transition, keyed by place caption rather than id. Export-only; the
//! original never implements an importer for this format either.

use petrinet_common::NetError;
use petrinet_model::{Net, NodeKey};

use crate::traits::NetWriter;

pub struct SymfonyFormat;

impl NetWriter for SymfonyFormat {
    fn write_net(net: &Net) -> Result<String, NetError> {
        let mut out = String::new();
        out.push_str("framework:\n    workflows:\n");
        out.push_str(&format!("        {}:\n", net.name()));
        out.push_str("            type: 'workflow'\n");
        out.push_str("            audit_trail:\n                enabled: true\n");
        out.push_str("            marking_store:\n                type: 'method'\n                property: 'currentPlace'\n");

        out.push_str("            initial_marking:\n");
        for p in net.places() {
            if p.tokens > 0 {
                out.push_str(&format!("                - {}\n", p.caption));
            }
        }

        out.push_str("            places:\n");
        for p in net.places() {
            out.push_str(&format!("                - {}\n", p.caption));
        }

        out.push_str("            transitions:\n");
        for t in net.transitions() {
            out.push_str(&format!("                {}:\n", t.caption));
            out.push_str("                    from:\n");
            for a in net.arcs_in(NodeKey::Transition(t.id)) {
                let place = net.place(a.from.id()).expect("arc endpoint exists");
                out.push_str(&format!("                        - {}\n", place.caption));
            }
            out.push_str("                    to:\n");
            for a in net.arcs_out(NodeKey::Transition(t.id)) {
                let place = net.place(a.to.id()).expect("arc endpoint exists");
                out.push_str(&format!("                        - {}\n", place.caption));
            }
        }

        Ok(out)
    }
}
