//! Graphviz DOT export (`spec.md` §9): places as circles, transitions as
//! bars, arc labels carrying duration for timed nets. Export-only — DOT
//! has no standard way back to a typed net.

use petrinet_common::NetType;
use petrinet_model::Net;

use crate::traits::NetWriter;

pub struct GraphvizFormat;

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

impl NetWriter for GraphvizFormat {
    fn write_net(net: &Net) -> Result<String, petrinet_common::NetError> {
        let mut out = String::new();
        out.push_str(&format!("digraph \"{}\" {{\n", escape(net.name())));
        out.push_str("  rankdir=LR;\n");
        for p in net.places() {
            let label = if p.tokens > 0 {
                format!("{} [{}]", p.caption, p.tokens)
            } else {
                p.caption.clone()
            };
            out.push_str(&format!(
                "  \"P{}\" [shape=circle, label=\"{}\"];\n",
                p.id,
                escape(&label)
            ));
        }
        for t in net.transitions() {
            out.push_str(&format!(
                "  \"T{}\" [shape=box, label=\"{}\"];\n",
                t.id,
                escape(&t.caption)
            ));
        }
        for a in net.arcs() {
            let label = if net.ty() != NetType::Petri && !a.duration.is_nan() {
                format!(" [label=\"{}\"]", a.duration)
            } else {
                String::new()
            };
            out.push_str(&format!("  \"{}\" -> \"{}\"{};\n", a.from, a.to, label));
        }
        out.push_str("}\n");
        Ok(out)
    }
}
