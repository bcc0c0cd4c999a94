//! LaTeX/TikZ export (`spec.md` §9): a `tikzpicture` with one `\node` per
//! place/transition and one `\draw` per arc, scaled from the stored
//! `(x, y)` coordinates. Export-only.

use petrinet_common::NetError;
use petrinet_model::Net;

use crate::traits::NetWriter;

pub struct LatexFormat;

const SCALE: f32 = 0.02;

fn tex_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('&', "\\&")
        .replace('_', "\\_")
        .replace('#', "\\#")
}

impl NetWriter for LatexFormat {
    fn write_net(net: &Net) -> Result<String, NetError> {
        let mut out = String::new();
        out.push_str("\\begin{tikzpicture}[>=stealth]\n");
        for p in net.places() {
            out.push_str(&format!(
                "  \\node[circle,draw] (P{}) at ({:.2},{:.2}) {{{}}};\n",
                p.id,
                p.x * SCALE,
                -p.y * SCALE,
                tex_escape(&p.caption)
            ));
            if p.tokens > 0 {
                out.push_str(&format!(
                    "  \\node at (P{}) {{\\tiny {}}};\n",
                    p.id, p.tokens
                ));
            }
        }
        for t in net.transitions() {
            out.push_str(&format!(
                "  \\node[rectangle,draw,fill=black,minimum width=2pt] (T{}) at ({:.2},{:.2}) {{}};\n",
                t.id,
                t.x * SCALE,
                -t.y * SCALE
            ));
            if !t.caption.is_empty() {
                out.push_str(&format!(
                    "  \\node[above] at (T{}) {{{}}};\n",
                    t.id,
                    tex_escape(&t.caption)
                ));
            }
        }
        for a in net.arcs() {
            out.push_str(&format!("  \\draw[->] ({}) -- ({});\n", a.from, a.to));
        }
        out.push_str("\\end{tikzpicture}\n");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrinet_common::NetType;
    use petrinet_model::Net;

    #[test]
    fn emits_a_tikzpicture_with_one_node_per_element() {
        let mut net = Net::new("demo", NetType::Petri);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 1);
        let t0 = net.add_transition(None, "t0", 100.0, 0.0, 0.0);
        net.add_arc(p0, t0, None).unwrap();

        let tex = LatexFormat::write_net(&net).unwrap();
        assert!(tex.starts_with("\\begin{tikzpicture}"));
        assert!(tex.contains("(P0)"));
        assert!(tex.contains("(T0)"));
        assert!(tex.contains("\\draw[->] (P0) -- (T0);"));
    }
}
