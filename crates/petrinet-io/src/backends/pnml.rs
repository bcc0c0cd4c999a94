//! PNML (ISO/IEC 15909-2) import/export, restricted to the place/transition
//! net subset this core models: `<place>`/`<transition>` elements with a
//! `<name><text>` and, for places, an `<initialMarking><text>`, plus
//! `<arc source="..." target="...">` elements (`spec.md` §9).
//!
//! Grounded on `quick_xml`'s pull-parser style (the teacher's stack has no
//! XML backend; `quick-xml` is the standard serde-ecosystem choice, same
//! tier as the `serde_yaml` the teacher already depends on).

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use petrinet_common::{NetError, NetType};
use petrinet_model::Net;

use crate::traits::{NetReader, NetWriter};

pub struct PnmlFormat;

struct PendingNode {
    kind: &'static str,
    id: String,
    name: String,
    marking: u64,
    source: String,
    target: String,
}

fn attr_value(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if a.key.as_ref() == key {
            Some(String::from_utf8_lossy(&a.value).to_string())
        } else {
            None
        }
    })
}

impl NetReader for PnmlFormat {
    fn read_net(source: &str) -> Result<Net, NetError> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut net = Net::new("imported", NetType::Petri);
        let mut place_ids: HashMap<String, u32> = HashMap::new();
        let mut transition_ids: HashMap<String, u32> = HashMap::new();
        let mut next_place = 0u32;
        let mut next_transition = 0u32;

        let mut stack: Vec<String> = Vec::new();
        let mut current: Option<PendingNode> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| NetError::InvalidInput(e.to_string()))?;
            match event {
                Event::Eof => break,
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "place" | "transition" => {
                            let id = attr_value(&e, b"id").ok_or_else(|| {
                                NetError::InvalidInput(format!("{name} missing id attribute"))
                            })?;
                            current = Some(PendingNode {
                                kind: if name == "place" { "place" } else { "transition" },
                                id,
                                name: String::new(),
                                marking: 0,
                                source: String::new(),
                                target: String::new(),
                            });
                        }
                        "arc" => {
                            let id = attr_value(&e, b"id").unwrap_or_default();
                            let source = attr_value(&e, b"source")
                                .ok_or_else(|| NetError::InvalidInput("arc missing source".into()))?;
                            let target = attr_value(&e, b"target")
                                .ok_or_else(|| NetError::InvalidInput("arc missing target".into()))?;
                            current = Some(PendingNode {
                                kind: "arc",
                                id,
                                name: String::new(),
                                marking: 0,
                                source,
                                target,
                            });
                        }
                        _ => {}
                    }
                    stack.push(name);
                }
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| NetError::InvalidInput(e.to_string()))?
                        .to_string();
                    if let Some(cur) = current.as_mut() {
                        let parent = stack.len().checked_sub(2).and_then(|i| stack.get(i));
                        match parent.map(|s| s.as_str()) {
                            Some("name") => cur.name = text,
                            Some("initialMarking") => {
                                cur.marking = text.trim().parse().unwrap_or(0)
                            }
                            _ => {}
                        }
                    }
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if matches!(name.as_str(), "place" | "transition" | "arc") {
                        if let Some(node) = current.take() {
                            match node.kind {
                                "place" => {
                                    let key = net.add_place(
                                        Some(next_place),
                                        if node.name.is_empty() { node.id.clone() } else { node.name },
                                        0.0,
                                        0.0,
                                        node.marking,
                                    );
                                    place_ids.insert(node.id, key.id());
                                    next_place += 1;
                                }
                                "transition" => {
                                    let key = net.add_transition(
                                        Some(next_transition),
                                        if node.name.is_empty() { node.id.clone() } else { node.name },
                                        0.0,
                                        0.0,
                                        0.0,
                                    );
                                    transition_ids.insert(node.id, key.id());
                                    next_transition += 1;
                                }
                                _ => {
                                    let from = resolve(&place_ids, &transition_ids, &node.source)?;
                                    let to = resolve(&place_ids, &transition_ids, &node.target)?;
                                    net.add_arc(from, to, None)?;
                                }
                            }
                        }
                    }
                    stack.pop();
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(net)
    }
}

fn resolve(
    place_ids: &HashMap<String, u32>,
    transition_ids: &HashMap<String, u32>,
    id: &str,
) -> Result<petrinet_model::NodeKey, NetError> {
    if let Some(&pid) = place_ids.get(id) {
        return Ok(petrinet_model::NodeKey::Place(pid));
    }
    if let Some(&tid) = transition_ids.get(id) {
        return Ok(petrinet_model::NodeKey::Transition(tid));
    }
    Err(NetError::UnknownNode(id.to_string()))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl NetWriter for PnmlFormat {
    fn write_net(net: &Net) -> Result<String, NetError> {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<pnml><net id=\"{}\" type=\"http://www.pnml.org/version-2009/grammar/ptnet\">\n",
            escape(net.name())
        ));
        for p in net.places() {
            out.push_str(&format!(
                "  <place id=\"P{}\"><name><text>{}</text></name><initialMarking><text>{}</text></initialMarking></place>\n",
                p.id, escape(&p.caption), p.tokens
            ));
        }
        for t in net.transitions() {
            out.push_str(&format!(
                "  <transition id=\"T{}\"><name><text>{}</text></name></transition>\n",
                t.id, escape(&t.caption)
            ));
        }
        for (i, a) in net.arcs().enumerate() {
            out.push_str(&format!(
                "  <arc id=\"a{}\" source=\"{}\" target=\"{}\"/>\n",
                i, a.from, a.to
            ));
        }
        out.push_str("</net></pnml>\n");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrinet_common::NetType;
    use petrinet_model::Net;

    #[test]
    fn round_trips_place_transition_arc() {
        let mut net = Net::new("demo", NetType::Petri);
        let p0 = net.add_place(None, "ready", 0.0, 0.0, 1);
        let t0 = net.add_transition(None, "go", 0.0, 0.0, 0.0);
        net.add_arc(p0, t0, None).unwrap();

        let xml = PnmlFormat::write_net(&net).unwrap();
        let parsed = PnmlFormat::read_net(&xml).unwrap();

        assert_eq!(parsed.place_count(), 1);
        assert_eq!(parsed.transition_count(), 1);
        assert_eq!(parsed.arcs().count(), 1);
        assert_eq!(parsed.place(0).unwrap().tokens, 1);
        assert_eq!(parsed.place(0).unwrap().caption, "ready");
    }
}
