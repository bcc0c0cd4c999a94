//! CODESYS PLCopen XML export (`spec.md` §9), grounded on
//! `original_source/src/formats/ExportCoDeSys.hpp`: a `pou` of type
//! `program` containing an SFC body, one `<step>` per place
//! (`initialStep` set from the marking) and, per transition, an
//! `<inVariable>` carrying the receptivity expression feeding a
//! `<transition><condition>`. The original hardcodes its `connection`
//! `refLocalId`s; this rewires them from the net's actual arcs so the
//! generated SFC is internally consistent. Export-only.

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::Writer;

use petrinet_common::NetError;
use petrinet_model::{Net, NodeKey};

use crate::traits::NetWriter;

pub struct CodesysFormat;

fn xml_err(e: impl std::fmt::Display) -> NetError {
    NetError::InvalidInput(e.to_string())
}

/// `localId`s are drawn from a shared counter above the highest node id so
/// steps, transitions and their receptivities never collide.
fn recept_local_id(net: &Net, transition_id: u32) -> u32 {
    let base = net
        .places()
        .map(|p| p.id)
        .chain(net.transitions().map(|t| t.id))
        .max()
        .map_or(0, |m| m + 1);
    base + transition_id
}

impl NetWriter for CodesysFormat {
    fn write_net(net: &Net) -> Result<String, NetError> {
        let mut buf = Vec::new();
        let mut w = Writer::new_with_indent(&mut buf, b' ', 2);

        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_err)?;

        let mut project = BytesStart::new("project");
        project.push_attribute(("xmlns", "http://www.plcopen.org/xml/tc6_0200"));
        w.write_event(Event::Start(project.clone())).map_err(xml_err)?;

        let mut pou = BytesStart::new("pou");
        pou.push_attribute(("name", "PLC_PRG"));
        pou.push_attribute(("pouType", "program"));
        w.write_event(Event::Start(pou.clone())).map_err(xml_err)?;

        w.write_event(Event::Start(BytesStart::new("body"))).map_err(xml_err)?;
        w.write_event(Event::Start(BytesStart::new("SFC"))).map_err(xml_err)?;

        for p in net.places() {
            let mut step = BytesStart::new("step");
            step.push_attribute(("localId", p.id.to_string().as_str()));
            step.push_attribute((
                "initialStep",
                if p.tokens > 0 { "true" } else { "false" },
            ));
            step.push_attribute(("name", p.caption.as_str()));
            w.write_event(Event::Start(step)).map_err(xml_err)?;
            w.write_event(Event::End(quick_xml::events::BytesEnd::new("step")))
                .map_err(xml_err)?;
        }

        for t in net.transitions() {
            let recept_id = recept_local_id(net, t.id);

            let mut in_var = BytesStart::new("inVariable");
            in_var.push_attribute(("localId", recept_id.to_string().as_str()));
            w.write_event(Event::Start(in_var)).map_err(xml_err)?;
            w.write_event(Event::Start(BytesStart::new("expression")))
                .map_err(xml_err)?;
            let expression = if t.caption.is_empty() { "TRUE" } else { &t.caption };
            w.write_event(Event::Text(BytesText::new(expression))).map_err(xml_err)?;
            w.write_event(Event::End(quick_xml::events::BytesEnd::new("expression")))
                .map_err(xml_err)?;
            w.write_event(Event::End(quick_xml::events::BytesEnd::new("inVariable")))
                .map_err(xml_err)?;

            let mut transition = BytesStart::new("transition");
            transition.push_attribute(("localId", t.id.to_string().as_str()));
            w.write_event(Event::Start(transition)).map_err(xml_err)?;

            w.write_event(Event::Start(BytesStart::new("connectionPointIn")))
                .map_err(xml_err)?;
            for a in net.arcs_in(NodeKey::Transition(t.id)) {
                let mut conn = BytesStart::new("connection");
                conn.push_attribute(("refLocalId", a.from.id().to_string().as_str()));
                w.write_event(Event::Empty(conn)).map_err(xml_err)?;
            }
            w.write_event(Event::End(quick_xml::events::BytesEnd::new("connectionPointIn")))
                .map_err(xml_err)?;

            w.write_event(Event::Start(BytesStart::new("condition")))
                .map_err(xml_err)?;
            let mut conn = BytesStart::new("connection");
            conn.push_attribute(("refLocalId", recept_id.to_string().as_str()));
            w.write_event(Event::Empty(conn)).map_err(xml_err)?;
            w.write_event(Event::End(quick_xml::events::BytesEnd::new("condition")))
                .map_err(xml_err)?;

            w.write_event(Event::End(quick_xml::events::BytesEnd::new("transition")))
                .map_err(xml_err)?;
        }

        w.write_event(Event::End(quick_xml::events::BytesEnd::new("SFC"))).map_err(xml_err)?;
        w.write_event(Event::End(quick_xml::events::BytesEnd::new("body"))).map_err(xml_err)?;
        w.write_event(Event::End(quick_xml::events::BytesEnd::new("pou"))).map_err(xml_err)?;
        w.write_event(Event::End(quick_xml::events::BytesEnd::new("project")))
            .map_err(xml_err)?;

        String::from_utf8(buf).map_err(xml_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrinet_common::NetType;
    use petrinet_model::Net;

    #[test]
    fn emits_one_step_per_place_and_a_condition_per_transition() {
        let mut net = Net::new("demo", NetType::Grafcet);
        let p0 = net.add_place(None, "idle", 0.0, 0.0, 1);
        let t0 = net.add_transition(None, "Dcy", 0.0, 0.0, 0.0);
        net.add_arc(p0, t0, None).unwrap();

        let xml = CodesysFormat::write_net(&net).unwrap();
        assert!(xml.contains("<project xmlns=\"http://www.plcopen.org/xml/tc6_0200\">"));
        assert!(xml.contains("initialStep=\"true\""));
        assert!(xml.contains("<expression>Dcy</expression>"));
    }
}
