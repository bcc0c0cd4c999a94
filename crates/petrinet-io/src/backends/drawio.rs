//! draw.io (`mxfile`/`mxGraphModel`) export (`spec.md` §9): every place
//! and transition becomes an `mxCell` vertex at its stored `(x, y)`, every
//! arc an `mxCell` edge. Export-only, built with `quick_xml::Writer` so
//! element/attribute escaping is handled by the library rather than by
//! hand.

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Writer;

use petrinet_common::NetError;
use petrinet_model::Net;

use crate::traits::NetWriter;

pub struct DrawioFormat;

fn xml_err(e: impl std::fmt::Display) -> NetError {
    NetError::InvalidInput(e.to_string())
}

impl NetWriter for DrawioFormat {
    fn write_net(net: &Net) -> Result<String, NetError> {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;

        let mxfile = BytesStart::new("mxfile");
        writer.write_event(Event::Start(mxfile)).map_err(xml_err)?;

        let model = BytesStart::new("mxGraphModel");
        writer.write_event(Event::Start(model)).map_err(xml_err)?;

        writer
            .write_event(Event::Start(BytesStart::new("root")))
            .map_err(xml_err)?;
        for (id, parent) in [("0", None), ("1", Some("0"))] {
            let mut cell = BytesStart::new("mxCell");
            cell.push_attribute(("id", id));
            if let Some(p) = parent {
                cell.push_attribute(("parent", p));
            }
            writer.write_event(Event::Empty(cell)).map_err(xml_err)?;
        }

        for p in net.places() {
            let id = format!("P{}", p.id);
            let mut cell = BytesStart::new("mxCell");
            cell.push_attribute(("id", id.as_str()));
            cell.push_attribute(("value", p.caption.as_str()));
            cell.push_attribute(("style", "ellipse"));
            cell.push_attribute(("vertex", "1"));
            cell.push_attribute(("parent", "1"));
            writer.write_event(Event::Start(cell)).map_err(xml_err)?;
            let mut geo = BytesStart::new("mxGeometry");
            geo.push_attribute(("x", p.x.to_string().as_str()));
            geo.push_attribute(("y", p.y.to_string().as_str()));
            geo.push_attribute(("width", "40"));
            geo.push_attribute(("height", "40"));
            geo.push_attribute(("as", "geometry"));
            writer.write_event(Event::Empty(geo)).map_err(xml_err)?;
            writer
                .write_event(Event::End(quick_xml::events::BytesEnd::new("mxCell")))
                .map_err(xml_err)?;
        }

        for t in net.transitions() {
            let id = format!("T{}", t.id);
            let mut cell = BytesStart::new("mxCell");
            cell.push_attribute(("id", id.as_str()));
            cell.push_attribute(("value", t.caption.as_str()));
            cell.push_attribute(("style", "rectangle"));
            cell.push_attribute(("vertex", "1"));
            cell.push_attribute(("parent", "1"));
            writer.write_event(Event::Start(cell)).map_err(xml_err)?;
            let mut geo = BytesStart::new("mxGeometry");
            geo.push_attribute(("x", t.x.to_string().as_str()));
            geo.push_attribute(("y", t.y.to_string().as_str()));
            geo.push_attribute(("width", "10"));
            geo.push_attribute(("height", "40"));
            geo.push_attribute(("as", "geometry"));
            writer.write_event(Event::Empty(geo)).map_err(xml_err)?;
            writer
                .write_event(Event::End(quick_xml::events::BytesEnd::new("mxCell")))
                .map_err(xml_err)?;
        }

        for (i, a) in net.arcs().enumerate() {
            let id = format!("e{i}");
            let from = a.from.to_key_string();
            let to = a.to.to_key_string();
            let mut cell = BytesStart::new("mxCell");
            cell.push_attribute(("id", id.as_str()));
            cell.push_attribute(("style", "edgeStyle=orthogonalEdgeStyle"));
            cell.push_attribute(("edge", "1"));
            cell.push_attribute(("parent", "1"));
            cell.push_attribute(("source", from.as_str()));
            cell.push_attribute(("target", to.as_str()));
            writer.write_event(Event::Empty(cell)).map_err(xml_err)?;
        }

        writer
            .write_event(Event::End(quick_xml::events::BytesEnd::new("root")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(quick_xml::events::BytesEnd::new("mxGraphModel")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(quick_xml::events::BytesEnd::new("mxfile")))
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
    fn emits_mxfile_with_one_vertex_per_node() {
        let mut net = Net::new("demo", NetType::Petri);
        let p0 = net.add_place(None, "p0", 10.0, 20.0, 0);
        let t0 = net.add_transition(None, "t0", 30.0, 40.0, 0.0);
        net.add_arc(p0, t0, None).unwrap();

        let xml = DrawioFormat::write_net(&net).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<mxfile>"));
        assert!(xml.contains("id=\"P0\""));
        assert!(xml.contains("id=\"T0\""));
        assert!(xml.contains("source=\"P0\""));
    }
}
