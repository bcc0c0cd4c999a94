//! PN-editor's four-file binary/text project bundle (`spec.md` §9),
//! grounded on `original_source/src/formats/ExportPnEditor.hpp` byte for
//! byte: a `.pns` file (place token counts, then each transition's
//! out-arc and in-arc place ids, all little-endian `i32`), a `.pnl` file
//! (transition `(x, y)` then place `(x, y)`, little-endian `f32`), a
//! `.pnkp` file (one place caption per line) and a `.pnk` file (one
//! transition caption per line) — the original's comments on the last two
//! swap "places"/"transitions", but this mirrors what the code actually
//! writes, not what it claims to. Export-only.

use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use petrinet_common::NetError;
use petrinet_model::{Net, NodeKey};

/// The four sibling files `exportToPNEditor` used to produce from one
/// `stem.net` path: `stem.pns`, `stem.pnl`, `stem.pnkp`, `stem.pnk`.
pub struct PneditorBundle {
    pub pns: Vec<u8>,
    pub pnl: Vec<u8>,
    pub pnkp: String,
    pub pnk: String,
}

pub fn write_bundle(net: &Net) -> Result<PneditorBundle, NetError> {
    let mut pns = Vec::new();
    pns.write_i32::<LittleEndian>(net.place_count() as i32)
        .map_err(NetError::Io)?;
    for p in net.places() {
        pns.write_i32::<LittleEndian>(p.tokens as i32)
            .map_err(NetError::Io)?;
    }
    pns.write_i32::<LittleEndian>(net.transition_count() as i32)
        .map_err(NetError::Io)?;
    for t in net.transitions() {
        let out_ids: Vec<u32> = net
            .arcs_out(NodeKey::Transition(t.id))
            .map(|a| a.to.id())
            .collect();
        pns.write_i32::<LittleEndian>(out_ids.len() as i32)
            .map_err(NetError::Io)?;
        for id in &out_ids {
            pns.write_i32::<LittleEndian>(*id as i32).map_err(NetError::Io)?;
        }
        let in_ids: Vec<u32> = net
            .arcs_in(NodeKey::Transition(t.id))
            .map(|a| a.from.id())
            .collect();
        pns.write_i32::<LittleEndian>(in_ids.len() as i32)
            .map_err(NetError::Io)?;
        for id in &in_ids {
            pns.write_i32::<LittleEndian>(*id as i32).map_err(NetError::Io)?;
        }
    }

    let mut pnl = Vec::new();
    for t in net.transitions() {
        pnl.write_f32::<LittleEndian>(t.x).map_err(NetError::Io)?;
        pnl.write_f32::<LittleEndian>(t.y).map_err(NetError::Io)?;
    }
    for p in net.places() {
        pnl.write_f32::<LittleEndian>(p.x).map_err(NetError::Io)?;
        pnl.write_f32::<LittleEndian>(p.y).map_err(NetError::Io)?;
    }

    let mut pnkp = String::new();
    for p in net.places() {
        pnkp.push_str(&p.caption);
        pnkp.push('\n');
    }
    let mut pnk = String::new();
    for t in net.transitions() {
        pnk.push_str(&t.caption);
        pnk.push('\n');
    }

    Ok(PneditorBundle { pns, pnl, pnkp, pnk })
}

/// Write the four sibling files `base_path.with_extension(...)` derives
/// (`SPEC_FULL.md` §4.7: the PN-editor bundle "needs to open several
/// sibling paths derived from one base path"): `stem.pns`, `stem.pnl`,
/// `stem.pnkp`, `stem.pnk`.
pub fn write_bundle_to(net: &Net, base_path: &Path) -> Result<(), NetError> {
    let bundle = write_bundle(net)?;
    std::fs::write(base_path.with_extension("pns"), &bundle.pns)?;
    std::fs::write(base_path.with_extension("pnl"), &bundle.pnl)?;
    std::fs::write(base_path.with_extension("pnkp"), &bundle.pnkp)?;
    std::fs::write(base_path.with_extension("pnk"), &bundle.pnk)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::ReadBytesExt;
    use petrinet_common::NetType;
    use std::io::Cursor;

    #[test]
    fn pns_encodes_place_count_tokens_and_transition_arcs() {
        let mut net = Net::new("demo", NetType::Petri);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 2);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        net.add_arc(p0, t0, None).unwrap();

        let bundle = write_bundle(&net).unwrap();
        let mut cursor = Cursor::new(&bundle.pns);
        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), 1); // place count
        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), 2); // p0 tokens
        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), 1); // transition count
        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), 0); // t0 out-arc count
        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), 1); // t0 in-arc count
        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), 0); // from p0
        assert_eq!(bundle.pnkp, "p0\n");
        assert_eq!(bundle.pnk, "t0\n");
    }

    #[test]
    fn write_bundle_to_produces_four_sibling_files() {
        let mut net = Net::new("demo", NetType::Petri);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 2);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        net.add_arc(p0, t0, None).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("stem.net");
        write_bundle_to(&net, &base).unwrap();

        assert!(dir.path().join("stem.pns").exists());
        assert!(dir.path().join("stem.pnl").exists());
        let pnkp = std::fs::read_to_string(dir.path().join("stem.pnkp")).unwrap();
        let pnk = std::fs::read_to_string(dir.path().join("stem.pnk")).unwrap();
        assert_eq!(pnkp, "p0\n");
        assert_eq!(pnk, "t0\n");
    }
}
