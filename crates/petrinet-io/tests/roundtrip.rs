//! Round-trip coverage for the format pairs that both import and export
//! (`spec.md` §8: "JSON export then JSON import is the identity on the
//! net"). Each format lives behind its own Cargo feature, so this file
//! only exercises the formats enabled for the current `cargo test`
//! invocation; run with `--features all-formats` for full coverage.
//!
//! `SPEC_FULL.md` §8 places round-trip coverage in one `tests/`
//! integration file per importer-pair; these three formats (JSON, PNML,
//! timed event graph text) are the only importer+exporter pairs this
//! core ships (`spec.md` §4.7 — the rest are import-only or export-only),
//! so they share this one file rather than being split further.

use std::io::Write;

use petrinet_common::NetType;
use petrinet_io::{NetReader, NetWriter};
use petrinet_model::Net;

fn sample_net() -> Net {
    let mut net = Net::new("roundtrip-demo", NetType::TimedPetri);
    let p0 = net.add_place(None, "P0", 1.0, 2.0, 1);
    let t0 = net.add_transition(None, "T0", 3.0, 4.0, 0.0);
    let p1 = net.add_place(None, "P1", 5.0, 6.0, 0);
    net.add_arc(p0, t0, None).unwrap();
    net.add_arc(t0, p1, Some(2.5)).unwrap();
    net
}

#[cfg(feature = "json")]
#[test]
fn json_round_trip_is_identity_up_to_field_order() {
    use petrinet_io::JsonFormat;

    let net = sample_net();
    let text = JsonFormat::write_net(&net).unwrap();
    let parsed = JsonFormat::read_net(&text).unwrap();

    assert_eq!(parsed.name(), net.name());
    assert_eq!(parsed.ty(), net.ty());
    assert_eq!(parsed.place_count(), net.place_count());
    assert_eq!(parsed.transition_count(), net.transition_count());
    assert_eq!(parsed.arcs().count(), net.arcs().count());
    for (original, round_tripped) in net.places().zip(parsed.places()) {
        assert_eq!(original.caption, round_tripped.caption);
        assert_eq!(original.tokens, round_tripped.tokens);
    }

    // re-exporting the round-tripped net produces the same text again.
    let text2 = JsonFormat::write_net(&parsed).unwrap();
    assert_eq!(text, text2);
}

#[cfg(feature = "json")]
#[test]
fn json_round_trips_through_a_file_on_disk() {
    use petrinet_io::JsonFormat;

    let net = sample_net();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", JsonFormat::write_net(&net).unwrap()).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let parsed = JsonFormat::read_net(&text).unwrap();
    assert_eq!(parsed.name(), net.name());
    assert_eq!(parsed.arcs().count(), net.arcs().count());
}

#[cfg(feature = "pnml")]
#[test]
fn pnml_round_trip_preserves_structure() {
    use petrinet_io::PnmlFormat;

    let net = sample_net();
    let xml = PnmlFormat::write_net(&net).unwrap();
    let parsed = PnmlFormat::read_net(&xml).unwrap();

    assert_eq!(parsed.place_count(), net.place_count());
    assert_eq!(parsed.transition_count(), net.transition_count());
    assert_eq!(parsed.arcs().count(), net.arcs().count());
    assert_eq!(parsed.place(0).unwrap().tokens, 1);
}

#[cfg(feature = "timed_event_graph")]
#[test]
fn timed_event_graph_round_trip_preserves_adjacency() {
    use petrinet_io::TimedEventGraphFormat;

    // sample_net() is not an event graph (P0 has no in-arc); build one
    // directly, matching spec.md §8 scenario 1's two-place cycle.
    let mut net = Net::new("n", NetType::TimedEventGraph);
    let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
    let t1 = net.add_transition(None, "t1", 0.0, 0.0, 0.0);
    let p0 = net.add_place(None, "p0", 0.0, 0.0, 0);
    let p1 = net.add_place(None, "p1", 0.0, 0.0, 1);
    net.add_arc(t0, p0, Some(3.0)).unwrap();
    net.add_arc(p0, t1, None).unwrap();
    net.add_arc(t1, p1, Some(5.0)).unwrap();
    net.add_arc(p1, t0, None).unwrap();

    let text = TimedEventGraphFormat::write_net(&net).unwrap();
    let parsed = TimedEventGraphFormat::read_net(&text).unwrap();
    let text2 = TimedEventGraphFormat::write_net(&parsed).unwrap();

    assert_eq!(parsed.transition_count(), net.transition_count());
    assert_eq!(parsed.place_count(), net.place_count());
    assert_eq!(text, text2);
}
