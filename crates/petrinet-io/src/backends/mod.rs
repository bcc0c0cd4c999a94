//! One module per on-disk representation (`spec.md` §4.7), each behind its
//! own Cargo feature so a consumer only pulls in the parsers/serializers
//! it actually needs.

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "pnml")]
pub mod pnml;

#[cfg(feature = "graphviz")]
pub mod graphviz;

#[cfg(feature = "drawio")]
pub mod drawio;

#[cfg(feature = "latex")]
pub mod latex;

#[cfg(feature = "pneditor")]
pub mod pneditor;

#[cfg(feature = "grafcet_cpp")]
pub mod grafcet_cpp;

#[cfg(feature = "symfony")]
pub mod symfony;

#[cfg(feature = "codesys")]
pub mod codesys;

#[cfg(feature = "julia")]
pub mod julia;

#[cfg(feature = "flowshop")]
pub mod flowshop;

#[cfg(feature = "timed_event_graph")]
pub mod timed_event_graph;
