//! Import/export backends for the Petri-net/GRAFCET core (`spec.md` §4.7,
//! §9: "keep each format behind a two-function interface `{read, write}`;
//! the editor resolves by extension"). [`NetReader`]/[`NetWriter`] are that
//! interface; each backend module implements one or both for the format it
//! covers, gated behind a matching Cargo feature so a consumer only
//! compiles in the parsers/serializers it needs.

pub mod backends;
pub mod traits;

pub use traits::{NetReader, NetWriter};

#[cfg(feature = "json")]
pub use backends::json::{json_schema, read_nets, write_nets, JsonFormat, NetDocument, NetFileDocument};

#[cfg(feature = "pnml")]
pub use backends::pnml::PnmlFormat;

#[cfg(feature = "graphviz")]
pub use backends::graphviz::GraphvizFormat;

#[cfg(feature = "drawio")]
pub use backends::drawio::DrawioFormat;

#[cfg(feature = "latex")]
pub use backends::latex::LatexFormat;

#[cfg(feature = "pneditor")]
pub use backends::pneditor::{
    write_bundle as write_pneditor_bundle, write_bundle_to as write_pneditor_bundle_to,
    PneditorBundle,
};

#[cfg(feature = "grafcet_cpp")]
pub use backends::grafcet_cpp::GrafcetCppFormat;

#[cfg(feature = "symfony")]
pub use backends::symfony::SymfonyFormat;

#[cfg(feature = "codesys")]
pub use backends::codesys::CodesysFormat;

#[cfg(feature = "julia")]
pub use backends::julia::JuliaFormat;

#[cfg(feature = "flowshop")]
pub use backends::flowshop::FlowshopFormat;

#[cfg(feature = "timed_event_graph")]
pub use backends::timed_event_graph::TimedEventGraphFormat;
