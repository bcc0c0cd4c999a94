//! Meta crate that re-exports the Petri-net/GRAFCET building blocks with
//! sensible defaults. Downstream users can depend on this crate and opt
//! into individual format backends via feature flags while keeping access
//! to the underlying crates when deeper integration is required.

#[cfg(feature = "common")]
pub use petrinet_common as common;

#[cfg(feature = "expr")]
pub use petrinet_expr as expr;

#[cfg(feature = "maxplus")]
pub use petrinet_maxplus as maxplus;

#[cfg(feature = "model")]
pub use petrinet_model as model;

#[cfg(feature = "io")]
pub use petrinet_io as io;

#[cfg(feature = "model")]
pub use petrinet_model::{
    analysis, Arc, GrafcetIo, Message, MessageLevel, Net, NetError, NetType, NodeKey, NodeKind,
    NodeRef, NullIo, Place, SimState, Simulator, Transition,
};

#[cfg(feature = "io")]
pub use petrinet_io::{NetReader, NetWriter};

#[cfg(feature = "json")]
pub use petrinet_io::{json_schema, read_nets, write_nets, JsonFormat, NetDocument, NetFileDocument};

#[cfg(feature = "pnml")]
pub use petrinet_io::PnmlFormat;

#[cfg(feature = "graphviz")]
pub use petrinet_io::GraphvizFormat;

#[cfg(feature = "drawio")]
pub use petrinet_io::DrawioFormat;

#[cfg(feature = "latex")]
pub use petrinet_io::LatexFormat;

#[cfg(feature = "pneditor")]
pub use petrinet_io::{write_pneditor_bundle, write_pneditor_bundle_to, PneditorBundle};

#[cfg(feature = "grafcet_cpp")]
pub use petrinet_io::GrafcetCppFormat;

#[cfg(feature = "symfony")]
pub use petrinet_io::SymfonyFormat;

#[cfg(feature = "codesys")]
pub use petrinet_io::CodesysFormat;

#[cfg(feature = "julia")]
pub use petrinet_io::JuliaFormat;

#[cfg(feature = "flowshop")]
pub use petrinet_io::FlowshopFormat;

#[cfg(feature = "timed_event_graph")]
pub use petrinet_io::TimedEventGraphFormat;
