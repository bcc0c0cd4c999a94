//! The Petri-net/GRAFCET data model (`spec.md` §3-§6): node and arc value
//! types, the [`Net`] container with its derived adjacency index, the
//! [`Simulator`], and the structural analyses that apply once a net is an
//! event graph.
//!
//! This crate knows nothing about file formats; [`petrinet_io`] reads and
//! writes [`Net`] values through the traits it defines there.

pub mod analysis;
pub mod arc;
pub mod net;
pub mod node;
pub mod simulate;

pub use arc::Arc;
pub use net::{Net, NodeRef};
pub use node::{NodeKey, Place, Transition};
pub use simulate::{GrafcetIo, NullIo, SimState, Simulator};

pub use petrinet_common::{Message, MessageLevel, NetError, NetType, NodeKind};
