//! Structural analyses that apply once a net is recognized as a (timed)
//! event graph (`spec.md` §4.6): canonicalization, the transition
//! adjacency Howard/Semi-Howard run on, critical-cycle extraction, the
//! Max-Plus state-space matrices, and the dater/counter equation forms.

pub mod adjacency;
pub mod canonical;
pub mod critical_cycle;
pub mod dater_counter;
pub mod event_graph;
pub mod linear_system;

pub use adjacency::{build_adjacency, EventGraphAdjacency};
pub use canonical::canonicalize;
pub use critical_cycle::{critical_cycle, critical_cycle_from, CriticalCycle};
pub use dater_counter::{counter_equations, dater_equations};
pub use event_graph::{check_event_graph, is_event_graph};
pub use linear_system::{build_linear_system, LinearSystem};
