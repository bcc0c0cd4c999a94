//! Sparse Max-Plus matrices and Howard's policy-iteration engine
//! (`spec.md` §4.1, §4.2).
//!
//! This crate knows nothing about places, transitions, or nets; it operates
//! on plain vertex indices and weighted arcs so that `petrinet-model` can
//! feed it the adjacency it extracts from a net without a dependency cycle.

pub mod howard;
pub mod matrix;

pub use howard::{howard, semi_howard, HowardError, HowardResult, Verbosity};
pub use matrix::SparseMatrix;
