use thiserror::Error;

/// The reason an `add_arc` call was rejected (`spec.md` §4.4, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcConflict {
    /// Both endpoints are the same kind (place-place or transition-transition).
    SameKindEndpoints,
    /// An arc with the same `(from, to)` pair already exists.
    DuplicateArc,
}

impl std::fmt::Display for ArcConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcConflict::SameKindEndpoints => f.write_str("endpoints are the same kind"),
            ArcConflict::DuplicateArc => f.write_str("arc already exists"),
        }
    }
}

/// The error vocabulary surfaced by the core (`spec.md` §7).
///
/// Importers and exporters recover locally: they push a [`crate::Message`]
/// into the net's message buffer and return one of these as a `Result`, they
/// never panic. The simulator never returns this type at all — unsatisfied
/// preconditions during `step()` are diagnostic messages, not errors.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("arc conflict between {from} and {to}: {kind}")]
    ArcConflict {
        from: String,
        to: String,
        kind: ArcConflict,
    },

    #[error("not an event graph: {} offending arc(s)", offending.len())]
    NotAnEventGraph { offending: Vec<(String, String)> },

    #[error("bad expression: {0}")]
    BadExpression(String),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetError {
    pub fn offending_arcs(&self) -> &[(String, String)] {
        match self {
            NetError::NotAnEventGraph { offending } => offending,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_human_readable_messages() {
        let err = NetError::ArcConflict {
            from: "P0".into(),
            to: "P1".into(),
            kind: ArcConflict::SameKindEndpoints,
        };
        assert_eq!(
            err.to_string(),
            "arc conflict between P0 and P1: endpoints are the same kind"
        );
    }

    #[test]
    fn not_an_event_graph_exposes_offending_arcs() {
        let err = NetError::NotAnEventGraph {
            offending: vec![("P0".into(), "T0".into())],
        };
        assert_eq!(err.offending_arcs(), &[("P0".to_string(), "T0".to_string())]);
    }
}
