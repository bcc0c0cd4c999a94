//! Timed event graph text import/export (`spec.md` §9): the collapsed
//! transition-adjacency view an event graph reduces to once every place
//! has exactly one in-arc and one out-arc (`spec.md` §4.6) — each edge
//! `from -> to` stands for one place, annotated with the duration on its
//! in-arc and its token count. Round-trips through
//! [`petrinet_model::analysis::build_adjacency`] on export and rebuilds
//! one synthetic place per edge on import.

use std::collections::HashMap;

use petrinet_common::{NetError, NetType};
use petrinet_model::analysis::build_adjacency;
use petrinet_model::Net;

use crate::traits::{NetReader, NetWriter};

pub struct TimedEventGraphFormat;

impl NetWriter for TimedEventGraphFormat {
    fn write_net(net: &Net) -> Result<String, NetError> {
        let adjacency = build_adjacency(net)?;
        let mut out = String::new();
        out.push_str(&format!("transitions: {}\n", adjacency.order.len()));
        for (i, &id) in adjacency.order.iter().enumerate() {
            let caption = net
                .transition(id)
                .map(|t| t.caption.clone())
                .unwrap_or_default();
            out.push_str(&format!("t{i}: {caption}\n"));
        }
        out.push_str("edges:\n");
        let (arcs, weights, delays) = adjacency.to_arc_lists();
        for ((i, j), (duration, tokens)) in arcs.into_iter().zip(weights.into_iter().zip(delays)) {
            out.push_str(&format!("t{i} -> t{j} duration={duration} tokens={tokens}\n"));
        }
        Ok(out)
    }
}

impl NetReader for TimedEventGraphFormat {
    fn read_net(source: &str) -> Result<Net, NetError> {
        let mut net = Net::new("imported", NetType::TimedEventGraph);
        let mut index_to_id: HashMap<String, u32> = HashMap::new();
        let mut in_edges = false;

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix("transitions:") {
                let _count: usize = rest
                    .trim()
                    .parse()
                    .map_err(|e| NetError::InvalidInput(format!("bad transition count: {e}")))?;
                continue;
            }
            if line == "edges:" {
                in_edges = true;
                continue;
            }
            if !in_edges {
                let (label, caption) = line
                    .split_once(':')
                    .ok_or_else(|| NetError::InvalidInput(format!("malformed transition line: {line}")))?;
                let key = net.add_transition(None, caption.trim(), 0.0, 0.0, 0.0);
                index_to_id.insert(label.trim().to_string(), key.id());
                continue;
            }

            let mut parts = line.split_whitespace();
            let from_label = parts
                .next()
                .ok_or_else(|| NetError::InvalidInput(format!("malformed edge line: {line}")))?;
            let arrow = parts.next();
            let to_label = parts.next();
            if arrow != Some("->") || to_label.is_none() {
                return Err(NetError::InvalidInput(format!("malformed edge line: {line}")));
            }
            let to_label = to_label.unwrap();

            let mut duration = 0.0f32;
            let mut tokens = 0u64;
            for field in parts {
                if let Some(v) = field.strip_prefix("duration=") {
                    duration = v
                        .parse()
                        .map_err(|e| NetError::InvalidInput(format!("bad duration: {e}")))?;
                } else if let Some(v) = field.strip_prefix("tokens=") {
                    tokens = v
                        .parse()
                        .map_err(|e| NetError::InvalidInput(format!("bad tokens: {e}")))?;
                }
            }

            let from_id = *index_to_id
                .get(from_label)
                .ok_or_else(|| NetError::UnknownNode(from_label.to_string()))?;
            let to_id = *index_to_id
                .get(to_label)
                .ok_or_else(|| NetError::UnknownNode(to_label.to_string()))?;

            let place = net.add_place(
                None,
                format!("{from_label}_{to_label}"),
                0.0,
                0.0,
                tokens,
            );
            net.add_arc(
                petrinet_model::NodeKey::Transition(from_id),
                place,
                Some(duration),
            )?;
            net.add_arc(place, petrinet_model::NodeKey::Transition(to_id), None)?;
        }

        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrinet_common::NetType;
    use petrinet_model::Net;

    #[test]
    fn round_trips_the_two_place_cycle_worked_example() {
        // spec.md §8 scenario 1.
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
        assert!(text.contains("transitions: 2"));
        assert!(text.contains("duration=3"));
        assert!(text.contains("duration=5"));

        let parsed = TimedEventGraphFormat::read_net(&text).unwrap();
        assert_eq!(parsed.transition_count(), 2);
        assert_eq!(parsed.place_count(), 2);
    }
}
