//! Flowshop dense-matrix import (`spec.md` §9, §8 scenario 6), grounded on
//! `original_source/src/formats/ImportFlowshop.hpp`: a whitespace-separated
//! text matrix `rows cols` followed by `rows * cols` processing times
//! (`-inf`/`-Infinity` marking "this machine does not process this
//! piece"). Each row becomes a chain of the row's finite-duration places
//! joined by zero-duration synthetic transitions in increasing column
//! order, skipping `-inf` entries — the original connects places directly
//! with an arc, which this net's place/transition bipartite invariant
//! does not allow, so a transition is inserted on every hop. The original
//! also lays out one unconnected placeholder place per machine row and
//! per piece column after the matrix places (`ImportFlowshop.hpp` lines
//! 90-104); those carry no arcs in the original either, so none are added
//! here. Import-only.

use petrinet_common::{NetError, NetType};
use petrinet_model::Net;

use crate::traits::NetReader;

pub struct FlowshopFormat;

fn parse_cell(token: &str) -> Result<f64, NetError> {
    match token {
        "-inf" | "-Inf" | "-Infinity" | "-infinity" => Ok(f64::NEG_INFINITY),
        other => other
            .parse::<f64>()
            .map_err(|e| NetError::InvalidInput(format!("bad matrix entry '{other}': {e}"))),
    }
}

impl NetReader for FlowshopFormat {
    fn read_net(source: &str) -> Result<Net, NetError> {
        let mut tokens = source.split_whitespace();
        let rows: usize = tokens
            .next()
            .ok_or_else(|| NetError::InvalidInput("missing row count".to_string()))?
            .parse()
            .map_err(|e| NetError::InvalidInput(format!("bad row count: {e}")))?;
        let cols: usize = tokens
            .next()
            .ok_or_else(|| NetError::InvalidInput("missing column count".to_string()))?
            .parse()
            .map_err(|e| NetError::InvalidInput(format!("bad column count: {e}")))?;

        let mut matrix = vec![vec![0.0f64; cols]; rows];
        for row in matrix.iter_mut() {
            for cell in row.iter_mut() {
                let token = tokens
                    .next()
                    .ok_or_else(|| NetError::InvalidInput("matrix data truncated".to_string()))?;
                *cell = parse_cell(token)?;
            }
        }

        let mut net = Net::new("flowshop", NetType::TimedEventGraph);
        const SPACING: f32 = 100.0;

        let mut place_at: Vec<Vec<Option<petrinet_model::NodeKey>>> =
            vec![vec![None; cols]; rows];
        for m in 0..rows {
            for p in 0..cols {
                if matrix[m][p].is_finite() {
                    let caption = format!("m{m}p{p}");
                    let key = net.add_place(
                        None,
                        caption,
                        2.0 * SPACING + p as f32 * SPACING,
                        SPACING + m as f32 * SPACING,
                        0,
                    );
                    place_at[m][p] = Some(key);
                }
            }
        }

        for m in 0..rows {
            let mut prev: Option<(usize, petrinet_model::NodeKey)> = None;
            for p in 0..cols {
                let Some(key) = place_at[m][p] else { continue };
                if let Some((prev_col, prev_key)) = prev {
                    let duration = matrix[m][prev_col] as f32;
                    let hop = net.add_transition(
                        None,
                        format!("m{m}p{prev_col}-p{p}"),
                        0.0,
                        0.0,
                        0.0,
                    );
                    net.add_arc(prev_key, hop, None)?;
                    net.add_arc(hop, key, Some(duration))?;
                }
                prev = Some((p, key));
            }
        }

        // Placeholder places for each machine row and piece column
        // (`ImportFlowshop.hpp` lines 90-104); these carry no arcs, they
        // only exist so the editor can label rows/columns.
        for m in 0..rows {
            net.add_place(
                None,
                format!("Machine {m}"),
                SPACING,
                SPACING + m as f32 * SPACING,
                0,
            );
        }
        for p in 0..cols {
            net.add_place(
                None,
                format!("Piece {p}"),
                1.5 * SPACING + p as f32 * SPACING,
                SPACING + rows as f32 * SPACING,
                0,
            );
        }

        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_three_matrix_with_one_gap_builds_ten_places() {
        // spec.md §8 scenario 6: 5 finite matrix cells (1, 2, 3, 4, 6) plus
        // 2 machine-row and 3 piece-column placeholder places = 10 places
        // total; 3 synthetic hop transitions.
        let text = "2 3\n1 2 3\n4 -inf 6\n";
        let net = FlowshopFormat::read_net(text).unwrap();

        assert_eq!(net.place_count(), 10);
        assert_eq!(net.transition_count(), 3);
        assert!(net.places().any(|p| p.caption == "Machine 0"));
        assert!(net.places().any(|p| p.caption == "Machine 1"));
        assert!(net.places().any(|p| p.caption == "Piece 0"));
        assert!(net.places().any(|p| p.caption == "Piece 1"));
        assert!(net.places().any(|p| p.caption == "Piece 2"));
    }

    #[test]
    fn rejects_truncated_matrix_data() {
        let text = "2 2\n1 2 3\n";
        assert!(FlowshopFormat::read_net(text).is_err());
    }
}
