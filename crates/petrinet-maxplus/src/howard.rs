//! Howard's policy-iteration algorithm for mean cycle-time computation
//! over a weighted digraph (`spec.md` §4.2), and its timed variant,
//! Semi-Howard, which computes the ratio mean `sum(weight)/sum(delay)`
//! on cycles instead of the plain arithmetic mean.
//!
//! `howard` is implemented as a thin call into `semi_howard` with every arc
//! delay fixed at `1.0`, which reduces the ratio mean back to the ordinary
//! cycle mean.

use thiserror::Error;

/// Controls whether structural validation runs before the algorithm starts
/// (`spec.md` §4.2: "Value -1 of verbosemode suppresses the checking of
/// consistency of data").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Skip the "every vertex has an out-arc" check entirely.
    Quiet,
    /// Validate, report nothing extra on success.
    Normal,
    /// Validate and additionally trace iteration progress.
    Verbose,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HowardError {
    #[error("invalid input: vertex {0} has no outgoing arc")]
    InvalidInput(usize),
}

/// The result of a policy-iteration run: the cycle-time vector `chi`, the
/// bias vector `v`, the optimal positional policy `pi`, the iteration
/// count, and the number of connected components of the final policy
/// graph (`spec.md` §4.2).
#[derive(Debug, Clone, PartialEq)]
pub struct HowardResult {
    pub chi: Vec<f64>,
    pub v: Vec<f64>,
    pub policy: Vec<usize>,
    pub iterations: usize,
    pub components: usize,
}

/// Plain Howard: mean cycle time on a weighted digraph
/// (`arcs[k] = (src, dst)`, `weights[k] = A(src, dst)`).
pub fn howard(
    arcs: &[(usize, usize)],
    weights: &[f64],
    n_nodes: usize,
    verbosity: Verbosity,
) -> Result<HowardResult, HowardError> {
    let delays = vec![1.0_f64; arcs.len()];
    semi_howard(arcs, weights, &delays, n_nodes, verbosity)
}

/// One vertex's currently selected successor, with the weight/delay of the
/// arc that reaches it. For a vertex that genuinely has no out-arc (only
/// reachable in [`Verbosity::Quiet`], which suppresses the error that would
/// otherwise be raised), this is a synthetic self-loop of tropical-zero
/// weight so the algorithm has something total to iterate over.
#[derive(Clone, Copy)]
struct Policy {
    target: usize,
    weight: f64,
    delay: f64,
}

/// Semi-Howard: ratio-mean cycle time with per-arc delays
/// (`spec.md` §4.2). For an event graph, `weights` are transition
/// durations and `delays` are place token counts, so the cycle time is
/// the per-token cycle duration (`spec.md` §8 scenario 1).
pub fn semi_howard(
    arcs: &[(usize, usize)],
    weights: &[f64],
    delays: &[f64],
    n_nodes: usize,
    verbosity: Verbosity,
) -> Result<HowardResult, HowardError> {
    assert_eq!(arcs.len(), weights.len(), "arcs/weights length mismatch");
    assert_eq!(arcs.len(), delays.len(), "arcs/delays length mismatch");

    let mut out_arcs: Vec<Vec<usize>> = vec![Vec::new(); n_nodes];
    for (k, &(src, _dst)) in arcs.iter().enumerate() {
        out_arcs[src].push(k);
    }

    if verbosity != Verbosity::Quiet {
        if let Some(v) = (0..n_nodes).find(|&v| out_arcs[v].is_empty()) {
            return Err(HowardError::InvalidInput(v));
        }
    }

    if n_nodes == 0 {
        return Ok(HowardResult {
            chi: Vec::new(),
            v: Vec::new(),
            policy: Vec::new(),
            iterations: 0,
            components: 0,
        });
    }

    // Initial policy: the first out-arc of each vertex in input order. A
    // vertex with no out-arc (Quiet mode only) gets a tropical-zero
    // self-loop so every later step stays total.
    let mut policy: Vec<Policy> = (0..n_nodes)
        .map(|u| match out_arcs[u].first() {
            Some(&k) => Policy {
                target: arcs[k].1,
                weight: weights[k],
                delay: delays[k],
            },
            None => Policy {
                target: u,
                weight: f64::NEG_INFINITY,
                delay: 1.0,
            },
        })
        .collect();

    let mut chi = vec![0.0_f64; n_nodes];
    let mut v = vec![0.0_f64; n_nodes];
    let mut iterations = 0usize;
    let mut components = 0usize;

    loop {
        iterations += 1;
        components = evaluate_policy(&policy, n_nodes, &mut chi, &mut v);

        #[cfg(feature = "tracing")]
        if verbosity == Verbosity::Verbose {
            tracing::debug!(iterations, components, "howard: policy evaluated");
        }
        #[cfg(not(feature = "tracing"))]
        let _ = verbosity;

        let mut improved = false;
        for u in 0..n_nodes {
            let mut best = (chi[u], v[u]);
            let mut best_policy = policy[u];
            for &k in &out_arcs[u] {
                let w = arcs[k].1;
                let candidate = (chi[w], weights[k] - chi[w] * delays[k] + v[w]);
                if candidate > best {
                    best = candidate;
                    best_policy = Policy {
                        target: w,
                        weight: weights[k],
                        delay: delays[k],
                    };
                }
            }
            if best_policy.target != policy[u].target || best_policy.weight != policy[u].weight {
                policy[u] = best_policy;
                improved = true;
            }
        }

        if !improved {
            break;
        }
    }

    let pi: Vec<usize> = policy.iter().map(|p| p.target).collect();

    Ok(HowardResult {
        chi,
        v,
        policy: pi,
        iterations,
        components,
    })
}

/// Evaluate a fixed policy: find the cycle of each rho-shaped component,
/// its cycle time, and every vertex's bias relative to that cycle.
/// Returns the number of components found.
fn evaluate_policy(policy: &[Policy], n_nodes: usize, chi: &mut [f64], v: &mut [f64]) -> usize {
    const UNVISITED: u8 = 0;
    const IN_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut color = vec![UNVISITED; n_nodes];
    let mut cycles: Vec<Vec<usize>> = Vec::new();

    for start in 0..n_nodes {
        if color[start] != UNVISITED {
            continue;
        }
        let mut path = Vec::new();
        let mut cur = start;
        while color[cur] == UNVISITED {
            color[cur] = IN_PATH;
            path.push(cur);
            cur = policy[cur].target;
        }

        if color[cur] == IN_PATH {
            let split = path.iter().position(|&x| x == cur).unwrap();
            cycles.push(path[split..].to_vec());
        }
        for &node in &path {
            color[node] = DONE;
        }
    }

    for cycle in &cycles {
        let sum_w: f64 = cycle.iter().map(|&u| policy[u].weight).sum();
        let sum_d: f64 = cycle.iter().map(|&u| policy[u].delay).sum();
        let chi_c = sum_w / sum_d;
        for &u in cycle {
            chi[u] = chi_c;
        }

        v[cycle[0]] = 0.0;
        let mut prev = cycle[0];
        for &u in cycle.iter().cycle().skip(1).take(cycle.len()) {
            v[u] = v[prev] + policy[prev].weight - chi_c * policy[prev].delay;
            prev = u;
        }
    }

    // Propagate chi/v out to tree vertices feeding each cycle, nearest
    // first, by walking the policy graph's predecessor edges.
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n_nodes];
    for u in 0..n_nodes {
        predecessors[policy[u].target].push(u);
    }

    let mut resolved = vec![false; n_nodes];
    let mut queue: std::collections::VecDeque<usize> = std::collections::VecDeque::new();
    for cycle in &cycles {
        for &u in cycle {
            resolved[u] = true;
            queue.push_back(u);
        }
    }
    while let Some(w) = queue.pop_front() {
        for &u in &predecessors[w] {
            if resolved[u] {
                continue;
            }
            chi[u] = chi[w];
            v[u] = policy[u].weight - chi[w] * policy[u].delay + v[w];
            resolved[u] = true;
            queue.push_back(u);
        }
    }

    cycles.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_loop_single_vertex() {
        let result = howard(&[(0, 0)], &[4.0], 1, Verbosity::Normal).unwrap();
        assert_eq!(result.chi, vec![4.0]);
        assert_eq!(result.v, vec![0.0]);
        assert_eq!(result.policy, vec![0]);
        assert_eq!(result.components, 1);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn two_vertex_minimal_example() {
        // spec.md §8 scenario 5.
        let arcs = [(0, 1), (1, 0), (0, 0)];
        let weights = [2.0, 4.0, 1.0];
        let result = howard(&arcs, &weights, 2, Verbosity::Normal).unwrap();
        assert_eq!(result.chi, vec![3.0, 3.0]);
        assert_eq!(result.policy[0], 1);
        assert_eq!(result.policy[1], 0);
        assert_eq!(result.components, 1);
    }

    #[test]
    fn two_place_event_graph_semi_howard() {
        // spec.md §8 scenario 1: T0 -> T1 (duration 3, 0 tokens in between),
        // T1 -> T0 (duration 5, 1 token in between).
        let arcs = [(0, 1), (1, 0)];
        let weights = [3.0, 5.0];
        let delays = [0.0, 1.0];
        let result = semi_howard(&arcs, &weights, &delays, 2, Verbosity::Normal).unwrap();
        assert_eq!(result.chi, vec![8.0, 8.0]);
        assert_eq!(result.v, vec![0.0, 3.0]);
        assert_eq!(result.components, 1);
    }

    #[test]
    fn missing_out_arc_is_invalid_input() {
        let err = howard(&[(0, 1)], &[1.0], 3, Verbosity::Normal).unwrap_err();
        assert_eq!(err, HowardError::InvalidInput(1));
    }

    #[test]
    fn quiet_mode_skips_validation() {
        // vertex 1 and 2 have no out-arc, but Quiet suppresses the check;
        // those vertices get a synthetic tropical-zero self-loop instead
        // of a crash, so the overall call still succeeds.
        let result = howard(&[(0, 0)], &[1.0], 3, Verbosity::Quiet);
        assert!(result.is_ok());
        let result = result.unwrap();
        assert_eq!(result.chi[0], 1.0);
        assert_eq!(result.chi[1], f64::NEG_INFINITY);
    }

    #[test]
    fn empty_graph_returns_empty_result() {
        let result = howard(&[], &[], 0, Verbosity::Normal).unwrap();
        assert_eq!(result.chi, Vec::<f64>::new());
        assert_eq!(result.components, 0);
    }

    #[test]
    fn disconnected_components_are_counted_separately() {
        let arcs = [(0, 0), (1, 1)];
        let weights = [2.0, 9.0];
        let result = howard(&arcs, &weights, 2, Verbosity::Normal).unwrap();
        assert_eq!(result.chi, vec![2.0, 9.0]);
        assert_eq!(result.components, 2);
    }

    #[test]
    fn tree_vertex_inherits_cycle_time_and_bias() {
        // 0 -> 1 -> 1 (self loop weight 6); 0's only out-arc feeds the cycle.
        let arcs = [(0, 1), (1, 1)];
        let weights = [10.0, 6.0];
        let result = howard(&arcs, &weights, 2, Verbosity::Normal).unwrap();
        assert_eq!(result.chi, vec![6.0, 6.0]);
        // v(1) = 0 (cycle base); v(0) = weight(0->1) - chi*1 + v(1) = 10 - 6 = 4.
        assert_eq!(result.v, vec![4.0, 0.0]);
    }
}
