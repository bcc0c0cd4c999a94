//! Step-by-step execution of a [`Net`] (`spec.md` §6).
//!
//! Three regimes share this module: an untimed Petri net fires one token
//! per input place the instant a transition is enabled; a timed Petri net
//! (or timed event graph) delays the output token by the firing arc's
//! duration; a GRAFCET chart runs a four-phase tick (sample, evaluate,
//! decide, commit) instead of a continuous-time firing rule.

use std::cell::Cell;
use std::collections::HashMap;

use petrinet_common::{NetError, NetType};
use petrinet_expr::{parse_caption, GrafcetContext};

use crate::net::Net;
use crate::node::NodeKey;

/// Where a simulator is in the current tick. Exposed mainly so a UI can
/// animate token movement rather than snap it (`SPEC_FULL.md` §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Idle,
    Starting,
    Animating,
    Ending,
}

/// A token fired into a timed arc, still travelling toward its
/// destination place.
#[derive(Debug, Clone, Copy)]
struct InFlightToken {
    place_id: u32,
    remaining: f32,
}

/// Hooks a GRAFCET simulation calls out to for external I/O
/// (`spec.md` §6). Every method is a no-op by default so a caller that
/// only cares about the internal marking can ignore this entirely.
pub trait GrafcetIo {
    fn init_gpio(&mut self) {}
    fn read_inputs(&mut self, _ctx: &mut GrafcetContext) {}
    fn on_connected(&mut self) {}
    fn on_message(&mut self, _topic: &str, _payload: &[u8], _qos: u8) {}
    fn publish(&mut self, _topic: &str, _payload: &[u8], _qos: u8) {}
    fn subscribe(&mut self, _topic: &str, _qos: u8) {}
}

/// The default [`GrafcetIo`]: no external inputs, every receptivity
/// variable other than `true` is undefined (`NetError::UnknownVariable`
/// if referenced).
#[derive(Debug, Default)]
pub struct NullIo;

impl GrafcetIo for NullIo {}

/// Drives a [`Net`] forward in time. Holds the marking captured at
/// construction so [`Simulator::reset`] can restore it, plus the
/// in-flight tokens a timed net has not yet delivered.
#[derive(Debug)]
pub struct Simulator {
    state: Cell<SimState>,
    initial_marking: HashMap<u32, u64>,
    in_flight: Vec<InFlightToken>,
}

impl Simulator {
    pub fn new(net: &Net) -> Self {
        Simulator {
            state: Cell::new(SimState::Idle),
            initial_marking: net.places().map(|p| (p.id, p.tokens)).collect(),
            in_flight: Vec::new(),
        }
    }

    pub fn state(&self) -> SimState {
        self.state.get()
    }

    /// Restore every place to the marking recorded at construction and
    /// drop any in-flight tokens.
    pub fn reset(&mut self, net: &mut Net) {
        for place in net.places_mut() {
            if let Some(&tokens) = self.initial_marking.get(&place.id) {
                place.tokens = tokens;
            }
        }
        self.in_flight.clear();
        self.state.set(SimState::Idle);
    }

    /// Advance a Petri net, timed Petri net, or timed event graph by `dt`
    /// time units. GRAFCET charts use [`Simulator::step_grafcet`] instead,
    /// since a chart tick has no notion of elapsed time.
    pub fn step(&mut self, net: &mut Net, dt: f32) {
        match net.ty() {
            NetType::Petri => self.fire_untimed(net),
            NetType::TimedPetri | NetType::TimedEventGraph => self.step_timed(net, dt),
            NetType::Grafcet => {
                let _ = self.step_grafcet(net, &mut NullIo);
            }
        }
    }

    /// Fire every transition enabled at the start of the tick, in vector
    /// order. Enabled-ness is decided against a snapshot taken before any
    /// transition in this tick fires, but tokens are actually consumed
    /// from the live marking as each transition fires in turn, so two
    /// transitions that both looked enabled in the snapshot but share an
    /// input place race for its token: the earlier one in iteration order
    /// wins (`SPEC_FULL.md` §4.5, resolving the concurrent-firing tie
    /// break left open by the original design).
    fn fire_untimed(&mut self, net: &mut Net) {
        let snapshot: HashMap<u32, u64> = net.places().map(|p| (p.id, p.tokens)).collect();
        let transition_ids: Vec<u32> = net.transitions().map(|t| t.id).collect();

        for tid in transition_ids {
            let key = NodeKey::Transition(tid);
            let inputs: Vec<u32> = net.arcs_in(key).map(|a| a.from.id()).collect();
            let enabled_in_snapshot = inputs
                .iter()
                .all(|pid| snapshot.get(pid).copied().unwrap_or(0) > 0);
            if !enabled_in_snapshot {
                continue;
            }
            let still_available = inputs
                .iter()
                .all(|&pid| net.place(pid).map(|p| p.tokens > 0).unwrap_or(false));
            if !still_available {
                continue;
            }

            for &pid in &inputs {
                if let Some(place) = net.place_mut(pid) {
                    place.tokens -= 1;
                }
            }
            let outputs: Vec<u32> = net.arcs_out(key).map(|a| a.to.id()).collect();
            for pid in outputs {
                if let Some(place) = net.place_mut(pid) {
                    place.tokens += 1;
                }
            }
        }
    }

    /// Same firing rule as [`Simulator::fire_untimed`], but an output
    /// token travels for the firing arc's duration before it lands in its
    /// destination place, tracked in `in_flight`. A zero-duration arc
    /// deposits its token immediately.
    fn step_timed(&mut self, net: &mut Net, dt: f32) {
        for token in &mut self.in_flight {
            token.remaining -= dt;
        }
        let mut arrived = Vec::new();
        self.in_flight.retain(|token| {
            if token.remaining <= 0.0 {
                arrived.push(token.place_id);
                false
            } else {
                true
            }
        });
        for pid in arrived {
            if let Some(place) = net.place_mut(pid) {
                place.tokens += 1;
            }
        }

        let snapshot: HashMap<u32, u64> = net.places().map(|p| (p.id, p.tokens)).collect();
        let transition_ids: Vec<u32> = net.transitions().map(|t| t.id).collect();

        for tid in transition_ids {
            let key = NodeKey::Transition(tid);
            let inputs: Vec<u32> = net.arcs_in(key).map(|a| a.from.id()).collect();
            let enabled_in_snapshot = inputs
                .iter()
                .all(|pid| snapshot.get(pid).copied().unwrap_or(0) > 0);
            if !enabled_in_snapshot {
                continue;
            }
            let still_available = inputs
                .iter()
                .all(|&pid| net.place(pid).map(|p| p.tokens > 0).unwrap_or(false));
            if !still_available {
                continue;
            }

            for &pid in &inputs {
                if let Some(place) = net.place_mut(pid) {
                    place.tokens -= 1;
                }
            }
            let outputs: Vec<(u32, f32)> = net
                .arcs_out(key)
                .map(|a| (a.to.id(), a.effective_duration()))
                .collect();
            for (pid, duration) in outputs {
                if duration <= 0.0 {
                    if let Some(place) = net.place_mut(pid) {
                        place.tokens += 1;
                    }
                } else {
                    self.in_flight.push(InFlightToken {
                        place_id: pid,
                        remaining: duration,
                    });
                }
            }
        }
    }

    /// Run one GRAFCET tick (`spec.md` §6): sample external inputs, read
    /// receptivities against the *pre-tick* marking and inputs (so two
    /// reads within the same tick see the same value), decide which
    /// transitions are simultaneously fireable, then commit every
    /// deactivation and activation together. Receptivities are
    /// level-triggered, not edge-triggered: holding a condition true for
    /// several ticks in a row keeps firing it every tick its upstream step
    /// is active.
    pub fn step_grafcet(&mut self, net: &mut Net, io: &mut dyn GrafcetIo) -> Result<(), NetError> {
        self.state.set(SimState::Starting);
        let mut ctx = GrafcetContext::new();
        io.read_inputs(&mut ctx);

        self.state.set(SimState::Animating);
        let transition_ids: Vec<u32> = net.transitions().map(|t| t.id).collect();
        let mut firing = Vec::new();
        for tid in &transition_ids {
            let key = NodeKey::Transition(*tid);
            let inputs: Vec<u32> = net.arcs_in(key).map(|a| a.from.id()).collect();
            let upstream_active = !inputs.is_empty()
                && inputs
                    .iter()
                    .all(|&pid| net.place(pid).map(|p| p.is_active()).unwrap_or(false));
            if !upstream_active {
                continue;
            }
            let caption = net
                .transition(*tid)
                .map(|t| t.caption.as_str())
                .unwrap_or("");
            let expr = parse_caption(caption)?;
            if expr.evaluate(ctx.inner())? {
                firing.push(*tid);
            }
        }

        self.state.set(SimState::Ending);
        let mut deactivate = Vec::new();
        let mut activate = Vec::new();
        for tid in &firing {
            let key = NodeKey::Transition(*tid);
            deactivate.extend(net.arcs_in(key).map(|a| a.from.id()));
            activate.extend(net.arcs_out(key).map(|a| a.to.id()));
        }
        for pid in deactivate {
            if let Some(place) = net.place_mut(pid) {
                place.tokens = 0;
            }
        }
        for pid in activate {
            if let Some(place) = net.place_mut(pid) {
                place.tokens = 1;
            }
        }
        self.state.set(SimState::Idle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrinet_common::NetType;

    #[test]
    fn untimed_transition_moves_one_token_per_arc() {
        let mut net = Net::new("n", NetType::Petri);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 1);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 0);
        net.add_arc(p0, t0, None).unwrap();
        net.add_arc(t0, p1, None).unwrap();

        let mut sim = Simulator::new(&net);
        sim.step(&mut net, 0.0);
        assert_eq!(net.place(0).unwrap().tokens, 0);
        assert_eq!(net.place(1).unwrap().tokens, 1);
    }

    #[test]
    fn concurrent_transitions_race_for_a_shared_token_in_vector_order() {
        let mut net = Net::new("n", NetType::Petri);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 1);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        let t1 = net.add_transition(None, "t1", 0.0, 0.0, 0.0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 0);
        let p2 = net.add_place(None, "p2", 0.0, 0.0, 0);
        net.add_arc(p0, t0, None).unwrap();
        net.add_arc(p0, t1, None).unwrap();
        net.add_arc(t0, p1, None).unwrap();
        net.add_arc(t1, p2, None).unwrap();

        let mut sim = Simulator::new(&net);
        sim.step(&mut net, 0.0);
        assert_eq!(net.place(0).unwrap().tokens, 0);
        // t0 is earlier in the transitions vector, so it wins the race.
        assert_eq!(net.place(1).unwrap().tokens, 1);
        assert_eq!(net.place(2).unwrap().tokens, 0);
    }

    #[test]
    fn timed_transition_delays_the_output_token() {
        let mut net = Net::new("n", NetType::TimedPetri);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 1);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 0);
        net.add_arc(p0, t0, None).unwrap();
        net.add_arc(t0, p1, Some(2.0)).unwrap();

        let mut sim = Simulator::new(&net);
        sim.step(&mut net, 1.0);
        assert_eq!(net.place(0).unwrap().tokens, 0);
        assert_eq!(net.place(1).unwrap().tokens, 0);
        sim.step(&mut net, 1.0);
        assert_eq!(net.place(1).unwrap().tokens, 1);
    }

    #[test]
    fn reset_restores_initial_marking_and_clears_in_flight_tokens() {
        let mut net = Net::new("n", NetType::TimedPetri);
        let p0 = net.add_place(None, "p0", 0.0, 0.0, 1);
        let t0 = net.add_transition(None, "t0", 0.0, 0.0, 0.0);
        let p1 = net.add_place(None, "p1", 0.0, 0.0, 0);
        net.add_arc(p0, t0, None).unwrap();
        net.add_arc(t0, p1, Some(5.0)).unwrap();

        let mut sim = Simulator::new(&net);
        sim.step(&mut net, 1.0);
        sim.reset(&mut net);
        assert_eq!(net.place(0).unwrap().tokens, 1);
        assert_eq!(net.place(1).unwrap().tokens, 0);
        // the in-flight token from before reset must not still arrive.
        sim.step(&mut net, 10.0);
        assert_eq!(net.place(1).unwrap().tokens, 0);
    }

    #[test]
    fn grafcet_tick_fires_transition_whose_receptivity_holds() {
        let mut net = Net::new("n", NetType::Grafcet);
        let p0 = net.add_place(None, "X0", 0.0, 0.0, 1);
        let t0 = net.add_transition(None, "", 0.0, 0.0, 0.0);
        let p1 = net.add_place(None, "X1", 0.0, 0.0, 0);
        net.add_arc(p0, t0, None).unwrap();
        net.add_arc(t0, p1, None).unwrap();

        let mut sim = Simulator::new(&net);
        sim.step_grafcet(&mut net, &mut NullIo).unwrap();
        assert_eq!(net.place(0).unwrap().tokens, 0);
        assert_eq!(net.place(1).unwrap().tokens, 1);
    }

    #[test]
    fn grafcet_step_does_not_fire_without_upstream_active_step() {
        let mut net = Net::new("n", NetType::Grafcet);
        let p0 = net.add_place(None, "X0", 0.0, 0.0, 0);
        let t0 = net.add_transition(None, "", 0.0, 0.0, 0.0);
        let p1 = net.add_place(None, "X1", 0.0, 0.0, 0);
        net.add_arc(p0, t0, None).unwrap();
        net.add_arc(t0, p1, None).unwrap();

        let mut sim = Simulator::new(&net);
        sim.step_grafcet(&mut net, &mut NullIo).unwrap();
        assert_eq!(net.place(1).unwrap().tokens, 0);
    }
}
