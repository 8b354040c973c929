//! Neurons and the trace-based learning engine.
//!
//! A neuron holds its numeric state plus the identities of the connections
//! it receives, projects and gates. All operations that need other graph
//! elements run on [`IdentityTable`], which resolves those identities.
//!
//! The equations follow "A generalized LSTM-like training algorithm for
//! second-order recurrent neural networks" (Monner & Reggia, 2012). One
//! algorithm covers plain feed-forward, self-recurrent and gated topologies:
//!
//! - each neuron keeps an *eligibility trace* per incoming connection,
//!   accumulating how much that input fed its own recurrent state;
//! - a gating neuron additionally keeps an *extended trace* per
//!   (gated neighbour, incoming connection) pair, so error can reach
//!   connections whose effect went through a gate instead of a direct edge.

use crate::table::IdentityTable;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::mem;
use tracenet_core::error::Result;
use tracenet_core::squash::{Squash, Squasher};
use tracenet_core::types::{ConnectionId, NeuronId};

/// The computational unit of a network.
#[derive(Debug, Clone)]
pub struct Neuron {
    pub(crate) id: NeuronId,
    state: f64,
    old_state: f64,
    derivative: f64,
    activation: f64,
    bias: f64,
    self_connection: ConnectionId,
    squash: Squash,

    inputs: Vec<ConnectionId>,
    projected: Vec<ConnectionId>,
    gated: Vec<ConnectionId>,
    /// Neurons this neuron gates or is gated by.
    neighbours: BTreeSet<NeuronId>,

    error_responsibility: f64,
    error_projected: f64,
    error_gated: f64,

    trace_eligibility: HashMap<ConnectionId, f64>,
    trace_extended: BTreeMap<NeuronId, HashMap<ConnectionId, f64>>,
    trace_influences: BTreeMap<NeuronId, Vec<ConnectionId>>,
}

impl Neuron {
    fn new(self_connection: ConnectionId, bias: f64) -> Self {
        Self {
            id: NeuronId(0),
            state: 0.0,
            old_state: 0.0,
            derivative: 0.0,
            activation: 0.0,
            bias,
            self_connection,
            squash: Squash::default(),
            inputs: Vec::new(),
            projected: Vec::new(),
            gated: Vec::new(),
            neighbours: BTreeSet::new(),
            error_responsibility: 0.0,
            error_projected: 0.0,
            error_gated: 0.0,
            trace_eligibility: HashMap::new(),
            trace_extended: BTreeMap::new(),
            trace_influences: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn state(&self) -> f64 {
        self.state
    }

    /// State as it was before the most recent activation.
    pub fn old_state(&self) -> f64 {
        self.old_state
    }

    pub fn derivative(&self) -> f64 {
        self.derivative
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn squash(&self) -> Squash {
        self.squash
    }

    pub fn set_squash(&mut self, squash: Squash) {
        self.squash = squash;
    }

    /// The neuron's own recurrent connection. Present from construction,
    /// inactive while its weight is 0.
    pub fn self_connection(&self) -> ConnectionId {
        self.self_connection
    }

    pub fn inputs(&self) -> &[ConnectionId] {
        &self.inputs
    }

    pub fn projected(&self) -> &[ConnectionId] {
        &self.projected
    }

    pub fn gated(&self) -> &[ConnectionId] {
        &self.gated
    }

    pub fn neighbours(&self) -> impl Iterator<Item = NeuronId> + '_ {
        self.neighbours.iter().copied()
    }

    pub fn error_responsibility(&self) -> f64 {
        self.error_responsibility
    }

    pub fn error_projected(&self) -> f64 {
        self.error_projected
    }

    pub fn error_gated(&self) -> f64 {
        self.error_gated
    }

    pub fn eligibility_trace(&self, connection: ConnectionId) -> Option<f64> {
        self.trace_eligibility.get(&connection).copied()
    }

    pub fn extended_trace(&self, neighbour: NeuronId, connection: ConnectionId) -> Option<f64> {
        self.trace_extended
            .get(&neighbour)
            .and_then(|row| row.get(&connection))
            .copied()
    }

    /// Neighbours this neuron gates, in identity order.
    pub fn gated_neighbours(&self) -> impl Iterator<Item = NeuronId> + '_ {
        self.trace_extended.keys().copied()
    }
}

impl IdentityTable {
    /// Create a neuron with a random bias, its inactive self-connection and
    /// the logistic squashing function.
    pub fn create_neuron(&mut self) -> NeuronId {
        let id = self.next_neuron_id();
        let self_connection = self.create_connection(id, id, Some(0.0)).id();
        let bias = self.random_bias();
        self.register_neuron(Neuron::new(self_connection, bias))
    }

    /// Activate a neuron and return its activation.
    ///
    /// With an external `input` the neuron is clamped to it: activation is
    /// forced, derivative and bias are zeroed and no trace is touched.
    pub fn activate_neuron(&mut self, id: NeuronId, input: Option<f64>) -> Result<f64> {
        if let Some(value) = input {
            let neuron = self.try_neuron_mut(id)?;
            neuron.activation = value;
            neuron.derivative = 0.0;
            neuron.bias = 0.0;
            return Ok(value);
        }

        // Eq. 15: second-order state update through the self-connection.
        let (old_state, state, squash) = {
            let neuron = self.try_neuron(id)?;
            let own = self.try_connection(neuron.self_connection)?;
            let mut state = own.gain * own.weight * neuron.state + neuron.bias;
            for &cid in &neuron.inputs {
                let input = self.try_connection(cid)?;
                state += self.try_neuron(input.from())?.activation * input.weight * input.gain;
            }
            (neuron.state, state, neuron.squash)
        };

        // Eq. 16
        let activation = squash.squash(state, false);
        let derivative = squash.squash(state, true);
        {
            let neuron = self.try_neuron_mut(id)?;
            neuron.old_state = old_state;
            neuron.state = state;
            neuron.activation = activation;
            neuron.derivative = derivative;
        }

        let influences = self.gate_influences(id)?;

        let (mut eligibility, mut extended) = {
            let neuron = self.try_neuron_mut(id)?;
            (
                mem::take(&mut neuron.trace_eligibility),
                mem::take(&mut neuron.trace_extended),
            )
        };
        let updated = self.update_traces(id, derivative, &influences, &mut eligibility, &mut extended);
        let neuron = self.try_neuron_mut(id)?;
        neuron.trace_eligibility = eligibility;
        neuron.trace_extended = extended;
        updated?;

        // Gating: this neuron's activation becomes the gain of every
        // connection it gates.
        let gated = neuron.gated.clone();
        for cid in gated {
            self.try_connection_mut(cid)?.gain = activation;
        }

        Ok(activation)
    }

    /// Eq. 17 and 18 for every incoming connection.
    fn update_traces(
        &self,
        id: NeuronId,
        derivative: f64,
        influences: &BTreeMap<NeuronId, f64>,
        eligibility: &mut HashMap<ConnectionId, f64>,
        extended: &mut BTreeMap<NeuronId, HashMap<ConnectionId, f64>>,
    ) -> Result<()> {
        let neuron = self.try_neuron(id)?;
        let own = self.try_connection(neuron.self_connection)?;
        let retention = own.gain * own.weight;

        // Neighbour self-connection retention does not depend on the input.
        let mut neighbour_retention = BTreeMap::new();
        for &neighbour_id in extended.keys() {
            let neighbour = self.try_neuron(neighbour_id)?;
            let theirs = self.try_connection(neighbour.self_connection)?;
            neighbour_retention.insert(neighbour_id, theirs.gain * theirs.weight);
        }

        for &cid in &neuron.inputs {
            let input = self.try_connection(cid)?;
            let from_activation = self.try_neuron(input.from())?.activation;

            let trace = eligibility.entry(cid).or_insert(0.0);
            *trace = retention * *trace + input.gain * from_activation;
            let trace = *trace;

            for (neighbour_id, row) in extended.iter_mut() {
                let influence = influences.get(neighbour_id).copied().unwrap_or(0.0);
                let retained = neighbour_retention.get(neighbour_id).copied().unwrap_or(0.0);
                let xtrace = row.entry(cid).or_insert(0.0);
                *xtrace = retained * *xtrace + derivative * trace * influence;
            }
        }
        Ok(())
    }

    /// Influence of neuron `id` on each neighbour it gates.
    fn gate_influences(&self, id: NeuronId) -> Result<BTreeMap<NeuronId, f64>> {
        let neuron = self.try_neuron(id)?;
        let mut influences = BTreeMap::new();
        for &neighbour_id in neuron.trace_extended.keys() {
            influences.insert(neighbour_id, self.influence(neuron, neighbour_id)?);
        }
        Ok(influences)
    }

    /// How strongly `gater` currently shapes `neighbour_id`'s state: the
    /// neighbour's previous state when its self-connection is gated, plus the
    /// un-gated contribution of every gated connection into the neighbour.
    fn influence(&self, gater: &Neuron, neighbour_id: NeuronId) -> Result<f64> {
        let neighbour = self.try_neuron(neighbour_id)?;
        let theirs = self.try_connection(neighbour.self_connection)?;
        let mut influence = if theirs.gater == Some(gater.id) {
            neighbour.old_state
        } else {
            0.0
        };
        for &cid in gater.trace_influences.get(&neighbour_id).into_iter().flatten() {
            let incoming = self.try_connection(cid)?;
            influence += incoming.weight * self.try_neuron(incoming.from())?.activation;
        }
        Ok(influence)
    }

    /// Propagate error through a neuron and learn from it.
    ///
    /// `target` is set for output neurons, whose error comes straight from
    /// the environment. Every other neuron gathers error from the neurons it
    /// projects to and the neighbours it gates, so those must already have
    /// propagated in this sweep.
    pub fn propagate_neuron(&mut self, id: NeuronId, rate: f64, target: Option<f64>) -> Result<()> {
        let neuron = self.try_neuron(id)?;
        let (projected, gated) = match target {
            // Eq. 10
            Some(target) => (target - neuron.activation, 0.0),
            None => {
                // Eq. 21
                let mut error = 0.0;
                for &cid in &neuron.projected {
                    let conn = self.try_connection(cid)?;
                    error += self.try_neuron(conn.to())?.error_responsibility * conn.gain * conn.weight;
                }
                let projected = neuron.derivative * error;

                // Eq. 22
                let mut error = 0.0;
                for &neighbour_id in neuron.trace_extended.keys() {
                    let responsibility = self.try_neuron(neighbour_id)?.error_responsibility;
                    error += responsibility * self.influence(neuron, neighbour_id)?;
                }
                (projected, neuron.derivative * error)
            }
        };

        let neuron = self.try_neuron_mut(id)?;
        neuron.error_projected = projected;
        neuron.error_gated = gated;
        neuron.error_responsibility = projected + gated;

        self.learn(id, rate)
    }

    /// Adjust incoming weights and bias from the current error terms (Eq. 24).
    pub fn learn(&mut self, id: NeuronId, rate: f64) -> Result<()> {
        let neuron = self.try_neuron(id)?;
        let mut deltas = Vec::with_capacity(neuron.inputs.len());
        for &cid in &neuron.inputs {
            let mut gradient =
                neuron.error_projected * neuron.trace_eligibility.get(&cid).copied().unwrap_or(0.0);
            for (&neighbour_id, row) in &neuron.trace_extended {
                let responsibility = self.try_neuron(neighbour_id)?.error_responsibility;
                gradient += responsibility * row.get(&cid).copied().unwrap_or(0.0);
            }
            deltas.push((cid, rate * gradient));
        }
        let bias_delta = rate * neuron.error_responsibility;

        for (cid, delta) in deltas {
            self.try_connection_mut(cid)?.weight += delta;
        }
        self.try_neuron_mut(id)?.bias += bias_delta;
        Ok(())
    }

    /// Connect `from` to `to` and return the connection.
    ///
    /// Projecting a neuron onto itself switches its self-connection on
    /// (weight 1). Projecting onto a neuron already connected returns the
    /// existing connection, updating its weight only when one is given.
    pub fn project(&mut self, from: NeuronId, to: NeuronId, weight: Option<f64>) -> Result<ConnectionId> {
        let source = self.try_neuron(from)?;
        if from == to {
            let own = source.self_connection;
            self.try_connection_mut(own)?.weight = 1.0;
            return Ok(own);
        }
        self.try_neuron(to)?;

        let mut existing = None;
        for &cid in &source.projected {
            if self.try_connection(cid)?.to() == to {
                existing = Some(cid);
                break;
            }
        }
        if let Some(cid) = existing {
            if let Some(weight) = weight {
                self.try_connection_mut(cid)?.weight = weight;
            }
            return Ok(cid);
        }

        let cid = self.create_connection(from, to, weight).id();

        let source = self.try_neuron_mut(from)?;
        source.projected.push(cid);
        for row in source.trace_extended.values_mut() {
            row.insert(cid, 0.0);
        }

        let target = self.try_neuron_mut(to)?;
        target.inputs.push(cid);
        target.trace_eligibility.insert(cid, 0.0);
        for row in target.trace_extended.values_mut() {
            row.insert(cid, 0.0);
        }
        Ok(cid)
    }

    /// Make `gater` modulate the gain of `connection`.
    pub fn gate(&mut self, gater: NeuronId, connection: ConnectionId) -> Result<()> {
        let (to, previous) = {
            let conn = self.try_connection(connection)?;
            (conn.to(), conn.gater)
        };
        self.try_neuron(to)?;
        self.try_neuron(gater)?;

        if let Some(previous) = previous.filter(|&previous| previous != gater) {
            // `to` may still gate one of the old gater's inputs.
            let reverse = self.try_neuron(to)?.trace_extended.contains_key(&previous);
            let old = self.try_neuron_mut(previous)?;
            old.gated.retain(|&cid| cid != connection);
            if let Some(list) = old.trace_influences.get_mut(&to) {
                list.retain(|&cid| cid != connection);
            }
            let released = old.trace_influences.get(&to).map_or(true, Vec::is_empty);
            if released {
                // No gate left into `to`: its trace row must not keep feeding `learn`.
                old.trace_influences.remove(&to);
                old.trace_extended.remove(&to);
                if !reverse {
                    old.neighbours.remove(&to);
                    self.try_neuron_mut(to)?.neighbours.remove(&previous);
                }
            }
        }

        let neuron = self.try_neuron_mut(gater)?;
        if !neuron.gated.contains(&connection) {
            neuron.gated.push(connection);
        }
        if !neuron.trace_extended.contains_key(&to) {
            neuron.neighbours.insert(to);
            let row = neuron.inputs.iter().map(|&cid| (cid, 0.0)).collect();
            neuron.trace_extended.insert(to, row);
        }
        let influences = neuron.trace_influences.entry(to).or_default();
        if !influences.contains(&connection) {
            influences.push(connection);
        }

        self.try_neuron_mut(to)?.neighbours.insert(gater);
        self.try_connection_mut(connection)?.gater = Some(gater);
        Ok(())
    }

    /// The connection between `id` and `target`, in either direction or
    /// through a gate, if one exists.
    pub fn connection_for_neuron(&self, id: NeuronId, target: NeuronId) -> Result<Option<ConnectionId>> {
        let neuron = self.try_neuron(id)?;
        if target == id && self.try_connection(neuron.self_connection)?.weight != 0.0 {
            return Ok(Some(neuron.self_connection));
        }
        for &cid in &neuron.projected {
            if self.try_connection(cid)?.to() == target {
                return Ok(Some(cid));
            }
        }
        for &cid in &neuron.inputs {
            if self.try_connection(cid)?.from() == target {
                return Ok(Some(cid));
            }
        }
        for &cid in &neuron.gated {
            let conn = self.try_connection(cid)?;
            if conn.from() == target || conn.to() == target {
                return Ok(Some(cid));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tracenet_core::error::NetworkError;

    fn table() -> IdentityTable {
        IdentityTable::with_seed(42)
    }

    #[test]
    fn fresh_neuron_has_an_inactive_self_connection() {
        let mut table = table();
        let n = table.create_neuron();
        let own = table.neuron(n).unwrap().self_connection();
        let conn = table.connection(own).unwrap();
        assert!(conn.is_self_connection());
        assert_eq!(conn.weight(), 0.0);
        assert_eq!(table.connection_for_neuron(n, n).unwrap(), None);
    }

    #[test]
    fn self_projection_reuses_the_self_connection() {
        let mut table = table();
        let n = table.create_neuron();
        let before = table.connection_count();
        let own = table.project(n, n, None).unwrap();
        assert_eq!(own, table.neuron(n).unwrap().self_connection());
        assert_eq!(table.connection(own).unwrap().weight(), 1.0);
        assert_eq!(table.connection_count(), before);
        assert_eq!(table.connection_for_neuron(n, n).unwrap(), Some(own));
    }

    #[test]
    fn project_is_idempotent_per_pair() {
        let mut table = table();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let first = table.project(a, b, None).unwrap();
        let weight = table.connection(first).unwrap().weight();
        let second = table.project(a, b, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(table.neuron(a).unwrap().projected().len(), 1);
        assert_eq!(table.neuron(b).unwrap().inputs().len(), 1);
        assert_eq!(table.connection(first).unwrap().weight(), weight);

        table.project(a, b, Some(0.3)).unwrap();
        assert_eq!(table.connection(first).unwrap().weight(), 0.3);
        assert_eq!(table.neuron(b).unwrap().eligibility_trace(first), Some(0.0));
    }

    #[test]
    fn connection_lookup_finds_both_directions() {
        let mut table = table();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let c = table.create_neuron();
        let ab = table.project(a, b, None).unwrap();
        assert_eq!(table.connection_for_neuron(a, b).unwrap(), Some(ab));
        assert_eq!(table.connection_for_neuron(b, a).unwrap(), Some(ab));
        assert_eq!(table.connection_for_neuron(a, c).unwrap(), None);
    }

    #[test]
    fn clamped_input_skips_state_update() {
        let mut table = table();
        let n = table.create_neuron();
        assert_eq!(table.activate_neuron(n, Some(0.7)).unwrap(), 0.7);
        let neuron = table.neuron(n).unwrap();
        assert_eq!(neuron.activation(), 0.7);
        assert_eq!(neuron.derivative(), 0.0);
        assert_eq!(neuron.bias(), 0.0);
        assert_eq!(neuron.state(), 0.0);
    }

    #[test]
    fn activation_sums_weighted_inputs_and_bias() {
        let mut table = table();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let ab = table.project(a, b, Some(0.5)).unwrap();
        table.neuron_mut(b).unwrap().set_bias(0.1);

        table.activate_neuron(a, Some(1.0)).unwrap();
        let out = table.activate_neuron(b, None).unwrap();

        let neuron = table.neuron(b).unwrap();
        assert_abs_diff_eq!(neuron.state(), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(out, Squash::Logistic.squash(0.6, false), epsilon = 1e-12);
        assert_abs_diff_eq!(neuron.derivative(), Squash::Logistic.squash(0.6, true), epsilon = 1e-12);
        // no self-recurrence: the trace is just gain * input activation
        assert_abs_diff_eq!(neuron.eligibility_trace(ab).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn self_recurrence_carries_state_and_traces() {
        let mut table = table();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let ab = table.project(a, b, Some(1.0)).unwrap();
        table.project(b, b, None).unwrap();
        table.neuron_mut(b).unwrap().set_bias(0.0);
        table.neuron_mut(b).unwrap().set_squash(Squash::Identity);

        table.activate_neuron(a, Some(1.0)).unwrap();
        table.activate_neuron(b, None).unwrap();
        table.activate_neuron(b, None).unwrap();

        let neuron = table.neuron(b).unwrap();
        assert_abs_diff_eq!(neuron.old_state(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(neuron.state(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(neuron.eligibility_trace(ab).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn gating_sets_gain_to_gater_activation() {
        let mut table = table();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let g = table.create_neuron();
        let ab = table.project(a, b, None).unwrap();

        table.gate(g, ab).unwrap();
        assert_eq!(table.connection(ab).unwrap().gater(), Some(g));
        let gater = table.neuron(g).unwrap();
        assert_eq!(gater.gated(), &[ab]);
        assert_eq!(gater.gated_neighbours().collect::<Vec<_>>(), vec![b]);
        assert!(table.neuron(b).unwrap().neighbours().any(|n| n == g));

        let activation = table.activate_neuron(g, None).unwrap();
        assert_eq!(table.connection(ab).unwrap().gain(), activation);
    }

    #[test]
    fn regating_moves_the_connection_to_the_new_gater() {
        let mut table = table();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let g1 = table.create_neuron();
        let g2 = table.create_neuron();
        let ab = table.project(a, b, None).unwrap();
        table.gate(g1, ab).unwrap();
        table.gate(g2, ab).unwrap();
        assert!(table.neuron(g1).unwrap().gated().is_empty());
        assert_eq!(table.neuron(g2).unwrap().gated(), &[ab]);
        assert_eq!(table.connection(ab).unwrap().gater(), Some(g2));
        assert_eq!(table.neuron(g1).unwrap().gated_neighbours().count(), 0);
        assert!(!table.neuron(b).unwrap().neighbours().any(|n| n == g1));
        assert!(table.neuron(b).unwrap().neighbours().any(|n| n == g2));
    }

    #[test]
    fn released_gater_stops_learning_through_the_old_gate() {
        let mut table = table();
        let x = table.create_neuron();
        let g1 = table.create_neuron();
        let g2 = table.create_neuron();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let xg = table.project(x, g1, Some(0.7)).unwrap();
        let ab = table.project(a, b, Some(0.5)).unwrap();
        table.project(b, b, None).unwrap();
        table.gate(g1, ab).unwrap();

        table.activate_neuron(x, Some(1.0)).unwrap();
        table.activate_neuron(a, Some(1.0)).unwrap();
        table.activate_neuron(g1, None).unwrap();
        table.activate_neuron(b, None).unwrap();
        assert!(table.neuron(g1).unwrap().extended_trace(b, xg).unwrap() != 0.0);

        table.gate(g2, ab).unwrap();
        assert_eq!(table.neuron(g1).unwrap().extended_trace(b, xg), None);

        for _ in 0..3 {
            table.activate_neuron(g1, None).unwrap();
            table.activate_neuron(b, None).unwrap();
            table.propagate_neuron(b, 0.1, Some(1.0)).unwrap();
        }
        let before = table.connection(xg).unwrap().weight();
        table.propagate_neuron(g1, 0.1, None).unwrap();

        let gater = table.neuron(g1).unwrap();
        assert_eq!(gater.error_projected(), 0.0);
        assert_eq!(gater.error_gated(), 0.0);
        assert_eq!(table.connection(xg).unwrap().weight(), before);
    }

    #[test]
    fn extended_trace_feeds_the_gater_gradient() {
        let mut table = table();
        let x = table.create_neuron();
        let g = table.create_neuron();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let xg = table.project(x, g, Some(0.7)).unwrap();
        let ab = table.project(a, b, Some(0.5)).unwrap();
        table.gate(g, ab).unwrap();

        table.activate_neuron(x, Some(1.0)).unwrap();
        table.activate_neuron(a, Some(0.8)).unwrap();
        table.activate_neuron(g, None).unwrap();
        table.activate_neuron(b, None).unwrap();

        let gater = table.neuron(g).unwrap();
        let trace = gater.eligibility_trace(xg).unwrap();
        // b is not self-recurrent: influence is weight(ab) * activation(a)
        let influence = 0.5 * 0.8;
        let xtrace = gater.extended_trace(b, xg).unwrap();
        assert_abs_diff_eq!(xtrace, gater.derivative() * trace * influence, epsilon = 1e-12);
        assert!(xtrace != 0.0);

        let rate = 0.3;
        table.propagate_neuron(b, rate, Some(1.0)).unwrap();
        let before = table.connection(xg).unwrap().weight();
        table.propagate_neuron(g, rate, None).unwrap();

        let responsibility = table.neuron(b).unwrap().error_responsibility();
        // g projects nowhere, so only the extended term contributes
        assert_eq!(table.neuron(g).unwrap().error_projected(), 0.0);
        assert_abs_diff_eq!(
            table.connection(xg).unwrap().weight() - before,
            rate * responsibility * xtrace,
            epsilon = 1e-12
        );
    }

    #[test]
    fn output_error_comes_from_target() {
        let mut table = table();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let ab = table.project(a, b, Some(0.2)).unwrap();
        table.neuron_mut(b).unwrap().set_bias(0.0);

        table.activate_neuron(a, Some(1.0)).unwrap();
        let out = table.activate_neuron(b, None).unwrap();
        table.propagate_neuron(b, 0.5, Some(1.0)).unwrap();

        let neuron = table.neuron(b).unwrap();
        let error = 1.0 - out;
        assert_abs_diff_eq!(neuron.error_responsibility(), error, epsilon = 1e-12);
        assert_abs_diff_eq!(neuron.error_projected(), error, epsilon = 1e-12);
        assert_eq!(neuron.error_gated(), 0.0);
        // gradient = error * eligibility (1.0)
        assert_abs_diff_eq!(table.connection(ab).unwrap().weight(), 0.2 + 0.5 * error, epsilon = 1e-12);
        assert_abs_diff_eq!(neuron.bias(), 0.5 * error, epsilon = 1e-12);
    }

    #[test]
    fn hidden_error_is_backpropagated() {
        let mut table = table();
        let a = table.create_neuron();
        let h = table.create_neuron();
        let o = table.create_neuron();
        table.project(a, h, Some(0.4)).unwrap();
        let ho = table.project(h, o, Some(0.6)).unwrap();

        table.activate_neuron(a, Some(1.0)).unwrap();
        table.activate_neuron(h, None).unwrap();
        table.activate_neuron(o, None).unwrap();
        table.propagate_neuron(o, 0.0, Some(0.0)).unwrap();
        table.propagate_neuron(h, 0.0, None).unwrap();

        let out_error = table.neuron(o).unwrap().error_responsibility();
        let hidden = table.neuron(h).unwrap();
        let gain = table.connection(ho).unwrap().gain();
        assert_abs_diff_eq!(
            hidden.error_projected(),
            hidden.derivative() * out_error * gain * 0.6,
            epsilon = 1e-12
        );
        assert_eq!(hidden.error_gated(), 0.0);
    }

    #[test]
    fn gater_receives_gated_error() {
        let mut table = table();
        let a = table.create_neuron();
        let b = table.create_neuron();
        let g = table.create_neuron();
        let ab = table.project(a, b, Some(0.5)).unwrap();
        table.gate(g, ab).unwrap();

        table.activate_neuron(a, Some(1.0)).unwrap();
        table.activate_neuron(g, None).unwrap();
        table.activate_neuron(b, None).unwrap();
        table.propagate_neuron(b, 0.0, Some(1.0)).unwrap();
        table.propagate_neuron(g, 0.0, None).unwrap();

        let responsibility = table.neuron(b).unwrap().error_responsibility();
        let gater = table.neuron(g).unwrap();
        // influence = weight(ab) * activation(a)
        assert_abs_diff_eq!(
            gater.error_gated(),
            gater.derivative() * responsibility * 0.5,
            epsilon = 1e-12
        );
        assert!(gater.error_gated() != 0.0);
        assert_eq!(gater.error_projected(), 0.0);
    }

    #[test]
    fn unknown_identities_surface_as_errors() {
        let mut table = table();
        let a = table.create_neuron();
        assert_eq!(
            table.activate_neuron(NeuronId(99), None),
            Err(NetworkError::UnknownNeuron(NeuronId(99)))
        );
        assert_eq!(
            table.project(a, NeuronId(5), None),
            Err(NetworkError::UnknownNeuron(NeuronId(5)))
        );
        assert_eq!(
            table.gate(a, ConnectionId(77)),
            Err(NetworkError::UnknownConnection(ConnectionId(77)))
        );
    }
}
