//! Greedy additive edge contraction.
//!
//! Starts from singleton classes and repeatedly contracts the class pair
//! with the largest positive accumulated cost; contracting a pair removes
//! its cost from the objective (the edge is no longer cut) and merges its
//! cost tables. The run stops when no remaining pair is attractive. The
//! priority queue uses lazy deletion: popped entries are re-checked against
//! the current cost table and skipped when stale.

use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::graph::GraphObjective;
use crate::traits::{MulticutSolver, ProgressObserver, SolverFactory};
use crate::ufd::Ufd;

/// Greedy edge-contraction solver bound to one graph objective.
pub struct GreedyContraction<'a> {
    objective: &'a GraphObjective,
}

impl<'a> GreedyContraction<'a> {
    /// Bind a solver to `objective`.
    pub fn new(objective: &'a GraphObjective) -> Self {
        Self { objective }
    }
}

impl MulticutSolver for GreedyContraction<'_> {
    fn optimize(
        &mut self,
        node_labels: &mut [u64],
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<(), Error> {
        let num_nodes = self.objective.num_nodes();
        assert_eq!(
            node_labels.len(),
            num_nodes,
            "node labeling must cover every graph node"
        );

        if let Some(obs) = observer.as_deref_mut() {
            obs.started(num_nodes, self.objective.num_edges());
        }

        // Per-class cost tables, keyed by live representatives.
        let mut ufd = Ufd::new(num_nodes);
        let mut adjacency: Vec<FxHashMap<usize, f64>> =
            vec![FxHashMap::default(); num_nodes];
        let mut heap: BinaryHeap<(OrderedFloat<f64>, usize, usize)> = BinaryHeap::new();
        let mut energy = 0.0f64;
        for (u, v, cost) in self.objective.edges() {
            adjacency[u].insert(v, cost);
            adjacency[v].insert(u, cost);
            energy += cost;
            if cost > 0.0 {
                heap.push((OrderedFloat(cost), u, v));
            }
        }

        while let Some((OrderedFloat(cost), a, b)) = heap.pop() {
            if cost <= 0.0 {
                break;
            }
            let ra = ufd.find(a);
            let rb = ufd.find(b);
            if ra == rb {
                continue;
            }
            // Stale entry: the pair's accumulated cost changed since push.
            if adjacency[ra].get(&rb) != Some(&cost) {
                continue;
            }

            let (root, absorbed) = ufd
                .merge(ra, rb)
                .expect("distinct representatives must merge");
            energy -= cost;

            let dropped = std::mem::take(&mut adjacency[absorbed]);
            adjacency[root].remove(&absorbed);
            for (neighbor, weight) in dropped {
                if neighbor == root {
                    continue;
                }
                adjacency[neighbor].remove(&absorbed);
                let total = {
                    let entry = adjacency[root].entry(neighbor).or_insert(0.0);
                    *entry += weight;
                    *entry
                };
                *adjacency[neighbor].entry(root).or_insert(0.0) += weight;
                if total > 0.0 {
                    heap.push((OrderedFloat(total), root, neighbor));
                }
            }

            if let Some(obs) = observer.as_deref_mut() {
                obs.improved(energy);
            }
        }

        for (node, label) in node_labels.iter_mut().enumerate() {
            *label = ufd.find(node) as u64;
        }
        if let Some(obs) = observer.as_deref_mut() {
            obs.finished(energy);
        }
        Ok(())
    }
}

/// Factory for [`GreedyContraction`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyContractionFactory;

impl SolverFactory for GreedyContractionFactory {
    fn create<'a>(&self, objective: &'a GraphObjective) -> Box<dyn MulticutSolver + 'a> {
        Box::new(GreedyContraction::new(objective))
    }
}
