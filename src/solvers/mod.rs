//! Reference solver implementations for the solver seam.
//!
//! These modules show how to implement
//! [`MulticutSolver`](crate::traits::MulticutSolver) and
//! [`SolverFactory`](crate::traits::SolverFactory) for concrete solvers.
//!
//! They are both usable and serve as templates:
//! - [`greedy`] : greedy additive edge contraction, a strong rounding
//!   heuristic for multicut objectives.
//! - [`IdentityFactory`] : leaves the labeling untouched; useful as a
//!   baseline and for exercising the fallback branch of a fusion step.

pub mod greedy;

pub use greedy::{GreedyContraction, GreedyContractionFactory};

use crate::error::Error;
use crate::graph::GraphObjective;
use crate::traits::{MulticutSolver, ProgressObserver, SolverFactory};

/// Solver that returns its input labeling unchanged.
pub struct IdentitySolver<'a> {
    objective: &'a GraphObjective,
}

impl MulticutSolver for IdentitySolver<'_> {
    fn optimize(
        &mut self,
        node_labels: &mut [u64],
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<(), Error> {
        debug_assert_eq!(node_labels.len(), self.objective.num_nodes());
        if let Some(obs) = observer.as_deref_mut() {
            obs.started(self.objective.num_nodes(), self.objective.num_edges());
            obs.finished(self.objective.evaluate(node_labels));
        }
        Ok(())
    }
}

/// Factory for [`IdentitySolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFactory;

impl SolverFactory for IdentityFactory {
    fn create<'a>(&self, objective: &'a GraphObjective) -> Box<dyn MulticutSolver + 'a> {
        Box::new(IdentitySolver { objective })
    }
}
