//! The solver seam.
//!
//! The crate never solves a multicut instance itself; it builds a
//! [`GraphObjective`] and hands it to a [`SolverFactory`]. The factory
//! produces one owning solver handle per call, bound to the objective for
//! the duration of that call and dropped afterwards — release is guaranteed
//! on every exit path, including error returns.
//!
//! Semantics required from an implementation:
//! - `create` must return a fresh, independent solver; factories are shared
//!   across calls and must be stateless or internally synchronized.
//! - `optimize` runs to completion synchronously and rewrites the node
//!   labeling in place. Only the induced partition matters; absolute label
//!   values are free.
//! - Any failure is reported through [`Error::Solver`](crate::Error::Solver)
//!   and is passed through to the caller unchanged; the core performs no
//!   retry and no recovery.

use crate::error::Error;
use crate::graph::GraphObjective;

/// One optimization run over a [`GraphObjective`].
pub trait MulticutSolver {
    /// Optimize `node_labels` in place. `observer`, when present, receives
    /// progress callbacks; `None` must be a safe no-op path.
    fn optimize(
        &mut self,
        node_labels: &mut [u64],
        observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<(), Error>;
}

/// Shared factory producing independent solver instances.
pub trait SolverFactory {
    /// Build a solver bound to `objective`. The returned handle borrows the
    /// objective and is dropped by the caller after a single `optimize`.
    fn create<'a>(&self, objective: &'a GraphObjective) -> Box<dyn MulticutSolver + 'a>;
}

/// Progress notifications emitted by a solver run.
///
/// All methods have empty defaults, so implementations override only what
/// they care about.
pub trait ProgressObserver {
    /// The solver accepted a problem of the given size.
    fn started(&mut self, _num_nodes: usize, _num_edges: usize) {}

    /// The incumbent objective value improved.
    fn improved(&mut self, _energy: f64) {}

    /// The run finished with the given objective value.
    fn finished(&mut self, _energy: f64) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {}

/// Observer used for verbose runs. Emits `tracing` events when the
/// `tracing` feature is enabled and stays silent otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn started(&mut self, num_nodes: usize, num_edges: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(num_nodes, num_edges, "solver started");
        #[cfg(not(feature = "tracing"))]
        let _ = (num_nodes, num_edges);
    }

    fn improved(&mut self, energy: f64) {
        #[cfg(feature = "tracing")]
        tracing::trace!(energy, "objective improved");
        #[cfg(not(feature = "tracing"))]
        let _ = energy;
    }

    fn finished(&mut self, energy: f64) {
        #[cfg(feature = "tracing")]
        tracing::debug!(energy, "solver finished");
        #[cfg(not(feature = "tracing"))]
        let _ = energy;
    }
}
