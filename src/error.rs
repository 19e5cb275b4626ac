use thiserror::Error;

/** errors surfaced by the solver.

Cancellation is not an error: the solver simply stops and keeps the
partial solution. Cycle detection during chain evaluation is handled
locally and never surfaces. */
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// the bounded priority queue is full; callers skip the insertion
    #[error("priority queue full")]
    QueueFull,
    /// candidate counts and the flat candidate array disagree
    #[error("invalid problem input: {0}")]
    InvalidInput(String),
}
