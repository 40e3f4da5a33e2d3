/// Terminal state of one `fit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// Both rating maps moved less than the tolerance in the last iteration.
    Converged,
    /// The iteration cap was reached first. Not an error: the ratings are
    /// still usable, the caller just knows they are unconverged.
    MaxIterExhausted
}

/// What one `fit` call did, returned to the caller for inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub status: ConvergenceStatus,
    pub iterations: usize,
    pub league_average: f64
}

impl FitSummary {
    pub fn converged(&self) -> bool {
        self.status == ConvergenceStatus::Converged
    }
}
