/// Outcome of one reconciliation sweep.
///
/// Sweeps never abort on a single entity: a failed transition is logged,
/// counted here, and left for the next tick to retry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Entities whose state changed this invocation.
    pub transitioned: usize,
    /// Entities whose write failed and will be retried by a later tick.
    pub failed: usize,
}

impl SweepReport {
    pub fn record_success(&mut self) {
        self.transitioned += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }
}
