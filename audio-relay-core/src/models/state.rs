/// Scheduling loop state machine.
///
/// State transitions:
/// ```text
/// idle → waiting → firing → cooldown → waiting
///           ↓         ↓         ↓
///                 cancelled (explicit stop only)
/// ```
///
/// `Cooldown` covers both the hourly loop's re-entrancy pause and the
/// interval loop's between-firings sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Waiting,
    Firing,
    Cooldown,
    Cancelled,
}

impl SchedulerPhase {
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    pub fn is_firing(&self) -> bool {
        matches!(self, Self::Firing)
    }

    /// Whether the loop has terminated. Only an explicit stop gets here.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
