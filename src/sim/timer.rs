/// Single-slot discrete-event scheduler.
///
/// Holds at most one pending `(deadline, target)` pair. Scheduling replaces
/// any earlier pending entry; `take_due` hands the entry out exactly once.
/// Times are milliseconds on whatever clock the caller uses.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pending<T> {
    pub deadline: u64,
    pub target: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    pending: Option<Pending<T>>,
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Scheduler { pending: None }
    }

    /// Arm for `now + delay_ms`. Returns the entry it superseded, if any.
    pub fn schedule(&mut self, now: u64, delay_ms: u32, target: T) -> Option<Pending<T>> {
        let deadline = now.saturating_add(u64::from(delay_ms));
        self.pending.replace(Pending { deadline, target })
    }

    pub fn cancel(&mut self) -> Option<Pending<T>> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<Pending<T>> {
        self.pending
    }

    /// Remove and return the pending entry if its deadline has passed.
    pub fn take_due(&mut self, now: u64) -> Option<Pending<T>> {
        match self.pending {
            Some(p) if p.deadline <= now => self.pending.take(),
            _ => None,
        }
    }
}

impl<T: Copy> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler::new()
    }
}
