use core::time::Duration;

use smallvec::SmallVec;

/// Delay observed between the two phases of memory and three-in-a-row turns.
pub const REVEAL_DELAY: Duration = Duration::from_millis(2000);

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// A timer the host must arm, reporting back with [`TaskId`] once it elapses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub delay: Duration,
}

impl ScheduledTask {
    pub fn delay_millis(&self) -> u32 {
        self.delay.as_millis().try_into().unwrap_or(u32::MAX)
    }
}

/// Holds second-phase work until its timer fires.
///
/// Every task is handed out at most once by [`RevealScheduler::take`]; after
/// [`RevealScheduler::cancel_all`] no previously issued id yields anything.
#[derive(Clone, Debug)]
pub struct RevealScheduler<P> {
    next_id: u64,
    pending: SmallVec<[(TaskId, P); 2]>,
}

impl<P> Default for RevealScheduler<P> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: SmallVec::new(),
        }
    }
}

impl<P> RevealScheduler<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: Duration, phase: P) -> ScheduledTask {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.push((id, phase));
        log::trace!("scheduled {:?} in {:?}", id, delay);
        ScheduledTask { id, delay }
    }

    pub fn take(&mut self, id: TaskId) -> Option<P> {
        let index = self.pending.iter().position(|(pending_id, _)| *pending_id == id)?;
        Some(self.pending.remove(index).1)
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        if cancelled > 0 {
            log::debug!("cancelled {} scheduled task(s)", cancelled);
        }
        cancelled
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_exactly_once() {
        let mut scheduler = RevealScheduler::new();
        let task = scheduler.schedule(REVEAL_DELAY, "flip back");

        assert_eq!(task.delay_millis(), 2000);
        assert_eq!(scheduler.take(task.id), Some("flip back"));
        assert_eq!(scheduler.take(task.id), None);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = RevealScheduler::new();
        let first = scheduler.schedule(REVEAL_DELAY, 1);
        let second = scheduler.schedule(REVEAL_DELAY, 2);

        assert_eq!(scheduler.cancel_all(), 2);
        assert_eq!(scheduler.take(first.id), None);
        assert_eq!(scheduler.take(second.id), None);
    }

    #[test]
    fn ids_are_not_reused_after_cancel() {
        let mut scheduler = RevealScheduler::new();
        let stale = scheduler.schedule(REVEAL_DELAY, 'a');
        scheduler.cancel_all();
        let fresh = scheduler.schedule(REVEAL_DELAY, 'b');

        assert_ne!(stale.id, fresh.id);
        assert_eq!(scheduler.take(stale.id), None);
        assert_eq!(scheduler.take(fresh.id), Some('b'));
    }
}
