//! Cancellable one-shot timers on a logical clock
//!
//! Every deferred wait of the tutorial (step timeout, resolve delay, transition
//! pause, demo move) is a timer armed here. Cancelling removes the timer
//! outright, so a cancelled timer can never be returned by `pop_due`, even if
//! its deadline has already passed in the current tick.

/// Opaque handle identifying one armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct PendingTimer<K> {
    handle: TimerHandle,
    kind: K,
    deadline: f32,
}

/// A timer whose deadline was reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTimer<K> {
    pub handle: TimerHandle,
    pub kind: K,
    /// Logical time the timer was due, which may be earlier than `now`
    pub deadline: f32,
}

/// Scheduler for cancellable one-shot timers tagged with a kind `K`
#[derive(Debug, Clone)]
pub struct TimerScheduler<K> {
    now: f32,
    next_id: u64,
    pending: Vec<PendingTimer<K>>,
}

impl<K> Default for TimerScheduler<K> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<K: Copy> TimerScheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in seconds
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Move the clock forward. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
    }

    /// Arm a timer due `delay` seconds from now
    pub fn arm(&mut self, kind: K, delay: f32) -> TimerHandle {
        self.arm_at(kind, self.now, delay)
    }

    /// Arm a timer due `delay` seconds after `base`
    pub fn arm_at(&mut self, kind: K, base: f32, delay: f32) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            kind,
            deadline: base + delay.max(0.0),
        });
        handle
    }

    /// Cancel whatever `slot` holds, then arm a new timer into it
    pub fn rearm(&mut self, slot: &mut Option<TimerHandle>, kind: K, base: f32, delay: f32) -> TimerHandle {
        self.cancel_slot(slot);
        let handle = self.arm_at(kind, base, delay);
        *slot = Some(handle);
        handle
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    /// Cancel the timer held in `slot` (if any) and empty the slot
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerHandle>) -> bool {
        match slot.take() {
            Some(handle) => self.cancel(handle),
            None => false,
        }
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    /// Seconds until the timer is due (0 if overdue), None if not live
    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| (t.deadline - self.now).max(0.0))
    }

    pub fn live_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return the earliest timer due at or before `now`.
    /// Timers with equal deadlines fire in the order they were armed.
    pub fn pop_due(&mut self) -> Option<FiredTimer<K>> {
        let now = self.now;
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by(|(_, a), (_, b)| {
                a.deadline
                    .total_cmp(&b.deadline)
                    .then(a.handle.0.cmp(&b.handle.0))
            })?;
        let timer = self.pending.remove(index);
        Some(FiredTimer {
            handle: timer.handle,
            kind: timer.kind,
            deadline: timer.deadline,
        })
    }

    /// Cancel every pending timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        A,
        B,
    }

    #[test]
    fn test_fires_at_deadline() {
        let mut timers = TimerScheduler::new();
        let handle = timers.arm(Kind::A, 1.0);

        timers.advance(0.5);
        assert!(timers.pop_due().is_none());
        assert_eq!(timers.remaining(handle), Some(0.5));

        timers.advance(0.5);
        let fired = timers.pop_due().unwrap();
        assert_eq!(fired.handle, handle);
        assert_eq!(fired.kind, Kind::A);
        assert_eq!(fired.deadline, 1.0);
        assert!(!timers.is_live(handle));
        assert!(timers.pop_due().is_none());
    }

    #[test]
    fn test_cancel_wins_over_due() {
        let mut timers = TimerScheduler::new();
        let handle = timers.arm(Kind::A, 1.0);
        timers.advance(2.0);
        // Due but not yet popped: cancelling still prevents firing
        assert!(timers.cancel(handle));
        assert!(timers.pop_due().is_none());
        assert!(!timers.cancel(handle));
    }

    #[test]
    fn test_rearm_supersedes_previous() {
        let mut timers = TimerScheduler::new();
        let mut slot = None;
        let first = timers.rearm(&mut slot, Kind::A, 0.0, 1.0);
        let second = timers.rearm(&mut slot, Kind::B, 0.0, 2.0);

        assert_eq!(slot, Some(second));
        assert!(!timers.is_live(first));
        assert_eq!(timers.live_count(), 1);

        timers.advance(5.0);
        assert_eq!(timers.pop_due().map(|f| f.kind), Some(Kind::B));
    }

    #[test]
    fn test_due_order_and_ties() {
        let mut timers = TimerScheduler::new();
        let late = timers.arm(Kind::A, 3.0);
        let tie_first = timers.arm(Kind::B, 1.0);
        let tie_second = timers.arm(Kind::A, 1.0);
        timers.advance(10.0);

        assert_eq!(timers.pop_due().map(|f| f.handle), Some(tie_first));
        assert_eq!(timers.pop_due().map(|f| f.handle), Some(tie_second));
        assert_eq!(timers.pop_due().map(|f| f.handle), Some(late));
    }

    #[test]
    fn test_arm_at_past_base() {
        let mut timers = TimerScheduler::new();
        timers.advance(10.0);
        // Chained from an earlier deadline: due immediately
        timers.arm_at(Kind::A, 8.0, 1.0);
        let fired = timers.pop_due().unwrap();
        assert_eq!(fired.deadline, 9.0);
    }

    #[test]
    fn test_ignores_bad_deltas_and_clears() {
        let mut timers = TimerScheduler::new();
        timers.advance(-1.0);
        timers.advance(f32::NAN);
        assert_eq!(timers.now(), 0.0);

        let mut slot = None;
        timers.rearm(&mut slot, Kind::A, 0.0, 1.0);
        timers.arm(Kind::B, 1.0);
        timers.clear();
        assert_eq!(timers.live_count(), 0);
        assert!(!timers.cancel_slot(&mut slot));
        assert!(slot.is_none());
    }
}
