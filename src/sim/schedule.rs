//! Deferred tasks with cancellable handles
//!
//! Every delayed action the session takes (expiry, display tick, completion
//! check, success reveal, delayed tracking end, fade start) goes through one
//! queue. Due tasks pop in due-time order, ties in scheduling order, so the
//! expiry/completion race always resolves the same way for the same inputs.

use crate::host::SuccessSummary;

/// Opaque handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Work the session defers
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// One-shot challenge expiry
    ChallengeExpiry,
    /// Periodic countdown display refresh
    CountdownTick,
    /// Post-collection check for all items collected
    CompletionCheck,
    /// Show the success presentation
    RevealSuccess(SuccessSummary),
    /// End tracking after the failure presentation has rendered
    EndTracking,
    /// Start fading a collected entity
    BeginFade(usize),
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TaskHandle,
    due_ms: u64,
    task: Deferred,
}

/// Ordered queue of deferred tasks
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task for `due_ms`
    pub fn schedule(&mut self, due_ms: u64, task: Deferred) -> TaskHandle {
        let handle = TaskHandle(self.next_seq);
        self.next_seq += 1;
        self.pending.push(Pending {
            handle,
            due_ms,
            task,
        });
        handle
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Remove and return the earliest task due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, Deferred)> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= now)
            .min_by_key(|(_, p)| (p.due_ms, p.handle.0))
            .map(|(i, _)| i)?;
        let pending = self.pending.remove(position);
        Some((pending.due_ms, pending.task))
    }

    /// Keep only tasks matching the predicate
    pub fn retain(&mut self, mut keep: impl FnMut(&Deferred) -> bool) {
        self.pending.retain(|p| keep(&p.task));
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest due time, if anything is queued
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|p| p.due_ms).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, Deferred::CompletionCheck);
        scheduler.schedule(100, Deferred::CountdownTick);
        scheduler.schedule(200, Deferred::ChallengeExpiry);

        assert_eq!(scheduler.pop_due(1_000), Some((100, Deferred::CountdownTick)));
        assert_eq!(scheduler.pop_due(1_000), Some((200, Deferred::ChallengeExpiry)));
        assert_eq!(scheduler.pop_due(1_000), Some((300, Deferred::CompletionCheck)));
        assert_eq!(scheduler.pop_due(1_000), None);
    }

    #[test]
    fn test_ties_pop_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(500, Deferred::CompletionCheck);
        scheduler.schedule(500, Deferred::ChallengeExpiry);
        assert_eq!(scheduler.pop_due(500).map(|(_, t)| t), Some(Deferred::CompletionCheck));
        assert_eq!(scheduler.pop_due(500).map(|(_, t)| t), Some(Deferred::ChallengeExpiry));
    }

    #[test]
    fn test_not_due_yet() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1_000, Deferred::EndTracking);
        assert_eq!(scheduler.pop_due(999), None);
        assert_eq!(scheduler.next_due(), Some(1_000));
        assert!(scheduler.pop_due(1_000).is_some());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let expiry = scheduler.schedule(1_000, Deferred::ChallengeExpiry);
        scheduler.schedule(1_000, Deferred::BeginFade(2));

        assert!(scheduler.is_pending(expiry));
        assert!(scheduler.cancel(expiry));
        assert!(!scheduler.cancel(expiry));
        assert!(!scheduler.is_pending(expiry));
        assert_eq!(scheduler.pop_due(5_000), Some((1_000, Deferred::BeginFade(2))));
    }

    #[test]
    fn test_retain_filters_by_task() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10, Deferred::CountdownTick);
        scheduler.schedule(20, Deferred::EndTracking);
        scheduler.retain(|t| matches!(t, Deferred::EndTracking));
        assert_eq!(scheduler.len(), 1);
        scheduler.clear();
        assert!(scheduler.is_empty());
    }
}
