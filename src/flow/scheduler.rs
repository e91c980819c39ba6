//! Cancellable timed work.
//!
//! Every task is owned by the step that scheduled it. Leaving a step cancels
//! what it owns, so a late timer can never move the user after they have
//! already gone somewhere else.

use std::time::{Duration, Instant};

use crate::models::{PathTag, StepId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Move to a step (single-select auto-advance, end of loading).
    Navigate(StepId),
    /// Apply loading phase `phase`; one past the last phase means done.
    LoadingTick { path: PathTag, phase: usize },
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    due: Instant,
    seq: u64,
    owner: StepId,
    action: Action,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, from: Instant, delay: Duration, owner: StepId, action: Action) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(ScheduledTask {
            due: from + delay,
            seq,
            owner,
            action,
        });
    }

    /// Drop every task owned by `owner`. Returns how many were dropped.
    pub fn cancel_owned_by(&mut self, owner: &StepId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.owner != owner);
        before - self.tasks.len()
    }

    pub fn has_pending_for(&self, owner: &StepId) -> bool {
        self.tasks.iter().any(|t| &t.owner == owner)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Remove and return the earliest task due at `now`, if any.
    ///
    /// Ties keep scheduling order. Callers pop one at a time because firing a
    /// task may cancel or schedule others.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, StepId, Action)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        let task = self.tasks.remove(index);
        Some((task.due, task.owner, task.action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str) -> StepId {
        StepId::new(id)
    }

    #[test]
    fn test_pops_in_deadline_order() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(now, Duration::from_millis(500), step("b"), Action::Navigate(step("y")));
        scheduler.schedule(now, Duration::from_millis(100), step("a"), Action::Navigate(step("x")));

        assert_eq!(scheduler.next_deadline(), Some(now + Duration::from_millis(100)));
        assert_eq!(scheduler.pop_due(now), None);

        let later = now + Duration::from_millis(600);
        assert_eq!(
            scheduler.pop_due(later),
            Some((now + Duration::from_millis(100), step("a"), Action::Navigate(step("x"))))
        );
        assert_eq!(
            scheduler.pop_due(later),
            Some((now + Duration::from_millis(500), step("b"), Action::Navigate(step("y"))))
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_same_deadline_keeps_schedule_order() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        let delay = Duration::from_millis(10);
        scheduler.schedule(now, delay, step("a"), Action::Navigate(step("first")));
        scheduler.schedule(now, delay, step("a"), Action::Navigate(step("second")));

        let later = now + delay;
        assert_eq!(
            scheduler.pop_due(later).map(|(_, _, a)| a),
            Some(Action::Navigate(step("first")))
        );
        assert_eq!(
            scheduler.pop_due(later).map(|(_, _, a)| a),
            Some(Action::Navigate(step("second")))
        );
    }

    #[test]
    fn test_cancel_only_touches_owner() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        let delay = Duration::from_millis(10);
        scheduler.schedule(now, delay, step("a"), Action::Navigate(step("x")));
        scheduler.schedule(
            now,
            delay,
            step("loadingA"),
            Action::LoadingTick { path: PathTag::A, phase: 0 },
        );

        assert_eq!(scheduler.cancel_owned_by(&step("a")), 1);
        assert!(!scheduler.has_pending_for(&step("a")));
        assert!(scheduler.has_pending_for(&step("loadingA")));
        assert_eq!(scheduler.cancel_owned_by(&step("a")), 0);
    }
}
