//! Challenge countdown
//!
//! Pure bookkeeping: the timer knows when it started and how long it runs.
//! The one-shot expiry and the display tick are scheduled by the session,
//! which owns the handles.

use serde::{Deserialize, Serialize};

use crate::consts::CHALLENGE_DURATION_MS;

/// Timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPhase {
    Idle,
    Running,
    /// Expiry fired while running
    Expired,
}

/// Visual urgency of the countdown badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyBand {
    /// 21 seconds or more
    Calm,
    /// 11-20 seconds
    Warning,
    /// 10 seconds or less
    Urgent,
}

impl UrgencyBand {
    /// Band for a remaining-seconds value; None once the countdown hits zero
    pub fn for_remaining(seconds: u64) -> Option<Self> {
        match seconds {
            0 => None,
            1..=10 => Some(UrgencyBand::Urgent),
            11..=20 => Some(UrgencyBand::Warning),
            _ => Some(UrgencyBand::Calm),
        }
    }
}

/// Wall-clock challenge countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeTimer {
    duration_ms: u64,
    started_at: Option<u64>,
    phase: TimerPhase,
}

impl Default for ChallengeTimer {
    fn default() -> Self {
        Self::new(CHALLENGE_DURATION_MS)
    }
}

impl ChallengeTimer {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            started_at: None,
            phase: TimerPhase::Idle,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    /// Start the countdown. Returns false (and does nothing) if already running.
    pub fn start(&mut self, now: u64) -> bool {
        if self.phase == TimerPhase::Running {
            log::debug!("Challenge timer already running, ignoring start");
            return false;
        }
        self.started_at = Some(now);
        self.phase = TimerPhase::Running;
        true
    }

    /// When the one-shot expiry is due
    pub fn deadline(&self) -> Option<u64> {
        match self.phase {
            TimerPhase::Running => self.started_at.map(|t| t.saturating_add(self.duration_ms)),
            _ => None,
        }
    }

    /// Whole seconds left, rounded up. Zero when not running.
    pub fn remaining_seconds(&self, now: u64) -> u64 {
        let (TimerPhase::Running, Some(start)) = (self.phase, self.started_at) else {
            return 0;
        };
        let elapsed = now.saturating_sub(start);
        let remaining = self.duration_ms.saturating_sub(elapsed);
        remaining.div_ceil(1000)
    }

    /// Mark the expiry as fired
    pub fn expire(&mut self) {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Expired;
        }
    }

    /// Back to idle from any phase
    pub fn stop(&mut self) {
        self.phase = TimerPhase::Idle;
        self.started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_duration_right_after_start() {
        let mut timer = ChallengeTimer::default();
        assert_eq!(timer.remaining_seconds(1_000), 0);
        assert!(timer.start(1_000));
        assert_eq!(timer.remaining_seconds(1_000), 30);
        assert_eq!(timer.deadline(), Some(31_000));
    }

    #[test]
    fn test_remaining_rounds_up() {
        let mut timer = ChallengeTimer::default();
        timer.start(0);
        assert_eq!(timer.remaining_seconds(1), 30);
        assert_eq!(timer.remaining_seconds(999), 30);
        assert_eq!(timer.remaining_seconds(1_000), 29);
        assert_eq!(timer.remaining_seconds(29_001), 1);
        assert_eq!(timer.remaining_seconds(30_000), 0);
        assert_eq!(timer.remaining_seconds(45_000), 0);
    }

    #[test]
    fn test_remaining_non_increasing() {
        let mut timer = ChallengeTimer::default();
        timer.start(500);
        let mut last = timer.remaining_seconds(500);
        for now in (500..40_000).step_by(37) {
            let r = timer.remaining_seconds(now);
            assert!(r <= last);
            last = r;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_double_start_ignored() {
        let mut timer = ChallengeTimer::default();
        timer.start(100);
        assert!(!timer.start(5_000));
        assert_eq!(timer.started_at(), Some(100));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = ChallengeTimer::default();
        timer.stop();
        assert_eq!(timer.phase(), TimerPhase::Idle);

        timer.start(0);
        timer.expire();
        assert_eq!(timer.phase(), TimerPhase::Expired);
        assert_eq!(timer.remaining_seconds(10), 0);

        timer.stop();
        timer.stop();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.started_at(), None);
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn test_urgency_bands() {
        assert_eq!(UrgencyBand::for_remaining(30), Some(UrgencyBand::Calm));
        assert_eq!(UrgencyBand::for_remaining(21), Some(UrgencyBand::Calm));
        assert_eq!(UrgencyBand::for_remaining(20), Some(UrgencyBand::Warning));
        assert_eq!(UrgencyBand::for_remaining(11), Some(UrgencyBand::Warning));
        assert_eq!(UrgencyBand::for_remaining(10), Some(UrgencyBand::Urgent));
        assert_eq!(UrgencyBand::for_remaining(1), Some(UrgencyBand::Urgent));
        assert_eq!(UrgencyBand::for_remaining(0), None);
    }
}
