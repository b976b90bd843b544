//! Collaborator boundary
//!
//! The session core never touches a display tree, an audio device or the
//! tracking runtime directly. It talks to whatever implements [`Host`].

use serde::Serialize;

use crate::error::EnvironmentError;
use crate::sim::UrgencyBand;

/// Status line shown over the camera view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusMessage {
    /// Session started, waiting for the first surface
    Scanning,
    /// Frame had no surface hit and nothing is placed yet
    PointAtFloor,
    /// Collectibles placed, countdown running
    CountdownPrompt,
    /// A collectible was just picked up
    TreasureFound,
}

impl StatusMessage {
    pub fn text(&self) -> String {
        match self {
            StatusMessage::Scanning => "Scanning for surfaces...".to_string(),
            StatusMessage::PointAtFloor => "Point camera at floor to find treasures.".to_string(),
            StatusMessage::CountdownPrompt => format!(
                "{} seconds to collect all treasures!",
                crate::consts::CHALLENGE_DURATION_SECS
            ),
            StatusMessage::TreasureFound => "Treasure found!".to_string(),
        }
    }
}

/// Collection counter ("2 / 4") and progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterDisplay {
    pub collected: usize,
    pub total: usize,
}

impl CounterDisplay {
    /// Progress bar fill, 0-100
    pub fn progress_percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.collected as f32 / self.total as f32 * 100.0
    }
}

/// Countdown badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountdownDisplay {
    pub seconds: u64,
    /// None when the countdown is inactive
    pub band: Option<UrgencyBand>,
}

impl CountdownDisplay {
    /// Badge for a running countdown
    pub fn running(seconds: u64) -> Self {
        Self {
            seconds,
            band: UrgencyBand::for_remaining(seconds),
        }
    }

    /// Inactive badge showing the full challenge length
    pub fn inactive() -> Self {
        Self {
            seconds: crate::consts::CHALLENGE_DURATION_SECS,
            band: None,
        }
    }

    /// Two digits while a single-digit countdown is running
    pub fn text(&self) -> String {
        if self.seconds > 0 && self.seconds < 10 {
            format!("0{}", self.seconds)
        } else {
            self.seconds.to_string()
        }
    }
}

/// One collected reward, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardEntry {
    pub number: usize,
    pub reward: u32,
}

/// Everything the success screen needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessSummary {
    pub items_collected: usize,
    pub rewards: Vec<RewardEntry>,
    /// Challenge start to last completion check
    pub elapsed_ms: Option<u64>,
}

impl SuccessSummary {
    pub fn total_reward(&self) -> u32 {
        self.rewards.iter().map(|r| r.reward).sum()
    }

    pub fn elapsed_text(&self) -> String {
        format_elapsed(self.elapsed_ms)
    }
}

/// Everything the failure screen needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FailureSummary {
    pub items_remaining: usize,
    pub items_collected: usize,
}

impl FailureSummary {
    /// "You were just short by 1 treasure." / "... 3 treasures."
    pub fn shortfall_text(&self) -> String {
        let plural = if self.items_remaining == 1 { "" } else { "s" };
        format!(
            "You were just short by {} treasure{}.",
            self.items_remaining, plural
        )
    }
}

/// Format an elapsed time as "42s" or "1m 5s"
pub fn format_elapsed(elapsed_ms: Option<u64>) -> String {
    let Some(ms) = elapsed_ms else {
        return "Unknown".to_string();
    };
    let total_secs = ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Acknowledgment sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackKind {
    Collect,
    Success,
}

/// Presentation layer. Calls are assumed to render synchronously.
pub trait Presenter {
    fn present_status(&mut self, status: StatusMessage);
    fn present_counter(&mut self, counter: CounterDisplay);
    fn present_countdown(&mut self, countdown: CountdownDisplay);
    fn present_success(&mut self, summary: &SuccessSummary);
    fn present_failure(&mut self, summary: &FailureSummary);
    fn present_error(&mut self, error: &EnvironmentError);
    fn return_to_start(&mut self);
}

/// Fire-and-forget audio/visual acknowledgment. Implementations swallow
/// their own failures.
pub trait Feedback {
    fn play_feedback(&mut self, kind: FeedbackKind);
    fn start_ambient(&mut self) {}
    fn stop_ambient(&mut self) {}
}

/// Control over the live tracking session
pub trait TrackingControl {
    /// Ask the tracking runtime to end the session. The runtime reports back
    /// through `Session::on_tracking_ended`.
    fn end_tracking(&mut self);
}

/// Everything the session drives
pub trait Host: Presenter + Feedback + TrackingControl {}

impl<T: Presenter + Feedback + TrackingControl> Host for T {}
