//! Recording host for session tests

use glam::Vec3;

use super::pose::Pose;
use super::selection::SelectEvent;
use super::session::Session;
use crate::error::EnvironmentError;
use crate::host::{
    CounterDisplay, CountdownDisplay, Feedback, FailureSummary, FeedbackKind, Presenter,
    StatusMessage, SuccessSummary, TrackingControl,
};

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Status(StatusMessage),
    Counter(CounterDisplay),
    Countdown(CountdownDisplay),
    Success(SuccessSummary),
    Failure(FailureSummary),
    Error(EnvironmentError),
    ReturnToStart,
    Feedback(FeedbackKind),
    AmbientOn,
    AmbientOff,
    EndTracking,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn successes(&self) -> Vec<&SuccessSummary> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Success(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&FailureSummary> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Failure(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &HostCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn countdowns(&self) -> Vec<CountdownDisplay> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Countdown(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn last_counter(&self) -> Option<CounterDisplay> {
        self.calls.iter().rev().find_map(|c| match c {
            HostCall::Counter(counter) => Some(*counter),
            _ => None,
        })
    }
}

impl Presenter for RecordingHost {
    fn present_status(&mut self, status: StatusMessage) {
        self.calls.push(HostCall::Status(status));
    }

    fn present_counter(&mut self, counter: CounterDisplay) {
        self.calls.push(HostCall::Counter(counter));
    }

    fn present_countdown(&mut self, countdown: CountdownDisplay) {
        self.calls.push(HostCall::Countdown(countdown));
    }

    fn present_success(&mut self, summary: &SuccessSummary) {
        self.calls.push(HostCall::Success(summary.clone()));
    }

    fn present_failure(&mut self, summary: &FailureSummary) {
        self.calls.push(HostCall::Failure(*summary));
    }

    fn present_error(&mut self, error: &EnvironmentError) {
        self.calls.push(HostCall::Error(error.clone()));
    }

    fn return_to_start(&mut self) {
        self.calls.push(HostCall::ReturnToStart);
    }
}

impl Feedback for RecordingHost {
    fn play_feedback(&mut self, kind: FeedbackKind) {
        self.calls.push(HostCall::Feedback(kind));
    }

    fn start_ambient(&mut self) {
        self.calls.push(HostCall::AmbientOn);
    }

    fn stop_ambient(&mut self) {
        self.calls.push(HostCall::AmbientOff);
    }
}

impl TrackingControl for RecordingHost {
    fn end_tracking(&mut self) {
        self.calls.push(HostCall::EndTracking);
    }
}

/// Surface hit used by the session tests
pub const ANCHOR: Vec3 = Vec3::new(0.0, -1.0, -2.0);

pub fn surface_hit() -> Vec<Pose> {
    vec![Pose::at(ANCHOR)]
}

/// Select gesture from eye height above the anchor toward a collectible
pub fn aim_at(session: &Session, index: usize) -> SelectEvent {
    let eye = ANCHOR + Vec3::new(0.0, 1.5, 0.0);
    let target = session.registry().items()[index].position;
    SelectEvent::new(eye, target - eye)
}
