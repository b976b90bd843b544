//! Session arbiter
//!
//! Owns the registry, the challenge timer and every deferred task, and
//! decides the terminal outcome:
//!
//! `Idle -> Scanning -> Active -> {Success | Failure}`
//!
//! Three sources drive it, one call at a time: per-frame hit-test samples
//! ([`Session::on_frame`]), select gestures ([`Session::on_select`]) and due
//! deferred tasks ([`Session::advance`]). The expiry and the completion check
//! can both be pending near the deadline; each re-checks the collected count
//! when it fires, so a last collection that lands before the expiry is
//! processed always wins.

use serde::{Deserialize, Serialize};

use super::collectible::CollectibleRegistry;
use super::placement::{PlacementOutcome, resolve_placement};
use super::pose::Pose;
use super::schedule::{Deferred, Scheduler, TaskHandle};
use super::selection::{SelectEvent, SelectionOutcome, resolve_selection};
use super::timer::ChallengeTimer;
use crate::consts::*;
use crate::error::EnvironmentError;
use crate::host::{
    CounterDisplay, CountdownDisplay, FailureSummary, FeedbackKind, Host, StatusMessage,
    SuccessSummary,
};
use crate::platform::Capabilities;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Start screen, no tracking
    Idle,
    /// Tracking live, waiting for the first surface
    Scanning,
    /// Collectibles placed, countdown running
    Active,
    /// All collected in time
    Success,
    /// Countdown expired first
    Failure,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Success | SessionPhase::Failure)
    }
}

/// One AR session's worth of game state
#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    registry: CollectibleRegistry,
    timer: ChallengeTimer,
    scheduler: Scheduler,
    /// Tracking loop is live
    game_active: bool,
    /// `end_tracking` already sent for the live tracking session
    end_requested: bool,
    /// Countdown running and undecided
    challenge_active: bool,
    /// Failure latched until acknowledged
    challenge_failed: bool,
    started_at: Option<u64>,
    ended_at: Option<u64>,
    expiry: Option<TaskHandle>,
    countdown_tick: Option<TaskHandle>,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: SessionPhase::Idle,
            registry: CollectibleRegistry::new(seed),
            timer: ChallengeTimer::default(),
            scheduler: Scheduler::new(),
            game_active: false,
            end_requested: false,
            challenge_active: false,
            challenge_failed: false,
            started_at: None,
            ended_at: None,
            expiry: None,
            countdown_tick: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn registry(&self) -> &CollectibleRegistry {
        &self.registry
    }

    pub fn timer(&self) -> &ChallengeTimer {
        &self.timer
    }

    pub fn game_active(&self) -> bool {
        self.game_active
    }

    pub fn challenge_active(&self) -> bool {
        self.challenge_active
    }

    pub fn challenge_failed(&self) -> bool {
        self.challenge_failed
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<u64> {
        self.ended_at
    }

    /// Challenge start to completion, only known after a success
    pub fn elapsed_ms(&self) -> Option<u64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }

    pub fn collected_count(&self) -> usize {
        self.registry.collected_count()
    }

    pub fn remaining_seconds(&self, now: u64) -> u64 {
        self.timer.remaining_seconds(now)
    }

    /// When the host next needs to call [`Session::advance`]
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    pub fn counter(&self) -> CounterDisplay {
        CounterDisplay {
            collected: self.registry.collected_count(),
            total: COLLECTIBLE_COUNT,
        }
    }

    /// Begin scanning. Fails once, with a message to the player, if the
    /// environment cannot track. Ignored unless idle.
    pub fn start<H: Host>(
        &mut self,
        now: u64,
        capabilities: &Capabilities,
        host: &mut H,
    ) -> Result<(), EnvironmentError> {
        if self.phase != SessionPhase::Idle {
            log::debug!("Ignoring start in phase {:?}", self.phase);
            return Ok(());
        }

        if let Err(e) = capabilities.check() {
            log::warn!("Cannot start session: {}", e);
            host.present_error(&e);
            return Err(e);
        }

        self.game_active = true;
        self.end_requested = false;
        self.phase = SessionPhase::Scanning;
        log::info!("Session started at {}", now);

        host.present_counter(self.counter());
        host.present_countdown(CountdownDisplay::inactive());
        host.present_status(StatusMessage::Scanning);
        host.start_ambient();
        Ok(())
    }

    /// Feed one frame of surface hit-test results
    pub fn on_frame<H: Host>(&mut self, now: u64, hits: &[Pose], host: &mut H) {
        if self.phase != SessionPhase::Scanning {
            return;
        }

        match resolve_placement(&mut self.registry, hits) {
            PlacementOutcome::Placed { .. } => self.begin_challenge(now, host),
            PlacementOutcome::NoSurface => host.present_status(StatusMessage::PointAtFloor),
            PlacementOutcome::AlreadyPlaced => {}
        }
    }

    /// Handle a select gesture
    ///
    /// Applied against the state as of the last [`Session::advance`]; a
    /// collection that arrives before a due expiry is processed still counts.
    pub fn on_select<H: Host>(
        &mut self,
        now: u64,
        event: &SelectEvent,
        host: &mut H,
    ) -> SelectionOutcome {
        if self.phase != SessionPhase::Active {
            log::debug!("Ignoring select in phase {:?}", self.phase);
            return SelectionOutcome::NotReady;
        }

        let outcome = resolve_selection(&mut self.registry, event);
        if let SelectionOutcome::Collected { index, reward, .. } = outcome {
            log::info!(
                "Collected #{} (reward {}), {}/{}",
                index,
                reward,
                self.registry.collected_count(),
                COLLECTIBLE_COUNT
            );

            host.play_feedback(FeedbackKind::Collect);
            host.present_status(StatusMessage::TreasureFound);
            host.present_counter(self.counter());

            self.scheduler.schedule(
                now.saturating_add(FADE_DELAY_MS),
                Deferred::BeginFade(index),
            );
            self.scheduler.schedule(
                now.saturating_add(COMPLETION_CHECK_DELAY_MS),
                Deferred::CompletionCheck,
            );
        }
        outcome
    }

    /// Run every deferred task due at or before `now`, then advance fades
    pub fn advance<H: Host>(&mut self, now: u64, host: &mut H) {
        while let Some((due, task)) = self.scheduler.pop_due(now) {
            self.dispatch(due, task, host);
        }
        self.registry.update_fades(now);
    }

    /// The tracking runtime reports that its session is over, by any path
    pub fn on_tracking_ended<H: Host>(&mut self, host: &mut H) {
        self.game_active = false;
        self.end_requested = false;
        host.stop_ambient();

        match self.phase {
            SessionPhase::Success => {
                // Timing and the pending reveal survive teardown
                self.clear_challenge();
                self.scheduler
                    .retain(|task| matches!(task, Deferred::RevealSuccess(_)));
                log::info!("Tracking ended after success, elapsed {:?}ms", self.elapsed_ms());
            }
            SessionPhase::Failure => {
                // Failure stays latched until the player acknowledges it
                self.clear_challenge();
                self.scheduler.clear();
                log::info!("Tracking ended after failure, awaiting acknowledgment");
            }
            SessionPhase::Scanning | SessionPhase::Active => {
                log::info!("Tracking ended in {:?}, returning to start", self.phase);
                self.reset_state();
                host.present_counter(self.counter());
                host.present_countdown(CountdownDisplay::inactive());
                host.return_to_start();
            }
            SessionPhase::Idle => {}
        }
    }

    /// Player dismissed the success or failure presentation
    pub fn acknowledge_outcome<H: Host>(&mut self, host: &mut H) {
        if !self.phase.is_terminal() {
            log::debug!("Nothing to acknowledge in phase {:?}", self.phase);
            return;
        }
        log::info!("Outcome {:?} acknowledged", self.phase);
        self.end_and_reset(host);
        host.return_to_start();
    }

    /// Player chose to play again: full reset, then a fresh scan
    pub fn restart<H: Host>(
        &mut self,
        now: u64,
        capabilities: &Capabilities,
        host: &mut H,
    ) -> Result<(), EnvironmentError> {
        log::info!("Restarting from {:?}", self.phase);
        self.end_and_reset(host);
        self.start(now, capabilities, host)
    }

    /// Player left (exit button, back navigation, app hidden)
    pub fn exit<H: Host>(&mut self, host: &mut H) {
        if self.phase == SessionPhase::Idle {
            return;
        }
        log::info!("Exiting from {:?}", self.phase);
        self.end_and_reset(host);
        host.return_to_start();
    }

    fn end_and_reset<H: Host>(&mut self, host: &mut H) {
        if self.game_active {
            self.request_end_tracking(host);
            host.stop_ambient();
        }
        self.reset_state();
        host.present_counter(self.counter());
        host.present_countdown(CountdownDisplay::inactive());
    }

    fn begin_challenge<H: Host>(&mut self, now: u64, host: &mut H) {
        if self.challenge_active || self.challenge_failed {
            log::debug!("Challenge already started or failed, ignoring");
            return;
        }
        if !self.timer.start(now) {
            return;
        }
        let Some(deadline) = self.timer.deadline() else {
            return;
        };

        self.challenge_active = true;
        self.started_at = Some(now);
        self.ended_at = None;
        self.phase = SessionPhase::Active;

        self.expiry = Some(self.scheduler.schedule(deadline, Deferred::ChallengeExpiry));
        self.countdown_tick = Some(
            self.scheduler
                .schedule(now.saturating_add(COUNTDOWN_TICK_MS), Deferred::CountdownTick),
        );

        log::info!("Challenge started at {}, deadline {}", now, deadline);
        host.present_counter(self.counter());
        host.present_countdown(CountdownDisplay::running(self.timer.remaining_seconds(now)));
        host.present_status(StatusMessage::CountdownPrompt);
    }

    fn dispatch<H: Host>(&mut self, at: u64, task: Deferred, host: &mut H) {
        match task {
            Deferred::ChallengeExpiry => self.on_challenge_expired(at, host),
            Deferred::CountdownTick => self.on_countdown_tick(at, host),
            Deferred::CompletionCheck => self.check_completion(at, host),
            Deferred::RevealSuccess(summary) => {
                if self.phase == SessionPhase::Success {
                    host.play_feedback(FeedbackKind::Success);
                    host.present_success(&summary);
                }
            }
            Deferred::EndTracking => self.request_end_tracking(host),
            Deferred::BeginFade(index) => self.registry.begin_fade(index, at),
        }
    }

    /// Ask the runtime to end tracking, at most once per tracking session
    fn request_end_tracking<H: Host>(&mut self, host: &mut H) {
        if self.game_active && !self.end_requested {
            self.end_requested = true;
            host.end_tracking();
        }
    }

    fn on_challenge_expired<H: Host>(&mut self, at: u64, host: &mut H) {
        self.expiry = None;
        self.timer.expire();

        let collected = self.registry.collected_count();
        if !(self.challenge_active && collected < COLLECTIBLE_COUNT) {
            log::info!(
                "Challenge timer expired with {}/{} collected, no failure",
                collected,
                COLLECTIBLE_COUNT
            );
            return;
        }

        log::info!("Challenge failed with {}/{} collected", collected, COLLECTIBLE_COUNT);
        self.challenge_failed = true;
        self.challenge_active = false;
        self.phase = SessionPhase::Failure;
        if let Some(handle) = self.countdown_tick.take() {
            self.scheduler.cancel(handle);
        }

        host.present_countdown(CountdownDisplay::inactive());
        host.present_failure(&FailureSummary {
            items_remaining: self.registry.remaining_count(),
            items_collected: collected,
        });

        // Presentation first, tracking teardown after
        self.scheduler.schedule(
            at.saturating_add(FAILURE_TRACKING_END_DELAY_MS),
            Deferred::EndTracking,
        );
    }

    fn on_countdown_tick<H: Host>(&mut self, at: u64, host: &mut H) {
        self.countdown_tick = None;
        if !self.timer.is_running() {
            return;
        }

        let remaining = self.timer.remaining_seconds(at);
        host.present_countdown(CountdownDisplay::running(remaining));
        if remaining > 0 {
            self.countdown_tick = Some(
                self.scheduler
                    .schedule(at.saturating_add(COUNTDOWN_TICK_MS), Deferred::CountdownTick),
            );
        }
    }

    fn check_completion<H: Host>(&mut self, at: u64, host: &mut H) {
        if self.phase != SessionPhase::Active || !self.registry.all_collected() {
            return;
        }

        self.ended_at = Some(at);
        self.stop_challenge(host);
        self.phase = SessionPhase::Success;

        let summary = SuccessSummary {
            items_collected: self.registry.collected_count(),
            rewards: self.registry.collected_rewards(),
            elapsed_ms: self.elapsed_ms(),
        };
        log::info!(
            "All {} collected in {}",
            summary.items_collected,
            summary.elapsed_text()
        );

        self.request_end_tracking(host);
        self.scheduler.schedule(
            at.saturating_add(SUCCESS_REVEAL_DELAY_MS),
            Deferred::RevealSuccess(summary),
        );
    }

    /// Stop the countdown and cancel its pending expiry and tick
    fn stop_challenge<H: Host>(&mut self, host: &mut H) {
        if let Some(handle) = self.expiry.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.countdown_tick.take() {
            self.scheduler.cancel(handle);
        }
        self.timer.stop();
        self.challenge_active = false;
        host.present_countdown(CountdownDisplay::inactive());
    }

    /// Drop entities and timer state, keeping phase, flags and timestamps
    fn clear_challenge(&mut self) {
        self.registry.reset();
        self.timer.stop();
        self.challenge_active = false;
        self.expiry = None;
        self.countdown_tick = None;
    }

    fn reset_state(&mut self) {
        self.clear_challenge();
        self.scheduler.clear();
        self.game_active = false;
        self.end_requested = false;
        self.challenge_failed = false;
        self.started_at = None;
        self.ended_at = None;
        self.phase = SessionPhase::Idle;
    }
}
