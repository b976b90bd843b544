//! Treasure Hunt AR entry point
//!
//! The browser build is driven from `web.rs`. Natively this runs two
//! scripted sessions against a logging host: one cleared in time, one that
//! runs out the clock.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec3;

    use treasure_hunt_ar::audio::AudioManager;
    use treasure_hunt_ar::consts::*;
    use treasure_hunt_ar::host::{
        CounterDisplay, CountdownDisplay, FailureSummary, Feedback, FeedbackKind, Presenter,
        StatusMessage, SuccessSummary, TrackingControl,
    };
    use treasure_hunt_ar::platform::{Capabilities, now_ms};
    use treasure_hunt_ar::sim::{Pose, SelectEvent, Session, SessionPhase};
    use treasure_hunt_ar::{EnvironmentError, MemoryStore, Settings};

    /// Simulated frame length
    const FRAME_MS: u64 = 16;

    /// Host that logs what a page would render
    struct LogHost {
        audio: AudioManager,
        tracking_live: bool,
        last_countdown: Option<u64>,
    }

    impl Presenter for LogHost {
        fn present_status(&mut self, status: StatusMessage) {
            log::info!("status: {}", status.text());
        }

        fn present_counter(&mut self, counter: CounterDisplay) {
            log::info!(
                "counter: {} / {} ({:.0}%)",
                counter.collected,
                counter.total,
                counter.progress_percent()
            );
        }

        fn present_countdown(&mut self, countdown: CountdownDisplay) {
            // Ticks repeat the same second ten times
            if self.last_countdown != Some(countdown.seconds) {
                log::info!("countdown: {} {:?}", countdown.text(), countdown.band);
                self.last_countdown = Some(countdown.seconds);
            }
        }

        fn present_success(&mut self, summary: &SuccessSummary) {
            log::info!(
                "SUCCESS: {} treasures, {} points in {}",
                summary.items_collected,
                summary.total_reward(),
                summary.elapsed_text()
            );
            for entry in &summary.rewards {
                log::info!("  treasure #{}: {}", entry.number, entry.reward);
            }
        }

        fn present_failure(&mut self, summary: &FailureSummary) {
            log::info!(
                "FAILURE: {} of {} collected. {}",
                summary.items_collected,
                COLLECTIBLE_COUNT,
                summary.shortfall_text()
            );
        }

        fn present_error(&mut self, error: &EnvironmentError) {
            log::error!("error [{}]: {}", error.code(), error);
        }

        fn return_to_start(&mut self) {
            log::info!("back to start screen");
        }
    }

    impl Feedback for LogHost {
        fn play_feedback(&mut self, kind: FeedbackKind) {
            self.audio.play_feedback(kind);
        }

        fn start_ambient(&mut self) {
            self.audio.start_ambient();
        }

        fn stop_ambient(&mut self) {
            self.audio.stop_ambient();
        }
    }

    impl TrackingControl for LogHost {
        fn end_tracking(&mut self) {
            log::info!("tracking end requested");
            self.tracking_live = false;
        }
    }

    /// Step frames until `until`, feeding hits and forwarding tracking end
    fn run_frames(
        session: &mut Session,
        host: &mut LogHost,
        now: &mut u64,
        until: u64,
        hits: &[Pose],
    ) {
        while *now < until {
            *now += FRAME_MS;
            session.advance(*now, host);
            session.on_frame(*now, hits, host);
            if !host.tracking_live && session.game_active() {
                session.on_tracking_ended(host);
            }
        }
    }

    fn aim(session: &Session, eye: Vec3, index: usize) -> Option<SelectEvent> {
        let target = session.registry().get(index)?.position;
        Some(SelectEvent::new(eye, target - eye))
    }

    fn play(session: &mut Session, host: &mut LogHost, picks: &[(u64, usize)]) {
        let mut now = now_ms();
        let anchor = Vec3::new(0.0, -1.4, -1.5);
        let eye = Vec3::ZERO;

        host.tracking_live = true;
        if session.start(now, &Capabilities::full(), host).is_err() {
            return;
        }

        // A second of pointing at nothing, then the floor shows up
        let found_at = now + 1_000;
        run_frames(session, host, &mut now, found_at, &[]);
        run_frames(session, host, &mut now, found_at + FRAME_MS, &[Pose::at(anchor)]);
        let start = now;

        for &(at, index) in picks {
            run_frames(session, host, &mut now, start + at, &[]);
            if let Some(event) = aim(session, eye, index) {
                let outcome = session.on_select(now, &event, host);
                log::info!("select #{} -> {:?}", index, outcome);
            }
        }

        run_frames(
            session,
            host,
            &mut now,
            start + CHALLENGE_DURATION_MS + 2_000,
            &[],
        );
        log::info!("session ended in {:?}", session.phase());
        if session.phase() == SessionPhase::Failure || session.phase() == SessionPhase::Success {
            session.acknowledge_outcome(host);
        }
    }

    pub fn run() {
        let store = MemoryStore::new();
        let settings = Settings::load(&store);

        let mut host = LogHost {
            audio: AudioManager::new(settings.sound_enabled),
            tracking_live: false,
            last_countdown: None,
        };
        let mut session = Session::new(now_ms());

        log::info!("--- run 1: all four in time ---");
        play(
            &mut session,
            &mut host,
            &[(3_000, 0), (8_000, 3), (14_000, 1), (21_000, 2)],
        );

        log::info!("--- run 2: out of time ---");
        host.last_countdown = None;
        play(&mut session, &mut host, &[(5_000, 2)]);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Treasure Hunt AR (native demo) starting...");
    log::info!("The AR build runs in the browser; this replays scripted sessions");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}
