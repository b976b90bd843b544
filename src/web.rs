//! Browser bindings
//!
//! The page owns the XR session, the DOM and the frame loop. It forwards
//! hit-test results, select gestures and session-end notifications here and
//! receives presentation requests back through a single `emit(kind, json)`
//! callback.

use glam::Vec3;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::error::EnvironmentError;
use crate::host::{
    CounterDisplay, CountdownDisplay, FailureSummary, Feedback, FeedbackKind, Presenter,
    StatusMessage, SuccessSummary, TrackingControl,
};
use crate::platform::{Capabilities, now_ms};
use crate::settings::{LocalStorage, Settings};
use crate::sim::{Pose, SelectEvent, SelectionOutcome, Session};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Treasure Hunt AR starting...");
}

/// Host that forwards every presentation request to the page
struct JsHost {
    emit: js_sys::Function,
    audio: AudioManager,
}

#[derive(Serialize)]
struct StatusPayload {
    status: StatusMessage,
    text: String,
}

#[derive(Serialize)]
struct CountdownPayload {
    #[serde(flatten)]
    countdown: CountdownDisplay,
    text: String,
}

#[derive(Serialize)]
struct SuccessPayload<'a> {
    #[serde(flatten)]
    summary: &'a SuccessSummary,
    total_reward: u32,
    elapsed_text: String,
}

#[derive(Serialize)]
struct FailurePayload {
    #[serde(flatten)]
    summary: FailureSummary,
    text: String,
}

#[derive(Serialize)]
struct ErrorPayload {
    code: &'static str,
    message: String,
}

impl JsHost {
    fn send<T: Serialize>(&self, kind: &str, payload: &T) {
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize {} payload: {}", kind, e);
                return;
            }
        };
        if let Err(e) = self
            .emit
            .call2(&JsValue::NULL, &JsValue::from_str(kind), &JsValue::from_str(&json))
        {
            log::warn!("Page rejected {} event: {:?}", kind, e);
        }
    }
}

impl Presenter for JsHost {
    fn present_status(&mut self, status: StatusMessage) {
        self.send(
            "status",
            &StatusPayload {
                status,
                text: status.text(),
            },
        );
    }

    fn present_counter(&mut self, counter: CounterDisplay) {
        self.send("counter", &counter);
    }

    fn present_countdown(&mut self, countdown: CountdownDisplay) {
        self.send(
            "countdown",
            &CountdownPayload {
                countdown,
                text: countdown.text(),
            },
        );
    }

    fn present_success(&mut self, summary: &SuccessSummary) {
        self.send(
            "success",
            &SuccessPayload {
                summary,
                total_reward: summary.total_reward(),
                elapsed_text: summary.elapsed_text(),
            },
        );
    }

    fn present_failure(&mut self, summary: &FailureSummary) {
        self.send(
            "failure",
            &FailurePayload {
                summary: *summary,
                text: summary.shortfall_text(),
            },
        );
    }

    fn present_error(&mut self, error: &EnvironmentError) {
        self.send(
            "error",
            &ErrorPayload {
                code: error.code(),
                message: error.to_string(),
            },
        );
    }

    fn return_to_start(&mut self) {
        self.send("return-to-start", &());
    }
}

impl Feedback for JsHost {
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

impl TrackingControl for JsHost {
    fn end_tracking(&mut self) {
        self.send("end-tracking", &());
    }
}

/// One treasure hunt, driven by the page
#[wasm_bindgen]
pub struct TreasureHunt {
    session: Session,
    host: JsHost,
    settings: Settings,
    store: LocalStorage,
}

#[wasm_bindgen]
impl TreasureHunt {
    /// `emit(kind, json)` receives every presentation request
    #[wasm_bindgen(constructor)]
    pub fn new(emit: js_sys::Function) -> TreasureHunt {
        let store = LocalStorage;
        let settings = Settings::load(&store);
        let seed = js_sys::Date::now() as u64;
        TreasureHunt {
            session: Session::new(seed),
            host: JsHost {
                emit,
                audio: AudioManager::new(settings.sound_enabled),
            },
            settings,
            store,
        }
    }

    /// Begin scanning. Returns false if the environment cannot run a session;
    /// the page has already been sent an `error` event in that case.
    pub fn start(
        &mut self,
        tracking: bool,
        immersive_ar: bool,
        hit_test: bool,
        permission_denied: Option<String>,
    ) -> bool {
        let capabilities = Capabilities {
            tracking,
            immersive_ar,
            hit_test,
            permission_denied,
        };
        self.session
            .start(now_ms(), &capabilities, &mut self.host)
            .is_ok()
    }

    /// Per-frame hit-test results as consecutive column-major 4x4 matrices
    pub fn on_hit_test(&mut self, matrices: &[f32]) {
        let hits: Vec<Pose> = matrices
            .chunks_exact(16)
            .filter_map(|m| <&[f32; 16]>::try_from(m).ok())
            .map(Pose::from_matrix)
            .collect();
        let now = now_ms();
        self.session.advance(now, &mut self.host);
        self.session.on_frame(now, &hits, &mut self.host);
    }

    /// Select from a target-ray pose matrix. Returns the collected index or -1.
    pub fn on_select_pose(&mut self, matrix: &[f32]) -> i32 {
        let Ok(m) = <&[f32; 16]>::try_from(matrix) else {
            log::warn!("Select pose must be 16 floats, got {}", matrix.len());
            return -1;
        };
        let event = SelectEvent::from_pose(&Pose::from_matrix(m));
        self.select(&event)
    }

    /// Select from an explicit ray. Returns the collected index or -1.
    pub fn on_select_ray(&mut self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) -> i32 {
        let event = SelectEvent::new(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz));
        self.select(&event)
    }

    /// Run due deferred work. Call from the frame loop and a fallback timer.
    pub fn tick(&mut self) {
        self.session.advance(now_ms(), &mut self.host);
    }

    /// Visible collectibles with hover and spin applied, as
    /// `[x, y, z, yaw, roll, opacity, scale]` per item
    pub fn render_state(&self, time_ms: f64) -> Vec<f32> {
        self.session.registry().render_buffer(time_ms)
    }

    /// The XR session ended, by any path
    pub fn on_session_end(&mut self) {
        self.session.on_tracking_ended(&mut self.host);
    }

    pub fn restart(
        &mut self,
        tracking: bool,
        immersive_ar: bool,
        hit_test: bool,
        permission_denied: Option<String>,
    ) -> bool {
        let capabilities = Capabilities {
            tracking,
            immersive_ar,
            hit_test,
            permission_denied,
        };
        self.session
            .restart(now_ms(), &capabilities, &mut self.host)
            .is_ok()
    }

    pub fn exit(&mut self) {
        self.session.exit(&mut self.host);
    }

    pub fn acknowledge(&mut self) {
        self.session.acknowledge_outcome(&mut self.host);
    }

    /// Flip the background-music preference. Returns the new value.
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.settings.toggle_sound(&mut self.store);
        self.host.audio.set_music_enabled(enabled);
        if enabled && self.session.game_active() {
            self.host.audio.start_ambient();
        }
        enabled
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.sound_enabled
    }

    /// Milliseconds until the next deferred task, if any
    pub fn next_due_in(&self) -> Option<f64> {
        self.session
            .next_due()
            .map(|due| due.saturating_sub(now_ms()) as f64)
    }

    fn select(&mut self, event: &SelectEvent) -> i32 {
        match self.session.on_select(now_ms(), event, &mut self.host) {
            SelectionOutcome::Collected { index, .. } => index as i32,
            _ => -1,
        }
    }
}
