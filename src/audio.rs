//! Audio feedback using the Web Audio API
//!
//! Procedurally generated tones, no external files needed. The collect and
//! success cues always play; only the ambient drone follows the sound
//! preference. On native targets every cue is just logged.

use crate::host::{Feedback, FeedbackKind};

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Overall output level
const MASTER_VOLUME: f32 = 0.8;

/// Ambient drone volume (the effect cues are louder)
const AMBIENT_VOLUME: f32 = 0.3;

/// Audio manager for the session
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    #[cfg(target_arch = "wasm32")]
    ambient: Vec<OscillatorNode>,
    #[cfg(not(target_arch = "wasm32"))]
    ambient_playing: bool,
    music_enabled: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new(music_enabled: bool) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            ambient: Vec::new(),
            music_enabled,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(music_enabled: bool) -> Self {
        Self {
            ambient_playing: false,
            music_enabled,
        }
    }

    /// Follow the sound preference; turning it off stops the drone at once
    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        if !enabled {
            self.stop_ambient();
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn is_ambient_playing(&self) -> bool {
        !self.ambient.is_empty()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn is_ambient_playing(&self) -> bool {
        self.ambient_playing
    }

    #[cfg(target_arch = "wasm32")]
    fn context(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Collect - short bright ping
    #[cfg(target_arch = "wasm32")]
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
            log::warn!("Collect sound unavailable");
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Success - soft C5 chime
    #[cfg(target_arch = "wasm32")]
    fn play_success(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 523.25, OscillatorType::Sine) else {
            log::warn!("Success sound unavailable");
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Play a feedback cue
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, kind: FeedbackKind) {
        let Some(ctx) = self.context() else { return };
        let vol = MASTER_VOLUME;
        match kind {
            FeedbackKind::Collect => self.play_collect(ctx, vol),
            FeedbackKind::Success => self.play_success(ctx, vol),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, kind: FeedbackKind) {
        log::info!("[audio] {:?} cue at volume {:.2}", kind, MASTER_VOLUME);
    }

    /// Start the looping ambient drone if the preference allows it
    #[cfg(target_arch = "wasm32")]
    pub fn start_ambient(&mut self) {
        if !self.music_enabled || self.is_ambient_playing() {
            return;
        }
        let Some(ctx) = self.context() else { return };
        let vol = MASTER_VOLUME * AMBIENT_VOLUME;

        // Open fifth, slightly detuned
        let mut voices = Vec::new();
        for (freq, level) in [(110.0, 0.12), (165.4, 0.08)] {
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) {
                let t = ctx.current_time();
                gain.gain().set_value_at_time(0.001, t).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(vol * level, t + 1.5)
                    .ok();
                if osc.start_with_when(t).is_ok() {
                    voices.push(osc);
                }
            }
        }
        if voices.is_empty() {
            log::warn!("Ambient audio unavailable");
        }
        self.ambient = voices;
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_ambient(&mut self) {
        if !self.music_enabled || self.ambient_playing {
            return;
        }
        log::info!(
            "[audio] ambient on at volume {:.2}",
            MASTER_VOLUME * AMBIENT_VOLUME
        );
        self.ambient_playing = true;
    }

    #[cfg(target_arch = "wasm32")]
    pub fn stop_ambient(&mut self) {
        for osc in self.ambient.drain(..) {
            osc.stop().ok();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn stop_ambient(&mut self) {
        if self.ambient_playing {
            log::info!("[audio] ambient off");
        }
        self.ambient_playing = false;
    }
}

impl Feedback for AudioManager {
    fn play_feedback(&mut self, kind: FeedbackKind) {
        self.play(kind);
    }

    fn start_ambient(&mut self) {
        AudioManager::start_ambient(self);
    }

    fn stop_ambient(&mut self) {
        AudioManager::stop_ambient(self);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_follows_preference() {
        let mut audio = AudioManager::new(false);
        audio.start_ambient();
        assert!(!audio.is_ambient_playing());

        audio.set_music_enabled(true);
        audio.start_ambient();
        assert!(audio.is_ambient_playing());

        audio.set_music_enabled(false);
        assert!(!audio.is_ambient_playing());
    }

    #[test]
    fn test_cues_play_with_music_off() {
        let mut audio = AudioManager::new(false);
        audio.play_feedback(FeedbackKind::Collect);
        audio.play_feedback(FeedbackKind::Success);
        assert!(!audio.is_ambient_playing());
    }
}
