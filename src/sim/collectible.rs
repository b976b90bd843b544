//! Collectibles and the registry that owns them
//!
//! The registry is empty until the first surface is found, then holds
//! exactly [`COLLECTIBLE_COUNT`] entities for the rest of the session.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::host::RewardEntry;

/// One treasure card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub index: usize,
    /// Resting position in the session's reference space
    pub position: Vec3,
    /// Reward magnitude in [REWARD_MIN, REWARD_MAX)
    pub reward: u32,
    /// Only ever goes false -> true
    pub collected: bool,
    /// Only ever goes true -> false, once the fade completes
    pub visible: bool,
    /// 1.0 until the fade starts
    pub opacity: f32,
    pub scale: f32,
    /// Hover phase offset (radians)
    pub hover_phase: f32,
    /// Spin per rendered frame (radians)
    pub spin_speed: f32,
    /// When the fade-out began
    #[serde(skip)]
    fade_started_at: Option<u64>,
}

impl Collectible {
    fn new(index: usize, position: Vec3, rng: &mut Pcg32) -> Self {
        Self {
            index,
            position,
            reward: rng.random_range(REWARD_MIN..REWARD_MAX),
            collected: false,
            visible: true,
            opacity: 1.0,
            scale: 1.0,
            hover_phase: rng.random_range(0.0..std::f32::consts::TAU),
            spin_speed: rng.random_range(0.005..0.015),
            fade_started_at: None,
        }
    }

    /// Still a valid selection target
    #[inline]
    pub fn is_selectable(&self) -> bool {
        !self.collected && self.visible
    }

    /// Vertical hover offset at a render timestamp (ms)
    pub fn display_offset(&self, time_ms: f64) -> f32 {
        // Reduce in f64 first; epoch-scale timestamps have no f32 precision
        let angle = (time_ms * f64::from(HOVER_SPEED)).rem_euclid(std::f64::consts::TAU);
        (angle as f32 + self.hover_phase).sin() * HOVER_AMPLITUDE
    }

    /// `(yaw, roll)` in radians at a render timestamp (ms), wrapped to [0, 2π)
    pub fn display_rotation(&self, time_ms: f64) -> Vec2 {
        let frames = time_ms.max(0.0) * SPIN_FRAMES_PER_SEC / 1000.0;
        let yaw = frames * f64::from(self.spin_speed);
        let roll = yaw * f64::from(SPIN_ROLL_RATIO);
        Vec2::new(
            yaw.rem_euclid(std::f64::consts::TAU) as f32,
            roll.rem_euclid(std::f64::consts::TAU) as f32,
        )
    }

    /// Where to draw the card at a render timestamp (ms)
    pub fn display_position(&self, time_ms: f64) -> Vec3 {
        if self.collected {
            return self.position;
        }
        self.position + Vec3::Y * self.display_offset(time_ms)
    }
}

/// Positions around an anchor: (+x,+z), (-x,+z), (+x,-z), (-x,-z), all lifted
pub fn placement_positions(anchor: Vec3) -> [Vec3; COLLECTIBLE_COUNT] {
    let lift = Vec3::Y * PLACEMENT_LIFT;
    let d = PLACEMENT_OFFSET;
    [
        anchor + Vec3::new(d, 0.0, d) + lift,
        anchor + Vec3::new(-d, 0.0, d) + lift,
        anchor + Vec3::new(d, 0.0, -d) + lift,
        anchor + Vec3::new(-d, 0.0, -d) + lift,
    ]
}

/// Floats per entity in [`CollectibleRegistry::render_buffer`]
pub const RENDER_STRIDE: usize = 7;

/// Fixed-size set of collectibles for one session
#[derive(Debug, Clone)]
pub struct CollectibleRegistry {
    items: Vec<Collectible>,
    initialized: bool,
    rng: Pcg32,
}

impl CollectibleRegistry {
    pub fn new(seed: u64) -> Self {
        Self {
            items: Vec::with_capacity(COLLECTIBLE_COUNT),
            initialized: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Collectible] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Collectible> {
        self.items.get(index)
    }

    /// Spawn the collectibles around an anchor. Runs at most once per
    /// session; returns true only when it actually placed them.
    pub fn initialize(&mut self, anchor: Option<Vec3>) -> bool {
        if self.initialized {
            log::debug!("Registry already initialized, ignoring anchor");
            return false;
        }
        let Some(anchor) = anchor else {
            return false;
        };

        for (index, position) in placement_positions(anchor).into_iter().enumerate() {
            let item = Collectible::new(index, position, &mut self.rng);
            self.items.push(item);
        }
        self.initialized = true;

        log::info!(
            "Placed {} collectibles around ({:.2}, {:.2}, {:.2})",
            self.items.len(),
            anchor.x,
            anchor.y,
            anchor.z
        );
        true
    }

    pub fn collected_count(&self) -> usize {
        self.items.iter().filter(|c| c.collected).count()
    }

    pub fn remaining_count(&self) -> usize {
        self.items.len() - self.collected_count()
    }

    /// All placed collectibles picked up
    pub fn all_collected(&self) -> bool {
        self.initialized && self.collected_count() == COLLECTIBLE_COUNT
    }

    /// Indices and centers of entities that can still be selected
    pub fn selectable(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.items
            .iter()
            .filter(|c| c.is_selectable())
            .map(|c| (c.index, c.position))
    }

    /// Mark a collectible as collected. Returns its reward, or None if the
    /// index is out of range or it was already collected.
    pub fn collect(&mut self, index: usize) -> Option<u32> {
        let Some(item) = self.items.get_mut(index) else {
            log::debug!("Ignoring collect for out-of-range index {}", index);
            return None;
        };
        if item.collected {
            log::debug!("Collectible {} already collected", index);
            return None;
        }

        item.collected = true;
        item.scale *= COLLECT_SCALE_POP;
        Some(item.reward)
    }

    /// Begin the cosmetic fade for a collected entity
    pub fn begin_fade(&mut self, index: usize, now: u64) {
        if let Some(item) = self.items.get_mut(index) {
            if item.collected && item.fade_started_at.is_none() {
                item.fade_started_at = Some(now);
            }
        }
    }

    /// Advance fades; entities whose opacity reaches zero become invisible
    pub fn update_fades(&mut self, now: u64) {
        for item in self.items.iter_mut().filter(|c| c.visible) {
            let Some(start) = item.fade_started_at else {
                continue;
            };
            let secs = now.saturating_sub(start) as f32 / 1000.0;
            item.opacity = (1.0 - secs * FADE_PER_SEC).max(0.0);
            if item.opacity <= 0.0 {
                item.visible = false;
            }
        }
    }

    /// `(number, reward)` for every collected entity, numbered from 1
    pub fn collected_rewards(&self) -> Vec<RewardEntry> {
        self.items
            .iter()
            .filter(|c| c.collected)
            .map(|c| RewardEntry {
                number: c.index + 1,
                reward: c.reward,
            })
            .collect()
    }

    /// Visible entities packed for the renderer, [`RENDER_STRIDE`] floats each:
    /// `x, y, z, yaw, roll, opacity, scale`
    pub fn render_buffer(&self, time_ms: f64) -> Vec<f32> {
        self.items
            .iter()
            .filter(|item| item.visible)
            .flat_map(|item| {
                let p = item.display_position(time_ms);
                let r = item.display_rotation(time_ms);
                [p.x, p.y, p.z, r.x, r.y, item.opacity, item.scale]
            })
            .collect()
    }

    /// Drop all entities; the next anchor places a fresh set
    pub fn reset(&mut self) {
        self.items.clear();
        self.initialized = false;
    }
}
