//! Pointer/select resolution
//!
//! A select gesture becomes a ray from the input pose. The nearest
//! uncollected, visible collectible along it is collected.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collectible::CollectibleRegistry;
use super::pose::Pose;
use super::raycast::{Ray, raycast_nearest};
use crate::consts::COLLECTIBLE_HIT_RADIUS;

/// A discrete select gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectEvent {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl SelectEvent {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// From the target-ray pose of the triggering input source
    pub fn from_pose(pose: &Pose) -> Self {
        Self::new(pose.position, pose.forward())
    }
}

/// What a select gesture did
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SelectionOutcome {
    /// Nothing placed yet
    NotReady,
    /// Ray hit nothing selectable
    Miss,
    Collected {
        index: usize,
        reward: u32,
        distance: f32,
    },
}

/// Test a select gesture against the registry and collect what it hits
pub fn resolve_selection(registry: &mut CollectibleRegistry, event: &SelectEvent) -> SelectionOutcome {
    if !registry.is_initialized() || registry.is_empty() {
        return SelectionOutcome::NotReady;
    }

    let Some(ray) = Ray::new(event.origin, event.direction) else {
        log::debug!("Select event with zero-length direction");
        return SelectionOutcome::Miss;
    };

    let Some(hit) = raycast_nearest(&ray, registry.selectable(), COLLECTIBLE_HIT_RADIUS) else {
        return SelectionOutcome::Miss;
    };

    match registry.collect(hit.index) {
        Some(reward) => SelectionOutcome::Collected {
            index: hit.index,
            reward,
            distance: hit.distance,
        },
        None => SelectionOutcome::Miss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed() -> CollectibleRegistry {
        let mut registry = CollectibleRegistry::new(3);
        registry.initialize(Some(Vec3::ZERO));
        registry
    }

    /// Aim from the origin (eye height) at a collectible
    fn aim_at(registry: &CollectibleRegistry, index: usize) -> SelectEvent {
        let eye = Vec3::new(0.0, 1.5, 0.0);
        SelectEvent::new(eye, registry.items()[index].position - eye)
    }

    #[test]
    fn test_not_ready_before_placement() {
        let mut registry = CollectibleRegistry::new(3);
        let event = SelectEvent::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(resolve_selection(&mut registry, &event), SelectionOutcome::NotReady);
    }

    #[test]
    fn test_hit_collects() {
        let mut registry = placed();
        let event = aim_at(&registry, 2);
        let outcome = resolve_selection(&mut registry, &event);
        assert!(matches!(outcome, SelectionOutcome::Collected { index: 2, .. }));
        assert!(registry.items()[2].collected);
        assert_eq!(registry.collected_count(), 1);
    }

    #[test]
    fn test_second_select_on_same_target_misses() {
        let mut registry = placed();
        let event = aim_at(&registry, 0);
        resolve_selection(&mut registry, &event);
        assert_eq!(resolve_selection(&mut registry, &event), SelectionOutcome::Miss);
        assert_eq!(registry.collected_count(), 1);
    }

    #[test]
    fn test_pointing_at_sky_misses() {
        let mut registry = placed();
        let event = SelectEvent::new(Vec3::new(0.0, 1.5, 0.0), Vec3::Y);
        assert_eq!(resolve_selection(&mut registry, &event), SelectionOutcome::Miss);
        assert_eq!(registry.collected_count(), 0);
    }

    #[test]
    fn test_zero_direction_misses() {
        let mut registry = placed();
        let event = SelectEvent::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(resolve_selection(&mut registry, &event), SelectionOutcome::Miss);
    }

    #[test]
    fn test_nearest_of_two_in_line() {
        let mut registry = placed();
        // Ray along +x at the height of the +z row passes through index 1 then 0
        let event = SelectEvent::new(Vec3::new(-3.0, 0.3, 1.0), Vec3::X);
        let outcome = resolve_selection(&mut registry, &event);
        assert!(matches!(outcome, SelectionOutcome::Collected { index: 1, .. }));

        // Same ray again now reaches the far one
        let outcome = resolve_selection(&mut registry, &event);
        assert!(matches!(outcome, SelectionOutcome::Collected { index: 0, .. }));
    }

    #[test]
    fn test_from_pose_uses_forward() {
        let pose = Pose::at(Vec3::new(1.0, 0.3, 3.0));
        let event = SelectEvent::from_pose(&pose);
        assert_eq!(event.origin, pose.position);
        assert!((event.direction - Vec3::NEG_Z).length() < 1e-6);

        // Looking down -z from (1, 0.3, 3) passes through index 0 at z=1
        let mut registry = placed();
        let outcome = resolve_selection(&mut registry, &event);
        assert!(matches!(outcome, SelectionOutcome::Collected { index: 0, .. }));
    }
}
