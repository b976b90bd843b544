//! One-time placement of the collectibles on the first detected surface

use glam::Vec3;

use super::collectible::CollectibleRegistry;
use super::pose::Pose;

/// What a surface sample did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementOutcome {
    /// Already placed this session; sample ignored
    AlreadyPlaced,
    /// Nothing placed yet and the sample had no hits
    NoSurface,
    /// First hit used as the anchor
    Placed { anchor: Vec3 },
}

/// Consume one frame's hit-test results
///
/// The first hit of the first non-empty sample becomes the anchor. There is
/// no re-placement for the rest of the session.
pub fn resolve_placement(registry: &mut CollectibleRegistry, hits: &[Pose]) -> PlacementOutcome {
    if registry.is_initialized() {
        return PlacementOutcome::AlreadyPlaced;
    }

    let anchor = hits.first().map(|pose| pose.position);
    match anchor {
        Some(anchor) if registry.initialize(Some(anchor)) => PlacementOutcome::Placed { anchor },
        _ => PlacementOutcome::NoSurface,
    }
}
