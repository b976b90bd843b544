//! Ray hit-testing against collectible bounds
//!
//! Collectibles are thin spinning cards, so they are tested as spheres that
//! enclose the card at any rotation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A half-line from `origin` along a unit `direction`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; None if the direction has no length
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }
}

/// Nearest hit from a raycast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub index: usize,
    pub distance: f32,
}

/// Distance along the ray to the first intersection with a sphere
///
/// A ray starting inside the sphere hits at distance 0. Spheres entirely
/// behind the origin are missed.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;

    if c <= 0.0 {
        return Some(0.0);
    }
    // Outside and pointing away
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

/// Nearest candidate hit by the ray
///
/// Candidates are `(index, center)` pairs. Exact distance ties go to the
/// lower index so the result does not depend on iteration order.
pub fn raycast_nearest<I>(ray: &Ray, candidates: I, radius: f32) -> Option<RayHit>
where
    I: IntoIterator<Item = (usize, Vec3)>,
{
    candidates
        .into_iter()
        .filter_map(|(index, center)| {
            ray_sphere(ray, center, radius).map(|distance| RayHit { index, distance })
        })
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        })
}
