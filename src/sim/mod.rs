//! Deterministic session core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is passed in by the caller, never read
//! - Seeded RNG only
//! - Stable iteration order (by collectible index)
//! - No rendering or platform dependencies

pub mod collectible;
pub mod placement;
pub mod pose;
pub mod raycast;
pub mod schedule;
pub mod selection;
pub mod session;
pub mod timer;

#[cfg(test)]
mod testing;

pub use collectible::{Collectible, CollectibleRegistry, RENDER_STRIDE, placement_positions};
pub use placement::{PlacementOutcome, resolve_placement};
pub use pose::Pose;
pub use raycast::{Ray, RayHit, ray_sphere, raycast_nearest};
pub use schedule::{Deferred, Scheduler, TaskHandle};
pub use selection::{SelectEvent, SelectionOutcome, resolve_selection};
pub use session::{Session, SessionPhase};
pub use timer::{ChallengeTimer, TimerPhase, UrgencyBand};
