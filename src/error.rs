//! Environment errors
//!
//! The only failures that reach the player. Everything else (audio, fades,
//! guard no-ops) is swallowed and logged where it happens.

use serde::Serialize;

/// Missing or denied tracking capability. Fatal to the session, no retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum EnvironmentError {
    #[error("Spatial tracking is not available on this device or browser")]
    TrackingUnavailable,
    #[error("Immersive AR sessions are not supported")]
    ImmersiveArUnsupported,
    #[error("Surface hit-testing is not supported")]
    HitTestUnsupported,
    #[error("Camera access was denied: {0}")]
    PermissionDenied(String),
}

impl EnvironmentError {
    /// Short machine-readable code for the presentation layer
    pub fn code(&self) -> &'static str {
        match self {
            EnvironmentError::TrackingUnavailable => "tracking-unavailable",
            EnvironmentError::ImmersiveArUnsupported => "immersive-ar-unsupported",
            EnvironmentError::HitTestUnsupported => "hit-test-unsupported",
            EnvironmentError::PermissionDenied(_) => "permission-denied",
        }
    }
}
