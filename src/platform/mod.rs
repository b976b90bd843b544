//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (milliseconds)
//! - Tracking capability detection

use crate::error::EnvironmentError;

/// What the host reported about the tracking environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// A spatial tracking API exists at all
    pub tracking: bool,
    /// Immersive AR sessions can be requested
    pub immersive_ar: bool,
    /// Surface hit-testing is available
    pub hit_test: bool,
    /// Set when the user refused camera access
    pub permission_denied: Option<String>,
}

impl Capabilities {
    /// Everything available (tests and the native demo)
    pub fn full() -> Self {
        Self {
            tracking: true,
            immersive_ar: true,
            hit_test: true,
            permission_denied: None,
        }
    }

    /// Check that a session can run, reporting the first missing capability
    pub fn check(&self) -> Result<(), EnvironmentError> {
        if !self.tracking {
            return Err(EnvironmentError::TrackingUnavailable);
        }
        if let Some(reason) = &self.permission_denied {
            return Err(EnvironmentError::PermissionDenied(reason.clone()));
        }
        if !self.immersive_ar {
            return Err(EnvironmentError::ImmersiveArUnsupported);
        }
        if !self.hit_test {
            return Err(EnvironmentError::HitTestUnsupported);
        }
        Ok(())
    }
}

/// Current wall-clock time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

/// Current wall-clock time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_capabilities_pass() {
        assert!(Capabilities::full().check().is_ok());
    }

    #[test]
    fn test_missing_tracking_reported_first() {
        let caps = Capabilities {
            tracking: false,
            immersive_ar: false,
            hit_test: false,
            permission_denied: None,
        };
        assert_eq!(caps.check(), Err(EnvironmentError::TrackingUnavailable));
    }

    #[test]
    fn test_permission_denied_carries_reason() {
        let caps = Capabilities {
            permission_denied: Some("NotAllowedError".to_string()),
            ..Capabilities::full()
        };
        let err = caps.check().unwrap_err();
        assert_eq!(err.code(), "permission-denied");
        assert!(err.to_string().contains("NotAllowedError"));
    }

    #[test]
    fn test_hit_test_missing() {
        let caps = Capabilities {
            hit_test: false,
            ..Capabilities::full()
        };
        assert_eq!(caps.check(), Err(EnvironmentError::HitTestUnsupported));
    }
}
