//! Control manager configuration and builder.
//!
//! # Example
//!
//! ```
//! use horizon_controls::config::ManagerConfig;
//!
//! let config = ManagerConfig::new()
//!     .with_pointer_offset(120.0, 40.0)
//!     .with_snap_raises_settled(true);
//!
//! let parsed = ManagerConfig::from_toml_str("pointer_offset = [120.0, 40.0]\nsnap_raises_settled = true").unwrap();
//! assert_eq!(parsed, config);
//! ```

use serde::{Deserialize, Serialize};

use horizon_controls_core::{ControlsError, Point, Result};

/// Configuration for a [`ControlManager`](crate::manager::ControlManager).
///
/// Every field is optional in TOML; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Screen-space origin of the UI inside the host viewport. Subtracted
    /// from every polled pointer position.
    pub pointer_offset: [f32; 2],
    /// Whether disabled widgets can become the pointer target.
    pub hit_test_disabled: bool,
    /// Whether stock widgets' animated values raise `settled` on snap.
    pub snap_raises_settled: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            pointer_offset: [0.0, 0.0],
            hit_test_disabled: false,
            snap_raises_settled: false,
        }
    }
}

impl ManagerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pointer offset.
    pub fn with_pointer_offset(mut self, x: f32, y: f32) -> Self {
        self.pointer_offset = [x, y];
        self
    }

    /// Set whether disabled widgets take part in hit-testing.
    pub fn with_hit_test_disabled(mut self, enabled: bool) -> Self {
        self.hit_test_disabled = enabled;
        self
    }

    /// Set the default snap-raises-settled flag for stock widgets.
    pub fn with_snap_raises_settled(mut self, enabled: bool) -> Self {
        self.snap_raises_settled = enabled;
        self
    }

    /// The pointer offset as a point.
    pub fn pointer_offset(&self) -> Point {
        Point::from(self.pointer_offset)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ControlsError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ControlsError::config(e.to_string()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.pointer_offset.iter().any(|v| !v.is_finite()) {
            return Err(ControlsError::config("pointer_offset must be finite"));
        }
        Ok(())
    }
}
