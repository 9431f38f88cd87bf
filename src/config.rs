use crate::error::{ConfigError, Result};

/// Default Chebyshev distance, in pixels, below which a press/release pair is a click.
pub const DEFAULT_CLICK_TOLERANCE_PX: f64 = 3.0;

/// Parameters controlling an editing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Maximum pointer travel between down and up for the pair to count as a click.
    pub click_tolerance_px: f64,
    /// Whether clicking the surface adds a vertex when the session starts.
    pub click_to_add: bool,
    /// Whether edge-midpoint insertion handles are maintained.
    pub midpoint_handles: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            click_tolerance_px: DEFAULT_CLICK_TOLERANCE_PX,
            click_to_add: true,
            midpoint_handles: true,
        }
    }
}

impl EditorConfig {
    /// Returns a copy with a different click tolerance.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if `px` is negative or not finite.
    pub fn with_click_tolerance(self, px: f64) -> Result<Self> {
        if !px.is_finite() || px < 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "click tolerance must be a finite, non-negative pixel count (got {px})"
            ))
            .into());
        }
        Ok(Self {
            click_tolerance_px: px,
            ..self
        })
    }

    /// Returns a copy with midpoint handles switched on or off.
    #[must_use]
    pub fn with_midpoint_handles(self, enabled: bool) -> Self {
        Self {
            midpoint_handles: enabled,
            ..self
        }
    }
}
