use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};

/// Scale applied to physical-space bounding boxes to keep small physical
/// sizes clear of floating-point display artifacts.
pub const RASTERING_FACTOR: u8 = 10;

/// Lowest cumulative zoom a view session may reach.
pub const MIN_ZOOM: f64 = 0.01;

/// Settings shared by bounding-box and zoom computations.
///
/// Both must see the same rastering factor, otherwise plane coordinates and
/// zoom anchors drift apart; pass one `ViewConfig` to both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub rastering_factor: u8,
    pub min_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rastering_factor: RASTERING_FACTOR,
            min_zoom: MIN_ZOOM,
        }
    }
}

impl ViewConfig {
    pub fn rastering(&self) -> f64 {
        f64::from(self.rastering_factor)
    }

    /// # Errors
    ///
    /// [`GeometryError::InvalidConfiguration`] for a zero rastering factor or a
    /// zoom bound that is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.rastering_factor == 0 {
            return Err(GeometryError::invalid_configuration(
                "rastering factor must be at least 1",
            ));
        }
        if !self.min_zoom.is_finite() || self.min_zoom <= 0.0 {
            return Err(GeometryError::invalid_configuration(format!(
                "minimum zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ViewConfig::default();
        assert_eq!(config.rastering(), 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let config = ViewConfig {
            rastering_factor: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = ViewConfig {
            min_zoom: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ViewConfig = serde_json::from_str(r#"{"min_zoom": 0.5}"#).unwrap();
        assert_eq!(config.rastering_factor, RASTERING_FACTOR);
        assert_eq!(config.min_zoom, 0.5);
    }
}
