use menagerie_input::{InputError, KeyBindings, TouchRegion};
use menagerie_render::Camera;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max_delta must be positive and finite, got {0}")]
    InvalidMaxDelta(f32),
    #[error(transparent)]
    Bindings(#[from] InputError),
}

/// Frame loop settings. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Upper bound on one tick's delta, in seconds.
    pub max_delta: f32,
    /// Number of recent deltas kept for frame statistics.
    pub timer_window: usize,
    pub bindings: KeyBindings,
    pub touch_regions: Vec<TouchRegion>,
    pub camera: Camera,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_delta: 1.0 / 20.0,
            timer_window: 120,
            bindings: KeyBindings::default(),
            touch_regions: Vec::new(),
            camera: Camera::default(),
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_delta.is_finite() && self.max_delta > 0.0) {
            return Err(ConfigError::InvalidMaxDelta(self.max_delta));
        }
        self.bindings.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LoopConfig::default();
        assert!((config.max_delta - 0.05).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: LoopConfig = serde_json::from_str(r#"{"max_delta": 0.1}"#).unwrap();
        assert_eq!(config.max_delta, 0.1);
        assert_eq!(config.bindings, KeyBindings::default());
        assert!(config.touch_regions.is_empty());
    }

    #[test]
    fn rejects_bad_max_delta() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = LoopConfig {
                max_delta: bad,
                ..LoopConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidMaxDelta(_))));
        }
    }

    #[test]
    fn rejects_duplicate_codes() {
        let config: LoopConfig = serde_json::from_str(
            r#"{"bindings": [{"code": 37, "button": "left"}, {"code": 37, "button": "right"}]}"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Bindings(_))));
    }
}
