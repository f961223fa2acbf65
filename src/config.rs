//! Runtime configuration for the shim
//!
//! Dimension overrides exist for bring-up on panels that misreport their
//! size: when set, every surface is created at the forced dimension no
//! matter what the caller asked for, and attribute queries report the
//! forced value.

use tracing::{info, warn};

const WIDTH_OVERRIDE_ENV: &str = "SHIM_WIDTH_OVERRIDE";
const HEIGHT_OVERRIDE_ENV: &str = "SHIM_HEIGHT_OVERRIDE";

/// Configuration applied at surface-creation time
#[derive(Debug, Clone, Default)]
pub struct ShimConfig {
    pub width_override: Option<u32>,
    pub height_override: Option<u32>,
}

impl ShimConfig {
    /// Read the override variables from the environment.
    pub fn from_env() -> Self {
        let config = Self {
            width_override: read_dimension(WIDTH_OVERRIDE_ENV),
            height_override: read_dimension(HEIGHT_OVERRIDE_ENV),
        };
        if config.width_override.is_some() || config.height_override.is_some() {
            info!(
                "dimension overrides active: width={:?} height={:?}",
                config.width_override, config.height_override
            );
        }
        config
    }

    /// Apply the overrides to a requested size.
    pub fn apply(&self, width: u32, height: u32) -> (u32, u32) {
        (
            self.width_override.unwrap_or(width),
            self.height_override.unwrap_or(height),
        )
    }
}

fn read_dimension(var: &str) -> Option<u32> {
    match std::env::var(var) {
        Ok(value) => match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("ignoring unparsable {}={}", var, value);
                None
            }
        },
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_passes_input_through() {
        let config = ShimConfig::default();
        assert_eq!(config.apply(800, 600), (800, 600));
    }

    #[test]
    fn overrides_force_dimensions() {
        let config = ShimConfig {
            width_override: Some(1440),
            height_override: Some(2560),
        };
        assert_eq!(config.apply(800, 600), (1440, 2560));
        assert_eq!(config.apply(1, 1), (1440, 2560));
    }

    #[test]
    fn single_override_leaves_other_axis_alone() {
        let config = ShimConfig {
            width_override: Some(1080),
            height_override: None,
        };
        assert_eq!(config.apply(320, 240), (1080, 240));
    }
}
