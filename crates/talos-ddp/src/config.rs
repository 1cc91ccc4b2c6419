use serde::{Deserialize, Serialize};
use talos_oc::LqSettings;

use crate::error::ConfigError;
use crate::hessian_correction::Strategy;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_hessian_correction_multiple() -> f64 {
    1e-6
}

// ---------------------------------------------------------------------------
// DdpSettings
// ---------------------------------------------------------------------------

/// DDP settings relevant to LQ assembly and Hessian correction.
///
/// ```toml
/// hessian_correction_strategy = "EIGENVALUE_MODIFICATION"
/// hessian_correction_multiple = 1e-5
/// check_numerical_stability = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DdpSettings {
    /// Strategy used to make the input Hessian positive definite.
    #[serde(default)]
    pub hessian_correction_strategy: Strategy,

    /// Target minimum eigenvalue of corrected Hessians (default: 1e-6).
    #[serde(default = "default_hessian_correction_multiple")]
    pub hessian_correction_multiple: f64,

    /// Validate every assembled node and log the diagnostics.
    #[serde(default)]
    pub check_numerical_stability: bool,
}

impl Default for DdpSettings {
    fn default() -> Self {
        Self {
            hessian_correction_strategy: Strategy::default(),
            hessian_correction_multiple: default_hessian_correction_multiple(),
            check_numerical_stability: false,
        }
    }
}

impl DdpSettings {
    /// Validate settings. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = self.hessian_correction_multiple;
        if !m.is_finite() || m < 0.0 {
            return Err(ConfigError::InvalidCorrectionMultiple(m));
        }
        Ok(())
    }

    /// Settings for the LQ assembler.
    pub const fn lq_settings(&self) -> LqSettings {
        LqSettings {
            check_numerical_stability: self.check_numerical_stability,
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
