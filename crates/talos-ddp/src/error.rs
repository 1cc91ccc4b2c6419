use talos_core::LinalgError;
use thiserror::Error;

/// Hessian correction errors.
///
/// Copy + static messages for cheap propagation in the backward pass.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CorrectionError {
    #[error("Hessian is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Hessian correction failed: {0}")]
    Linalg(#[from] LinalgError),
}

/// Unrecognised Hessian correction strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown Hessian correction strategy: {0}")]
pub struct UnknownStrategy(pub String);

/// Settings errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid hessian_correction_multiple: {0} (must be finite and >= 0)")]
    InvalidCorrectionMultiple(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correction_error_display() {
        let e = CorrectionError::NotSquare { rows: 2, cols: 3 };
        assert_eq!(e.to_string(), "Hessian is not square: 2x3");
        let e = CorrectionError::from(LinalgError::EigenDecompositionFailed);
        assert!(e.to_string().starts_with("Hessian correction failed: "));
    }

    #[test]
    fn unknown_strategy_display() {
        let e = UnknownStrategy("DIAGONAL".into());
        assert_eq!(e.to_string(), "Unknown Hessian correction strategy: DIAGONAL");
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::InvalidCorrectionMultiple(-1.0);
        assert!(e.to_string().contains("-1"));
    }
}
