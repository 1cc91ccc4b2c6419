use thiserror::Error;

/// Dense linear-algebra failures.
///
/// Copy + plain data for cheap propagation out of hot paths.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LinalgError {
    #[error("Matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Symmetric eigen-decomposition did not converge")]
    EigenDecompositionFailed,

    #[error("Cholesky modification failed after {attempts} attempts (last shift {last_shift})")]
    CholeskyModificationFailed { attempts: usize, last_shift: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linalg_error_is_copy() {
        let err = LinalgError::NotSquare { rows: 2, cols: 1 };
        let err2 = err;
        assert_eq!(err, err2);
    }

    #[test]
    fn linalg_error_display_messages() {
        assert_eq!(
            LinalgError::NotSquare { rows: 2, cols: 3 }.to_string(),
            "Matrix is not square: 2x3"
        );
        assert_eq!(
            LinalgError::EigenDecompositionFailed.to_string(),
            "Symmetric eigen-decomposition did not converge"
        );
        assert_eq!(
            LinalgError::CholeskyModificationFailed {
                attempts: 64,
                last_shift: 0.5
            }
            .to_string(),
            "Cholesky modification failed after 64 attempts (last shift 0.5)"
        );
    }
}
