//! Numerical core shared by every talos solver.
//!
//! Provides the local Taylor models that the linear-quadratic assembler
//! produces and the Riccati / interior-point passes consume:
//!
//! 1. **Taylor models**: first/second-order approximations of scalar and
//!    vector functions of state and input ([`types`])
//! 2. **Validation**: dimension and positive-semi-definiteness diagnostics
//!    returned as text ([`validation`])
//! 3. **Dense linear algebra**: symmetric spectra, in-place Cholesky and the
//!    three PSD repair routines used by Hessian correction ([`linalg`])
//! 4. **Per-node data**: [`ModelData`], [`Metrics`] and Lagrange multipliers
//!
//! # Data flow
//!
//! ```text
//! term evaluators ──► Taylor models ──► ModelData ──► backward pass
//!                         │                 │
//!                         └── validation ◄──┘
//! ```

pub mod error;
pub mod linalg;
pub mod metrics;
pub mod model_data;
pub mod multiplier;
pub mod types;
pub mod validation;

pub use error::LinalgError;
pub use metrics::{LagrangianMetrics, Metrics};
pub use model_data::ModelData;
pub use multiplier::{Multiplier, MultiplierCollection};
pub use types::{
    ScalarFunctionLinearApproximation, ScalarFunctionQuadraticApproximation,
    VectorFunctionLinearApproximation, VectorFunctionQuadraticApproximation,
};
pub use validation::{check_being_psd, check_size, check_vector_size};
