//! DDP-side numerical pieces: Hessian correction and iteration containers.
//!
//! 1. **Hessian correction**: four strategies that lift the smallest
//!    eigenvalue of a curvature matrix to a target ([`hessian_correction`])
//! 2. **Riccati modification**: per-node corrections and constraint
//!    projectors ([`riccati_modification`])
//! 3. **Containers**: [`PrimalDataContainer`] and [`DualDataContainer`]
//!    with O(1) `swap`
//! 4. **Settings**: [`DdpSettings`], loaded from TOML

pub mod config;
pub mod data;
pub mod error;
pub mod hessian_correction;
pub mod riccati_modification;

pub use config::DdpSettings;
pub use data::{DualDataContainer, PrimalDataContainer};
pub use error::{ConfigError, CorrectionError, UnknownStrategy};
pub use hessian_correction::{Strategy, shift_hessian};
