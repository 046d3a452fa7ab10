//! pf-core: stable foundation for psychroflow.
//!
//! Contains:
//! - units (unit systems, reference constants, uom-backed conversion)
//! - numeric (Real and float helpers)
//! - roots (bracketed root-finding with typed failures)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod roots;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use numeric::*;
pub use roots::{RootConfig, brent, scan_brent};
pub use units::{ChartRange, UnitSystem};
