//! pf-solver: apparatus dew point and bypass factor.
//!
//! One parametrized search (line origin, slope, bounds) serves cooling
//! processes, coil analysis and SHR lines.

pub mod adp;
pub mod bypass;
pub mod error;
pub mod line;

pub use adp::{AdpSearch, find_adp_on_line, find_apparatus_dew_point};
pub use bypass::{apply_bypass_factor, compute_bypass_factor, contact_factor};
pub use error::{SolverError, SolverResult};
pub use line::ProcessLine;
