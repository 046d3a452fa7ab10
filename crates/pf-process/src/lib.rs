//! pf-process: air-handling process solvers.
//!
//! Every process variant is a serde-tagged case of [`Process`] with its own
//! [`ProcessSolver`] implementation:
//! - sensible heating/cooling
//! - cooling and dehumidification (forward by ADP/BF, reverse from leaving state)
//! - adiabatic mixing of two streams
//! - steam, adiabatic and heated-water humidification
//! - direct, indirect and two-stage evaporative cooling
//! - chemical (desiccant) dehumidification

pub mod common;
pub mod cooling;
pub mod desiccant;
pub mod error;
pub mod evaporative;
pub mod humidification;
pub mod mixing;
pub mod process;
pub mod result;
pub mod sensible;
pub mod traits;

pub use cooling::{CoolingDehumidification, CoolingLeg, forward_leg, reverse_leg};
pub use desiccant::ChemicalDehumidification;
pub use error::ProcessError;
pub use evaporative::{DirectEvaporative, IndirectDirectEvaporative, IndirectEvaporative};
pub use humidification::{AdiabaticHumidification, HeatedWaterSpray, SteamHumidification};
pub use mixing::{Mixing, mix_states};
pub use process::{Process, ProcessInput, ProcessKind};
pub use result::{PathPoint, ProcessResult};
pub use sensible::SensibleMode;
pub use traits::{ProcessSolver, SolveContext};
