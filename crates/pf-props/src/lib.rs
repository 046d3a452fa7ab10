//! pf-props: moist-air property primitives and state resolution.
//!
//! Provides:
//! - `PropertyModel` trait and the ASHRAE backend (`AshraeModel`)
//! - `PsychrometricState`, `Property`, `InputPair`, `StateSpec`
//! - the resolver turning any supported input pair into a full state

pub mod ashrae;
pub mod error;
pub mod model;
pub mod resolver;
pub mod state;

pub use ashrae::AshraeModel;
pub use error::{PropsError, PropsResult};
pub use model::PropertyModel;
pub use resolver::{convert_state, resolve, resolve_saturated, resolve_tdb_w, standard_pressure};
pub use state::{InputPair, Property, PsychrometricState, StateSpec};
