//! Psychrometric state value object and input identifiers.

use std::fmt;
use std::str::FromStr;

use pf_core::UnitSystem;
use serde::{Deserialize, Serialize};

use crate::error::{PropsError, PropsResult};
use crate::model::PropertyModel;

/// Independent property identifiers accepted by the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    #[serde(rename = "Tdb", alias = "tdb")]
    Tdb,
    #[serde(rename = "Twb", alias = "twb")]
    Twb,
    #[serde(rename = "Tdp", alias = "tdp")]
    Tdp,
    #[serde(rename = "RH", alias = "rh")]
    RH,
    #[serde(rename = "W", alias = "w")]
    W,
    #[serde(rename = "h", alias = "H")]
    H,
}

impl Property {
    pub fn label(self) -> &'static str {
        match self {
            Property::Tdb => "Tdb",
            Property::Twb => "Twb",
            Property::Tdp => "Tdp",
            Property::RH => "RH",
            Property::W => "W",
            Property::H => "h",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Property {
    type Err = PropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Tdb" | "tdb" | "TDB" => Ok(Property::Tdb),
            "Twb" | "twb" | "TWB" => Ok(Property::Twb),
            "Tdp" | "tdp" | "TDP" => Ok(Property::Tdp),
            "RH" | "rh" => Ok(Property::RH),
            "W" | "w" => Ok(Property::W),
            "h" | "H" => Ok(Property::H),
            other => Err(PropsError::UnsupportedInput {
                first: other.to_string(),
                second: String::new(),
            }),
        }
    }
}

/// Canonical (ordered) input pairs the resolver can solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum InputPair {
    TdbRh,
    TdbTwb,
    TdbTdp,
    TdbW,
    TdbH,
    TwbRh,
    TdpRh,
}

impl InputPair {
    /// Canonicalize an unordered pair, reordering `values` to match.
    pub fn canonicalize(
        first: Property,
        second: Property,
        values: (f64, f64),
    ) -> PropsResult<(InputPair, (f64, f64))> {
        use Property::*;
        let direct = |a: Property, b: Property| match (a, b) {
            (Tdb, RH) => Some(InputPair::TdbRh),
            (Tdb, Twb) => Some(InputPair::TdbTwb),
            (Tdb, Tdp) => Some(InputPair::TdbTdp),
            (Tdb, W) => Some(InputPair::TdbW),
            (Tdb, H) => Some(InputPair::TdbH),
            (Twb, RH) => Some(InputPair::TwbRh),
            (Tdp, RH) => Some(InputPair::TdpRh),
            _ => None,
        };

        if let Some(pair) = direct(first, second) {
            Ok((pair, values))
        } else if let Some(pair) = direct(second, first) {
            Ok((pair, (values.1, values.0)))
        } else {
            Err(PropsError::UnsupportedInput {
                first: first.label().to_string(),
                second: second.label().to_string(),
            })
        }
    }

    pub fn properties(self) -> (Property, Property) {
        use Property::*;
        match self {
            InputPair::TdbRh => (Tdb, RH),
            InputPair::TdbTwb => (Tdb, Twb),
            InputPair::TdbTdp => (Tdb, Tdp),
            InputPair::TdbW => (Tdb, W),
            InputPair::TdbH => (Tdb, H),
            InputPair::TwbRh => (Twb, RH),
            InputPair::TdpRh => (Tdp, RH),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InputPair::TdbRh => "Tdb,RH",
            InputPair::TdbTwb => "Tdb,Twb",
            InputPair::TdbTdp => "Tdb,Tdp",
            InputPair::TdbW => "Tdb,W",
            InputPair::TdbH => "Tdb,h",
            InputPair::TwbRh => "Twb,RH",
            InputPair::TdpRh => "Tdp,RH",
        }
    }
}

impl fmt::Display for InputPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serializable state request: an input pair with its two values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    pub pair: (Property, Property),
    pub values: (f64, f64),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl StateSpec {
    pub fn new(first: Property, second: Property, values: (f64, f64)) -> Self {
        Self {
            pair: (first, second),
            values,
            label: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn resolve(
        &self,
        model: &dyn PropertyModel,
        pressure: f64,
        units: UnitSystem,
    ) -> PropsResult<PsychrometricState> {
        crate::resolver::resolve(
            model,
            self.pair,
            self.values,
            pressure,
            units,
            self.label.as_deref(),
        )
    }
}

/// Fully resolved moist-air state.
///
/// All fields are mutually consistent at `pressure` in `unit_system`. RH is a
/// percentage; W is dimensionless (dry-air basis), `w_display` is grains/lb or
/// g/kg.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PsychrometricState {
    tdb: f64,
    twb: f64,
    tdp: f64,
    rh: f64,
    w: f64,
    w_display: f64,
    h: f64,
    v: f64,
    pv: f64,
    ps: f64,
    mu: f64,
    pressure: f64,
    unit_system: UnitSystem,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    input_pair: InputPair,
    input_values: (f64, f64),
}

/// Derived properties handed to [`PsychrometricState::from_parts`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct DerivedProperties {
    pub twb: f64,
    pub tdp: f64,
    pub rh: f64,
    pub h: f64,
    pub v: f64,
    pub pv: f64,
    pub ps: f64,
    pub mu: f64,
}

impl PsychrometricState {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        tdb: f64,
        w: f64,
        pressure: f64,
        units: UnitSystem,
        derived: DerivedProperties,
        input_pair: InputPair,
        input_values: (f64, f64),
        label: Option<String>,
    ) -> Self {
        Self {
            tdb,
            twb: derived.twb,
            tdp: derived.tdp,
            rh: derived.rh,
            w,
            w_display: units.w_to_display(w),
            h: derived.h,
            v: derived.v,
            pv: derived.pv,
            ps: derived.ps,
            mu: derived.mu,
            pressure,
            unit_system: units,
            label,
            input_pair,
            input_values,
        }
    }

    pub fn tdb(&self) -> f64 {
        self.tdb
    }

    pub fn twb(&self) -> f64 {
        self.twb
    }

    pub fn tdp(&self) -> f64 {
        self.tdp
    }

    /// Relative humidity, percent.
    pub fn rh(&self) -> f64 {
        self.rh
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn w_display(&self) -> f64 {
        self.w_display
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn v(&self) -> f64 {
        self.v
    }

    /// Moist-air density per unit volume of dry air, 1/v.
    pub fn density(&self) -> f64 {
        1.0 / self.v
    }

    pub fn pv(&self) -> f64 {
        self.pv
    }

    pub fn ps(&self) -> f64 {
        self.ps
    }

    /// Degree of saturation.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn input_pair(&self) -> InputPair {
        self.input_pair
    }

    pub fn input_values(&self) -> (f64, f64) {
        self.input_values
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// True when RH is at 100 % within `tol` percentage points.
    pub fn is_saturated(&self, tol: f64) -> bool {
        self.rh >= 100.0 - tol
    }

    pub fn summary(&self) -> String {
        let u = self.unit_system;
        format!(
            "State(Tdb={:.2}{t},Twb={:.2}{t},Tdp={:.2}{t},RH={:.1}%,W={:.2}{w},h={:.2}{h})",
            self.tdb,
            self.twb,
            self.tdp,
            self.rh,
            self.w_display,
            self.h,
            t = u.temperature_label(),
            w = u.w_display_label(),
            h = u.enthalpy_label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_accepts_either_order() {
        let (pair, values) = InputPair::canonicalize(Property::RH, Property::Tdb, (50.0, 75.0)).unwrap();
        assert_eq!(pair, InputPair::TdbRh);
        assert_eq!(values, (75.0, 50.0));

        let (pair, values) = InputPair::canonicalize(Property::Twb, Property::RH, (60.0, 40.0)).unwrap();
        assert_eq!(pair, InputPair::TwbRh);
        assert_eq!(values, (60.0, 40.0));
    }

    #[test]
    fn canonicalize_rejects_unknown_pairs() {
        let err = InputPair::canonicalize(Property::W, Property::H, (0.01, 30.0)).unwrap_err();
        assert!(matches!(err, PropsError::UnsupportedInput { .. }));
        assert!(InputPair::canonicalize(Property::Tdb, Property::Tdb, (1.0, 2.0)).is_err());
    }

    #[test]
    fn property_parses_identifiers() {
        assert_eq!("Tdb".parse::<Property>().unwrap(), Property::Tdb);
        assert_eq!("h".parse::<Property>().unwrap(), Property::H);
        assert_eq!(" RH ".parse::<Property>().unwrap(), Property::RH);
        assert!("enthalpy".parse::<Property>().is_err());
    }

    #[test]
    fn pair_labels_follow_properties() {
        for pair in [
            InputPair::TdbRh,
            InputPair::TdbTwb,
            InputPair::TdbTdp,
            InputPair::TdbW,
            InputPair::TdbH,
            InputPair::TwbRh,
            InputPair::TdpRh,
        ] {
            let (a, b) = pair.properties();
            assert_eq!(pair.label(), format!("{a},{b}"));
        }
    }
}
