// pf-core/src/units.rs

use std::fmt;
use std::str::FromStr;

use uom::si::f64::{
    Length as UomLength, Pressure as UomPressure, TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

use crate::error::PfError;
use crate::numeric::Real;

pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;

/// Unit system for every number crossing the property layer.
///
/// IP: °F, psia, lb/lb, BTU/lb, ft³/lb. SI: °C, Pa, kg/kg, kJ/kg, m³/kg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitSystem {
    IP,
    SI,
}

/// Axis limits of the psychrometric chart, `w_*` in display units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChartRange {
    pub tdb_min: Real,
    pub tdb_max: Real,
    pub w_display_min: Real,
    pub w_display_max: Real,
}

impl UnitSystem {
    pub fn other(self) -> Self {
        match self {
            UnitSystem::IP => UnitSystem::SI,
            UnitSystem::SI => UnitSystem::IP,
        }
    }

    /// Standard sea-level pressure.
    pub fn default_pressure(self) -> Real {
        match self {
            UnitSystem::IP => 14.696,
            UnitSystem::SI => 101_325.0,
        }
    }

    pub fn chart_range(self) -> ChartRange {
        match self {
            UnitSystem::IP => ChartRange {
                tdb_min: 20.0,
                tdb_max: 120.0,
                w_display_min: 0.0,
                w_display_max: 220.0,
            },
            UnitSystem::SI => ChartRange {
                tdb_min: -10.0,
                tdb_max: 55.0,
                w_display_min: 0.0,
                w_display_max: 30.0,
            },
        }
    }

    /// Upper dry-bulb bound for root searches.
    pub fn tdb_search_max(self) -> Real {
        match self {
            UnitSystem::IP => 200.0,
            UnitSystem::SI => 90.0,
        }
    }

    /// Grains per lb (IP) or grams per kg (SI) in one unit of humidity ratio.
    pub fn w_display_factor(self) -> Real {
        match self {
            UnitSystem::IP => 7000.0,
            UnitSystem::SI => 1000.0,
        }
    }

    pub fn w_to_display(self, w: Real) -> Real {
        w * self.w_display_factor()
    }

    pub fn w_from_display(self, w_display: Real) -> Real {
        w_display / self.w_display_factor()
    }

    /// Moist-air specific heat, BTU/lb·°F or kJ/kg·K.
    pub fn cp_air(self) -> Real {
        match self {
            UnitSystem::IP => 0.244,
            UnitSystem::SI => 1.006,
        }
    }

    /// Latent heat of vaporization at the enthalpy datum, BTU/lb or kJ/kg.
    pub fn hfg(self) -> Real {
        match self {
            UnitSystem::IP => 1061.0,
            UnitSystem::SI => 2501.0,
        }
    }

    pub fn temperature_label(self) -> &'static str {
        match self {
            UnitSystem::IP => "°F",
            UnitSystem::SI => "°C",
        }
    }

    pub fn pressure_label(self) -> &'static str {
        match self {
            UnitSystem::IP => "psia",
            UnitSystem::SI => "Pa",
        }
    }

    pub fn w_display_label(self) -> &'static str {
        match self {
            UnitSystem::IP => "gr/lb",
            UnitSystem::SI => "g/kg",
        }
    }

    pub fn enthalpy_label(self) -> &'static str {
        match self {
            UnitSystem::IP => "BTU/lb",
            UnitSystem::SI => "kJ/kg",
        }
    }

    /// Absolute load label (airflow supplied).
    pub fn load_label(self) -> &'static str {
        match self {
            UnitSystem::IP => "BTU/hr",
            UnitSystem::SI => "W",
        }
    }

    pub fn airflow_label(self) -> &'static str {
        match self {
            UnitSystem::IP => "CFM",
            UnitSystem::SI => "m³/s",
        }
    }

    pub fn water_flow_label(self) -> &'static str {
        match self {
            UnitSystem::IP => "GPM",
            UnitSystem::SI => "L/s",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::IP => write!(f, "IP"),
            UnitSystem::SI => write!(f, "SI"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = PfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IP" => Ok(UnitSystem::IP),
            "SI" => Ok(UnitSystem::SI),
            _ => Err(PfError::InvalidArg {
                what: "unit system must be IP or SI",
            }),
        }
    }
}

#[inline]
pub fn temperature(v: Real, units: UnitSystem) -> Temperature {
    use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit};
    match units {
        UnitSystem::IP => Temperature::new::<degree_fahrenheit>(v),
        UnitSystem::SI => Temperature::new::<degree_celsius>(v),
    }
}

#[inline]
pub fn temperature_value(t: Temperature, units: UnitSystem) -> Real {
    use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit};
    match units {
        UnitSystem::IP => t.get::<degree_fahrenheit>(),
        UnitSystem::SI => t.get::<degree_celsius>(),
    }
}

#[inline]
pub fn temp_interval(v: Real, units: UnitSystem) -> TempInterval {
    use uom::si::temperature_interval::{degree_celsius, degree_fahrenheit};
    match units {
        UnitSystem::IP => TempInterval::new::<degree_fahrenheit>(v),
        UnitSystem::SI => TempInterval::new::<degree_celsius>(v),
    }
}

#[inline]
pub fn temp_interval_value(t: TempInterval, units: UnitSystem) -> Real {
    use uom::si::temperature_interval::{degree_celsius, degree_fahrenheit};
    match units {
        UnitSystem::IP => t.get::<degree_fahrenheit>(),
        UnitSystem::SI => t.get::<degree_celsius>(),
    }
}

#[inline]
pub fn pressure(v: Real, units: UnitSystem) -> Pressure {
    use uom::si::pressure::{pascal, pound_force_per_square_inch};
    match units {
        UnitSystem::IP => Pressure::new::<pound_force_per_square_inch>(v),
        UnitSystem::SI => Pressure::new::<pascal>(v),
    }
}

#[inline]
pub fn pressure_value(p: Pressure, units: UnitSystem) -> Real {
    use uom::si::pressure::{pascal, pound_force_per_square_inch};
    match units {
        UnitSystem::IP => p.get::<pound_force_per_square_inch>(),
        UnitSystem::SI => p.get::<pascal>(),
    }
}

/// Altitude: ft (IP) or m (SI).
#[inline]
pub fn length(v: Real, units: UnitSystem) -> Length {
    use uom::si::length::{foot, meter};
    match units {
        UnitSystem::IP => Length::new::<foot>(v),
        UnitSystem::SI => Length::new::<meter>(v),
    }
}

#[inline]
pub fn length_value(l: Length, units: UnitSystem) -> Real {
    use uom::si::length::{foot, meter};
    match units {
        UnitSystem::IP => l.get::<foot>(),
        UnitSystem::SI => l.get::<meter>(),
    }
}

pub fn convert_temperature(v: Real, from: UnitSystem, to: UnitSystem) -> Real {
    if from == to {
        return v;
    }
    temperature_value(temperature(v, from), to)
}

pub fn convert_temp_interval(v: Real, from: UnitSystem, to: UnitSystem) -> Real {
    if from == to {
        return v;
    }
    temp_interval_value(temp_interval(v, from), to)
}

pub fn convert_pressure(v: Real, from: UnitSystem, to: UnitSystem) -> Real {
    if from == to {
        return v;
    }
    pressure_value(pressure(v, from), to)
}

pub fn convert_length(v: Real, from: UnitSystem, to: UnitSystem) -> Real {
    if from == to {
        return v;
    }
    length_value(length(v, from), to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_conversions() {
        let c = convert_temperature(212.0, UnitSystem::IP, UnitSystem::SI);
        assert!((c - 100.0).abs() < 1e-9);
        let f = convert_temperature(-40.0, UnitSystem::SI, UnitSystem::IP);
        assert!((f + 40.0).abs() < 1e-9);
        let d = convert_temp_interval(9.0, UnitSystem::IP, UnitSystem::SI);
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn pressure_conversion_matches_standard_atmosphere() {
        let pa = convert_pressure(
            UnitSystem::IP.default_pressure(),
            UnitSystem::IP,
            UnitSystem::SI,
        );
        assert!((pa - UnitSystem::SI.default_pressure()).abs() < 5.0);
    }

    #[test]
    fn length_conversion() {
        let ft = convert_length(1000.0, UnitSystem::SI, UnitSystem::IP);
        assert!((ft - 3280.84).abs() < 0.01);
    }

    #[test]
    fn display_factor_roundtrip() {
        let w = 0.0093;
        let gr = UnitSystem::IP.w_to_display(w);
        assert!((gr - 65.1).abs() < 1e-9);
        assert!((UnitSystem::IP.w_from_display(gr) - w).abs() < 1e-15);
    }

    #[test]
    fn parse_unit_system() {
        assert_eq!("ip".parse::<UnitSystem>().unwrap(), UnitSystem::IP);
        assert_eq!(" SI ".parse::<UnitSystem>().unwrap(), UnitSystem::SI);
        assert!("metric".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn chart_ranges_are_ordered() {
        for u in [UnitSystem::IP, UnitSystem::SI] {
            let r = u.chart_range();
            assert!(r.tdb_min < r.tdb_max);
            assert!(r.tdb_max < u.tdb_search_max());
            assert_eq!(u.other().other(), u);
        }
    }
}
