use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length units used by photometric files and for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnits {
    #[default]
    Meters,
    Centimeters,
    Millimeters,
    Feet,
    Inches,
}

impl LengthUnits {
    /// Number of meters in one unit.
    pub fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnits::Meters => 1.0,
            LengthUnits::Centimeters => 0.01,
            LengthUnits::Millimeters => 0.001,
            LengthUnits::Feet => 0.3048,
            LengthUnits::Inches => 0.0254,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnits::Meters => "m",
            LengthUnits::Centimeters => "cm",
            LengthUnits::Millimeters => "mm",
            LengthUnits::Feet => "ft",
            LengthUnits::Inches => "in",
        }
    }

    /// Convert a value expressed in `self` into `target` units.
    pub fn convert(self, value: f64, target: LengthUnits) -> f64 {
        value * self.meters_per_unit() / target.meters_per_unit()
    }

    pub fn to_meters(self, value: f64) -> f64 {
        self.convert(value, LengthUnits::Meters)
    }

    /// IES units-type code (1 = feet, 2 = meters).
    pub fn from_ies_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(LengthUnits::Feet),
            2 => Some(LengthUnits::Meters),
            _ => None,
        }
    }
}

impl fmt::Display for LengthUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LengthUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" => Ok(LengthUnits::Meters),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnits::Centimeters),
            "mm" | "millimeter" | "millimeters" => Ok(LengthUnits::Millimeters),
            "ft" | "foot" | "feet" => Ok(LengthUnits::Feet),
            "in" | "inch" | "inches" => Ok(LengthUnits::Inches),
            other => Err(format!("Unknown length unit: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_feet_to_meters() {
        assert_relative_eq!(LengthUnits::Feet.to_meters(1.0), 0.3048);
        assert_relative_eq!(LengthUnits::Feet.to_meters(-0.1), -0.03048);
    }

    #[test]
    fn test_convert_between_units() {
        assert_relative_eq!(LengthUnits::Millimeters.convert(1500.0, LengthUnits::Meters), 1.5);
        assert_relative_eq!(LengthUnits::Meters.convert(1.0, LengthUnits::Centimeters), 100.0);
        assert_relative_eq!(LengthUnits::Inches.convert(12.0, LengthUnits::Feet), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ies_codes() {
        assert_eq!(LengthUnits::from_ies_code(1), Some(LengthUnits::Feet));
        assert_eq!(LengthUnits::from_ies_code(2), Some(LengthUnits::Meters));
        assert_eq!(LengthUnits::from_ies_code(3), None);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("mm".parse::<LengthUnits>(), Ok(LengthUnits::Millimeters));
        assert_eq!(" Feet ".parse::<LengthUnits>(), Ok(LengthUnits::Feet));
        assert!("parsec".parse::<LengthUnits>().is_err());
    }
}
