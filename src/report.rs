use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::photometry::{
    annual_power_consumption, energy_cost, Calculable, FileFormat, Luminaire,
};
use crate::units::LengthUnits;

/// Dimensions converted to the display units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    pub shape: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyEstimate {
    pub daily_hours: f64,
    pub annual_kwh: f64,
    pub annual_cost: Option<f64>,
}

/// What the command line prints about an imported file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotometricSummary {
    pub format: FileFormat,
    pub manufacturer: Option<String>,
    pub luminaire: Option<String>,
    pub catalog_number: Option<String>,
    pub is_absolute: bool,
    pub c_planes: usize,
    pub gamma_angles: usize,
    pub max_intensity: Option<f64>,
    pub lamp_flux: Option<f64>,
    pub wattage: Option<f64>,
    pub luminous_flux: Option<Calculable>,
    pub light_output_ratio: Option<Calculable>,
    pub downward_flux_fraction: Option<Calculable>,
    pub efficacy: Option<Calculable>,
    pub units: LengthUnits,
    pub housing: Option<Dimensions>,
    pub luminous_opening: Option<Dimensions>,
    pub energy: Option<EnergyEstimate>,
}

impl PhotometricSummary {
    /// Summarize `luminaire`, which should already carry calculated photometry.
    pub fn new(luminaire: &Luminaire, units: LengthUnits) -> Self {
        let metadata = &luminaire.metadata;
        let properties = &luminaire.photometric_properties;
        let convert = |meters: f64| LengthUnits::Meters.convert(meters, units);

        Self {
            format: metadata.format,
            manufacturer: metadata.manufacturer.clone(),
            luminaire: metadata.luminaire.clone(),
            catalog_number: metadata.luminaire_catalog_number.clone(),
            is_absolute: luminaire.is_absolute(),
            c_planes: luminaire.photometry.c_planes.len(),
            gamma_angles: luminaire.photometry.gamma_angles.len(),
            max_intensity: luminaire.photometry.max_intensity(),
            lamp_flux: luminaire.total_lamp_flux(),
            wattage: luminaire.total_wattage(),
            luminous_flux: properties.luminous_flux,
            light_output_ratio: properties.light_output_ratio,
            downward_flux_fraction: properties.downward_flux_fraction,
            efficacy: properties.efficacy,
            units,
            housing: luminaire.geometry.as_ref().map(|g| Dimensions {
                shape: format!("{:?}", g.shape),
                length: convert(g.length),
                width: convert(g.width),
                height: convert(g.height),
            }),
            luminous_opening: luminaire.luminous_opening.as_ref().map(|o| Dimensions {
                shape: o.shape.description().to_string(),
                length: convert(o.length),
                width: convert(o.width),
                height: convert(o.height),
            }),
            energy: None,
        }
    }

    /// Add an annual energy estimate from the luminaire wattage.
    pub fn with_energy(mut self, daily_hours: f64, price_per_kwh: Option<f64>) -> Result<Self> {
        let Some(wattage) = self.wattage else {
            log::warn!("No wattage in file, skipping energy estimate");
            return Ok(self);
        };
        let annual_kwh = annual_power_consumption(wattage, daily_hours)?;
        let annual_cost = match price_per_kwh {
            Some(price) => Some(energy_cost(annual_kwh, price)?),
            None => None,
        };
        self.energy = Some(EnergyEstimate {
            daily_hours,
            annual_kwh,
            annual_cost,
        });
        Ok(self)
    }
}

fn optional<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}

fn calculable(value: &Option<Calculable>, scale: f64, unit: &str) -> String {
    match value {
        Some(c) => format!(
            "{:.2}{}{}",
            c.value * scale,
            unit,
            if c.is_calculated { " (calculated)" } else { "" }
        ),
        None => "unknown".to_string(),
    }
}

impl fmt::Display for PhotometricSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Format:          {:?}", self.format)?;
        writeln!(f, "Manufacturer:    {}", optional(&self.manufacturer))?;
        writeln!(f, "Luminaire:       {}", optional(&self.luminaire))?;
        writeln!(f, "Catalog number:  {}", optional(&self.catalog_number))?;
        writeln!(
            f,
            "Photometry:      {} ({} C-planes x {} gamma angles)",
            if self.is_absolute { "absolute" } else { "relative" },
            self.c_planes,
            self.gamma_angles
        )?;
        writeln!(f, "Max intensity:   {}", optional(&self.max_intensity))?;
        writeln!(f, "Lamp flux:       {} lm", optional(&self.lamp_flux))?;
        writeln!(f, "Wattage:         {} W", optional(&self.wattage))?;
        writeln!(f, "Luminous flux:   {}", calculable(&self.luminous_flux, 1.0, " lm"))?;
        writeln!(f, "LOR:             {}", calculable(&self.light_output_ratio, 100.0, " %"))?;
        writeln!(f, "DFF:             {}", calculable(&self.downward_flux_fraction, 100.0, " %"))?;
        writeln!(f, "Efficacy:        {}", calculable(&self.efficacy, 1.0, " lm/W"))?;
        for (label, dimensions) in [("Housing", &self.housing), ("Opening", &self.luminous_opening)] {
            if let Some(d) = dimensions {
                writeln!(
                    f,
                    "{:<17}{} {:.3} x {:.3} x {:.3} {}",
                    format!("{}:", label),
                    d.shape,
                    d.length,
                    d.width,
                    d.height,
                    self.units
                )?;
            }
        }
        if let Some(energy) = &self.energy {
            writeln!(
                f,
                "Energy:          {:.1} kWh/year at {} h/day",
                energy.annual_kwh, energy.daily_hours
            )?;
            if let Some(cost) = energy.annual_cost {
                writeln!(f, "Energy cost:     {:.2} /year", cost)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, CalculationError};
    use crate::photometry::{Lamps, LuminousOpeningGeometry, LuminousOpeningShape};
    use approx::assert_relative_eq;

    fn luminaire() -> Luminaire {
        Luminaire {
            lamps: vec![Lamps {
                number_of_lamps: 1,
                lumens_per_lamp: Some(1000.0),
                wattage: Some(100.0),
                ..Default::default()
            }],
            luminous_opening: Some(LuminousOpeningGeometry::new(
                0.5,
                0.25,
                0.0,
                LuminousOpeningShape::Rectangular,
            )),
            ..Default::default()
        }
    }

    #[test]
    fn test_units_conversion() {
        let summary = PhotometricSummary::new(&luminaire(), LengthUnits::Millimeters);
        let opening = summary.luminous_opening.unwrap();
        assert_relative_eq!(opening.length, 500.0);
        assert_relative_eq!(opening.width, 250.0);
        assert_eq!(summary.lamp_flux, Some(1000.0));
    }

    #[test]
    fn test_energy_estimate() {
        let summary = PhotometricSummary::new(&luminaire(), LengthUnits::Meters)
            .with_energy(2.5, Some(0.3))
            .unwrap();
        let energy = summary.energy.unwrap();
        assert_relative_eq!(energy.annual_kwh, 100.0 / 1000.0 * 2.5 * 365.0);
        assert_relative_eq!(energy.annual_cost.unwrap(), 91.25 * 0.3);
    }

    #[test]
    fn test_invalid_hours_are_rejected() {
        let result = PhotometricSummary::new(&luminaire(), LengthUnits::Meters).with_energy(25.0, None);
        assert!(matches!(
            result,
            Err(AppError::Calculation(CalculationError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_text_and_json() {
        let summary = PhotometricSummary::new(&luminaire(), LengthUnits::Meters);
        let text = summary.to_string();
        assert!(text.contains("Luminous flux:   unknown"));
        assert!(text.contains("Opening:         Rectangular 0.500 x 0.250 x 0.000 m"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["format"], "ies");
        assert_eq!(json["units"], "meters");
        assert_eq!(json["wattage"], 100.0);
    }
}
