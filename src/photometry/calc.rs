use std::f64::consts::PI;

use crate::error::CalculationError;
use crate::photometry::models::{Calculable, Luminaire, LuminairePhotometricProperties};

/// Result of integrating the intensity grid over the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxIntegral {
    /// Total luminous flux in lumens.
    pub flux: f64,
    /// Flux emitted below the horizontal plane (gamma < 90°).
    pub downward_flux: f64,
}

/// Fill in the photometric values the file did not supply.
///
/// Values already present are returned unchanged and keep `is_calculated == false`.
/// Anything that cannot be computed (empty grid, zero flux, unknown lamp flux)
/// stays `None`.
pub fn calculate_photometry(luminaire: &Luminaire) -> LuminairePhotometricProperties {
    let mut properties = luminaire.photometric_properties.clone();

    let integral = match integrate_flux(luminaire) {
        Ok(integral) => Some(integral),
        Err(e) => {
            log::debug!("Flux integration skipped: {}", e);
            None
        }
    };

    if let Some(integral) = integral {
        if properties.luminous_flux.is_none() && integral.flux > 0.0 {
            properties.luminous_flux = Some(Calculable::calculated(integral.flux));
        }

        if properties.light_output_ratio.is_none() {
            match light_output_ratio(&integral, luminaire) {
                Ok(lor) => properties.light_output_ratio = Some(Calculable::calculated(lor)),
                Err(e) => log::debug!("Light output ratio unknown: {}", e),
            }
        }

        if properties.downward_flux_fraction.is_none() {
            match downward_flux_fraction(&integral) {
                Ok(dff) => properties.downward_flux_fraction = Some(Calculable::calculated(dff)),
                Err(e) => log::debug!("Downward flux fraction unknown: {}", e),
            }
        }
    }

    if properties.efficacy.is_none() {
        if let (Some(flux), Some(wattage)) = (properties.luminous_flux, luminaire.total_wattage()) {
            match efficacy(flux.value, wattage) {
                Ok(value) => properties.efficacy = Some(Calculable::calculated(value)),
                Err(e) => log::debug!("Efficacy unknown: {}", e),
            }
        }
    }

    properties
}

/// Integrate the intensity grid into total and downward flux.
///
/// Each C-plane is walked from gamma 0° towards 180° in steps of the first
/// gamma spacing. Every step uses the intensity of the nearest grid gamma
/// angle, so non-uniform grids are approximated rather than interpolated.
pub fn integrate_flux(luminaire: &Luminaire) -> Result<FluxIntegral, CalculationError> {
    let photometry = &luminaire.photometry;

    let ratio = if luminaire.is_absolute() {
        1.0
    } else {
        luminaire
            .total_lamp_flux()
            .map(|lumens| lumens / 1000.0)
            .ok_or_else(|| {
                CalculationError::InvalidArgument(
                    "relative photometry without lamp flux".to_string(),
                )
            })?
    };

    if photometry.c_planes.is_empty() {
        return Err(CalculationError::DivisionByZero("C-plane count"));
    }
    if photometry.gamma_angles.len() < 2 {
        return Err(CalculationError::DivisionByZero("gamma step"));
    }

    let gamma_step = photometry.gamma_angles[1] - photometry.gamma_angles[0];
    if !(gamma_step > 0.0) {
        return Err(CalculationError::DivisionByZero("gamma step"));
    }
    let gamma_step_rad = gamma_step.to_radians();
    let plane_weight = 2.0 * PI / photometry.c_planes.len() as f64;

    let mut flux = 0.0;
    let mut downward_flux = 0.0;

    for &c_plane in &photometry.c_planes {
        let mut plane_flux = 0.0;
        let mut plane_downward = 0.0;

        let mut n: u32 = 1;
        let mut gamma = 0.0;
        while gamma < 180.0 {
            let candela = photometry
                .nearest_gamma(gamma)
                .and_then(|g| photometry.intensity(c_plane, g))
                .unwrap_or(0.0)
                * ratio;

            let zone = (f64::from(n - 1) * gamma_step_rad).cos() - (f64::from(n) * gamma_step_rad).cos();
            let component = candela * zone;

            plane_flux += component;
            if gamma < 90.0 {
                plane_downward += component;
            }

            n += 1;
            gamma = f64::from(n - 1) * gamma_step;
        }

        flux += plane_flux * plane_weight;
        downward_flux += plane_downward * plane_weight;
    }

    log::debug!(
        "Integrated {} C-planes with gamma step {}°: flux={:.1} lm, downward={:.1} lm",
        photometry.c_planes.len(),
        gamma_step,
        flux,
        downward_flux
    );

    Ok(FluxIntegral { flux, downward_flux })
}

fn light_output_ratio(integral: &FluxIntegral, luminaire: &Luminaire) -> Result<f64, CalculationError> {
    if luminaire.is_absolute() {
        return Ok(1.0);
    }
    let lamp_flux = luminaire.total_lamp_flux().unwrap_or(0.0);
    if lamp_flux == 0.0 {
        return Err(CalculationError::DivisionByZero("light output ratio"));
    }
    Ok(integral.flux / lamp_flux)
}

fn downward_flux_fraction(integral: &FluxIntegral) -> Result<f64, CalculationError> {
    if integral.flux == 0.0 {
        return Err(CalculationError::DivisionByZero("downward flux fraction"));
    }
    Ok(integral.downward_flux / integral.flux)
}

fn efficacy(flux: f64, wattage: f64) -> Result<f64, CalculationError> {
    if wattage == 0.0 {
        return Err(CalculationError::DivisionByZero("efficacy"));
    }
    Ok(flux / wattage)
}

/// Yearly energy use in kWh for a luminaire running `daily_hours` a day.
pub fn annual_power_consumption(wattage: f64, daily_hours: f64) -> Result<f64, CalculationError> {
    if wattage < 0.0 {
        return Err(CalculationError::InvalidArgument(format!(
            "wattage must not be negative, got {}",
            wattage
        )));
    }
    if !(0.0..=24.0).contains(&daily_hours) {
        return Err(CalculationError::InvalidArgument(format!(
            "daily hours must be between 0 and 24, got {}",
            daily_hours
        )));
    }
    Ok(wattage / 1000.0 * daily_hours * 365.0)
}

pub fn energy_cost(kwh: f64, price_per_kwh: f64) -> Result<f64, CalculationError> {
    if kwh < 0.0 {
        return Err(CalculationError::InvalidArgument(format!(
            "energy must not be negative, got {}",
            kwh
        )));
    }
    if price_per_kwh < 0.0 {
        return Err(CalculationError::InvalidArgument(format!(
            "price per kWh must not be negative, got {}",
            price_per_kwh
        )));
    }
    Ok(kwh * price_per_kwh)
}

fn check_lighting_arguments(area: f64, luminaire_flux: f64, maintenance_factor: f64) -> Result<(), CalculationError> {
    if !(area > 0.0) {
        return Err(CalculationError::InvalidArgument(format!(
            "area must be positive, got {}",
            area
        )));
    }
    if !(luminaire_flux > 0.0) {
        return Err(CalculationError::InvalidArgument(format!(
            "luminaire flux must be positive, got {}",
            luminaire_flux
        )));
    }
    if !(maintenance_factor > 0.0 && maintenance_factor <= 1.0) {
        return Err(CalculationError::InvalidArgument(format!(
            "maintenance factor must be in (0, 1], got {}",
            maintenance_factor
        )));
    }
    Ok(())
}

/// Number of luminaires needed to reach `target_illuminance` (lx) on `area` (m²).
///
/// Rounded up, never less than one.
pub fn required_number_of_luminaires(
    target_illuminance: f64,
    area: f64,
    luminaire_flux: f64,
    maintenance_factor: f64,
) -> Result<u32, CalculationError> {
    check_lighting_arguments(area, luminaire_flux, maintenance_factor)?;
    if target_illuminance < 0.0 {
        return Err(CalculationError::InvalidArgument(format!(
            "target illuminance must not be negative, got {}",
            target_illuminance
        )));
    }
    let count = (target_illuminance * area / (luminaire_flux * maintenance_factor)).ceil();
    Ok((count as u32).max(1))
}

/// Average maintained illuminance (lx) produced by `number_of_luminaires` on `area` (m²).
pub fn illuminance(
    number_of_luminaires: u32,
    luminaire_flux: f64,
    area: f64,
    maintenance_factor: f64,
) -> Result<f64, CalculationError> {
    check_lighting_arguments(area, luminaire_flux, maintenance_factor)?;
    Ok(f64::from(number_of_luminaires) * luminaire_flux * maintenance_factor / area)
}
