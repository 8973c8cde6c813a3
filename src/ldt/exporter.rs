use crate::ldt::converter::ROOM_INDICES;
use crate::ldt::symmetry::Symmetry;
use crate::parse::{format_number, parse_float};
use crate::photometry::{Luminaire, LuminaireShape, LuminaireType, LuminousOpeningShape};
use crate::units::LengthUnits;

const LINE_END: &str = "\r\n";

/// Writes a [`Luminaire`] as an unsymmetric EULUMDAT file.
///
/// Intensities are written in cd/klm. For absolute photometry they are
/// divided by the first lamp set's flux and every lamp count is negated.
pub struct LdtExporter;

impl LdtExporter {
    pub fn export(luminaire: &Luminaire) -> String {
        let mut lines: Vec<String> = Vec::new();
        let metadata = &luminaire.metadata;
        let photometry = &luminaire.photometry;
        let text = |value: &Option<String>| value.clone().unwrap_or_default().replace('\n', " ");

        // Lines 1-7
        lines.push(text(&metadata.manufacturer));
        lines.push(
            match metadata.luminaire_type {
                Some(LuminaireType::PointSourceWithVerticalSymmetry) => 1,
                Some(LuminaireType::Linear) => 2,
                Some(LuminaireType::PointSourceWithOtherSymmetry) => 3,
                None => 0,
            }
            .to_string(),
        );
        lines.push(Symmetry::None.code().to_string());
        lines.push(photometry.c_planes.len().to_string());
        lines.push(format_number(spacing(&photometry.c_planes)));
        lines.push(photometry.gamma_angles.len().to_string());
        lines.push(format_number(spacing(&photometry.gamma_angles)));

        // Lines 8-12
        lines.push(text(&metadata.measurement_report));
        lines.push(text(&metadata.luminaire));
        lines.push(text(&metadata.luminaire_catalog_number));
        lines.push(text(&metadata.file_name));
        lines.push(text(&metadata.date_and_user));

        // Lines 13-21, millimeters
        let mm = |meters: f64| format_number(LengthUnits::Meters.convert(meters, LengthUnits::Millimeters));
        match &luminaire.geometry {
            Some(housing) => {
                let width = match housing.shape {
                    LuminaireShape::Round => 0.0,
                    LuminaireShape::Rectangular => housing.width,
                };
                lines.extend([mm(housing.length), mm(width), mm(housing.height)]);
            }
            None => lines.extend(["0", "0", "0"].map(String::from)),
        }
        match &luminaire.luminous_opening {
            Some(opening) => {
                let (length, width) = match opening.shape {
                    LuminousOpeningShape::Point => (0.0, 0.0),
                    LuminousOpeningShape::Round | LuminousOpeningShape::Sphere => {
                        (opening.length, 0.0)
                    }
                    _ => (opening.length, opening.width),
                };
                lines.extend([mm(length), mm(width)]);
                for height in [
                    opening.height_c0,
                    opening.height_c90,
                    opening.height_c180,
                    opening.height_c270,
                ] {
                    lines.push(mm(height.unwrap_or(opening.height)));
                }
            }
            None => lines.extend(["0"; 6].map(String::from)),
        }

        // Lines 22-25
        let properties = &luminaire.photometric_properties;
        let percent = |value: Option<f64>| format_number(value.unwrap_or(0.0) * 100.0);
        lines.push(percent(properties.downward_flux_fraction.map(|c| c.value)));
        lines.push(percent(properties.light_output_ratio.map(|c| c.value)));
        lines.push("1".to_string());
        lines.push(
            metadata
                .tilt
                .as_deref()
                .and_then(parse_float)
                .map(format_number)
                .unwrap_or_else(|| "0".to_string()),
        );

        // Line 26: lamp sets
        let sign = if luminaire.is_absolute() { -1 } else { 1 };
        let flux = luminaire.lamps.first().and_then(|lamp| lamp.total_lumens());
        if luminaire.lamps.is_empty() {
            lines.extend(
                [
                    "1".to_string(),
                    sign.to_string(),
                    String::new(),
                    "1000".to_string(),
                    String::new(),
                    String::new(),
                    "0".to_string(),
                ],
            );
        } else {
            lines.push(luminaire.lamps.len().to_string());
            for lamp in &luminaire.lamps {
                lines.push((sign * i64::from(lamp.number_of_lamps.max(1))).to_string());
                lines.push(text(&lamp.description));
                lines.push(format_number(lamp.total_lumens().unwrap_or(1000.0)));
                lines.push(text(&lamp.color));
                lines.push(text(&lamp.cri));
                lines.push(format_number(lamp.wattage.unwrap_or(0.0)));
            }
        }

        // Line 27: direct ratios by room index
        for room_index in ROOM_INDICES {
            let ratio = metadata
                .direct_ratios
                .iter()
                .find(|ratio| (ratio.room_index - room_index).abs() < 1e-9)
                .map(|ratio| ratio.ratio)
                .unwrap_or(0.0);
            lines.push(format_number(ratio));
        }

        // Lines 28-30
        lines.extend(photometry.c_planes.iter().map(|c| format_number(*c)));
        lines.extend(photometry.gamma_angles.iter().map(|g| format_number(*g)));

        let scale = match (luminaire.is_absolute(), flux) {
            (true, Some(flux)) if flux > 0.0 => 1000.0 / flux,
            _ => 1.0,
        };
        for &c_plane in &photometry.c_planes {
            for &gamma in &photometry.gamma_angles {
                let value = photometry.intensity(c_plane, gamma).unwrap_or(0.0) * scale;
                lines.push(format_number(value));
            }
        }

        log::info!(
            "Exported EULUMDAT file ({} C-planes x {} gamma angles)",
            photometry.c_planes.len(),
            photometry.gamma_angles.len()
        );

        let mut output = lines.join(LINE_END);
        output.push_str(LINE_END);
        output
    }
}

/// Step between the first two angles, 0 when not evenly spaced.
fn spacing(angles: &[f64]) -> f64 {
    if angles.len() < 2 {
        return 0.0;
    }
    let step = angles[1] - angles[0];
    let even = angles
        .windows(2)
        .all(|pair| ((pair[1] - pair[0]) - step).abs() < 1e-6);
    if even { step } else { 0.0 }
}
