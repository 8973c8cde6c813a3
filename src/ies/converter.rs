use std::collections::BTreeMap;

use crate::error::PhotometryError;
use crate::ies::extractor::IesContent;
use crate::ies::opening::luminous_opening;
use crate::parse::{round_to, unique_angles};
use crate::photometry::{
    FileFormat, IntensityGrid, Lamps, Luminaire, LuminairePhotometricProperties, Photometry,
    PhotometryMetadata,
};
use crate::units::LengthUnits;

/// Keywords that are moved into structured fields.
const STRUCTURED_KEYWORDS: &[&str] = &[
    "LUMCAT",
    "LUMINAIRE",
    "MANUFAC",
    "LAMP",
    "LAMPCAT",
    "LAMPPOSITION",
    "BALLASTCAT",
    "BALLAST",
    "COLORTEMP",
    "CRI",
    "ISSUEDATE",
    "DATE",
];

/// Build a [`Luminaire`] from extracted IES content.
pub fn convert_content(content: IesContent) -> Result<Luminaire, PhotometryError> {
    let units = match content.units_type.and_then(LengthUnits::from_ies_code) {
        Some(units) => units,
        None => {
            log::warn!(
                "Unknown IES units type {:?}, assuming meters",
                content.units_type
            );
            LengthUnits::Meters
        }
    };

    let luminous_opening = luminous_opening(
        content.standard,
        content.width,
        content.length,
        content.height,
        units,
    )?;

    let number_of_lamps = content
        .number_of_lamps
        .map(|n| n.unsigned_abs() as u32)
        .unwrap_or(1);

    let is_absolute = content.lumens_per_lamp.is_none_or(|lumens| lumens < 0.0);
    let divider = if is_absolute {
        1.0
    } else {
        let lumens = content.lumens_per_lamp.unwrap_or(0.0) * f64::from(number_of_lamps);
        if lumens > 0.0 {
            lumens / 1000.0
        } else {
            log::warn!("IES lamp flux is zero, intensities are kept unscaled");
            1.0
        }
    };

    let factor = content.multiplying_factor.unwrap_or(1.0)
        * content.ballast_factor.unwrap_or(1.0)
        * content.photometric_factor.unwrap_or(1.0);

    let photometry = build_photometry(&content, factor, divider);

    let mut keywords = content.keywords;
    let keyword = |keywords: &BTreeMap<String, String>, key: &str| keywords.get(key).cloned();

    let lamps = Lamps {
        number_of_lamps,
        description: keyword(&keywords, "LAMP"),
        catalog_number: keyword(&keywords, "LAMPCAT"),
        position: keyword(&keywords, "LAMPPOSITION"),
        lumens_per_lamp: content.lumens_per_lamp.filter(|lumens| *lumens >= 0.0),
        wattage: content.input_watts,
        color: keyword(&keywords, "COLORTEMP"),
        cri: keyword(&keywords, "CRI"),
        ballast_description: keyword(&keywords, "BALLAST"),
        ballast_catalog_number: keyword(&keywords, "BALLASTCAT"),
    };

    let metadata = PhotometryMetadata {
        format: FileFormat::Ies,
        luminaire: keyword(&keywords, "LUMINAIRE"),
        luminaire_catalog_number: keyword(&keywords, "LUMCAT"),
        manufacturer: keyword(&keywords, "MANUFAC"),
        measurement_report: None,
        file_name: None,
        date_and_user: keyword(&keywords, "ISSUEDATE").or_else(|| keyword(&keywords, "DATE")),
        luminaire_type: None,
        tilt: content.tilt,
        direct_ratios: Vec::new(),
        file_units: units,
        file_source: content.source,
        additional_properties: {
            keywords.retain(|key, _| !STRUCTURED_KEYWORDS.contains(&key.as_str()));
            keywords
        },
    };

    log::info!(
        "Converted IES photometry: {} C-planes x {} gamma angles ({})",
        photometry.c_planes.len(),
        photometry.gamma_angles.len(),
        if is_absolute { "absolute" } else { "relative" }
    );

    Ok(Luminaire {
        photometry,
        geometry: None,
        luminous_opening,
        lamps: vec![lamps],
        metadata,
        photometric_properties: LuminairePhotometricProperties {
            is_absolute,
            ..Default::default()
        },
    })
}

fn build_photometry(content: &IesContent, factor: f64, divider: f64) -> Photometry {
    let n_v = content.n_v();
    let mut grid = IntensityGrid::new();

    for (h, c_plane) in content.c_planes.iter().enumerate() {
        let Some(c_plane) = c_plane.map(|c| c.rem_euclid(360.0)) else {
            continue;
        };
        for (v, gamma) in content.gamma_angles.iter().enumerate() {
            let Some(gamma) = gamma.filter(|g| *g >= 0.0) else {
                continue;
            };
            let Some(raw) = content.raw_values.get(h * n_v + v).copied().flatten() else {
                continue;
            };
            // C360 wraps onto C0; the first plane read keeps its samples
            if grid.contains(c_plane, gamma) {
                log::debug!("Ignoring duplicate sample at C{} gamma {}", c_plane, gamma);
                continue;
            }
            grid.insert(c_plane, gamma, round_to(raw * factor / divider, 2));
        }
    }

    Photometry {
        gamma_angles: unique_angles(
            content
                .gamma_angles
                .iter()
                .flatten()
                .copied()
                .filter(|g| *g >= 0.0),
        ),
        c_planes: unique_angles(
            content
                .c_planes
                .iter()
                .flatten()
                .map(|c| c.rem_euclid(360.0)),
        ),
        intensities: grid,
    }
}
