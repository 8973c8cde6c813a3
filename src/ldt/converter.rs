use crate::error::PhotometryError;
use crate::ldt::extractor::{LdtContent, LdtLampSet};
use crate::parse::unique_angles;
use crate::photometry::{
    Calculable, DirectRatio, FileFormat, Lamps, Luminaire, LuminaireGeometry,
    LuminairePhotometricProperties, LuminaireShape, LuminaireType, LuminousOpeningGeometry,
    LuminousOpeningShape, Photometry, PhotometryMetadata,
};
use crate::units::LengthUnits;

/// Room indices of the ten EULUMDAT direct-ratio lines.
pub const ROOM_INDICES: [f64; 10] = [0.60, 0.80, 1.00, 1.25, 1.50, 2.00, 2.50, 3.00, 4.00, 5.00];

/// Build a [`Luminaire`] from extracted EULUMDAT content.
pub fn convert_content(content: LdtContent) -> Result<Luminaire, PhotometryError> {
    let is_absolute = content
        .lamp_sets
        .iter()
        .any(|set| set.number_of_lamps.is_some_and(|n| n < 0));

    // Slots stay positional so each value block lines up with its plane
    let c_slots: Vec<Option<f64>> = content
        .c_angles
        .iter()
        .map(|c| c.map(|c| c.rem_euclid(360.0)))
        .collect();
    if content.gamma_angles.iter().flatten().any(|g| *g < 0.0) {
        log::warn!("Dropping negative gamma angles from EULUMDAT data");
    }
    let gamma_slots: Vec<Option<f64>> = content
        .gamma_angles
        .iter()
        .map(|g| g.filter(|g| *g >= 0.0))
        .collect();
    let gamma_angles = unique_angles(gamma_slots.iter().flatten().copied());

    let scale = if is_absolute {
        match content.lamp_sets.first().and_then(|set| set.total_luminous_flux) {
            Some(flux) => flux / 1000.0,
            None => {
                log::warn!("Absolute EULUMDAT data without lamp flux, intensities are kept unscaled");
                1.0
            }
        }
    } else {
        1.0
    };

    let values: Vec<Option<f64>> = content
        .values
        .iter()
        .map(|value| value.map(|v| v * scale))
        .collect();

    let symmetry = content.symmetry();
    let (intensities, c_planes) = symmetry.expand(&c_slots, &gamma_slots, &values);

    let photometry = Photometry {
        gamma_angles,
        c_planes,
        intensities,
    };

    let lamps: Vec<Lamps> = content.lamp_sets.iter().map(convert_lamp_set).collect();
    if lamps.is_empty() {
        log::warn!("EULUMDAT file declares no lamp sets");
    }

    let direct_ratios = ROOM_INDICES
        .iter()
        .zip(&content.direct_ratios)
        .filter_map(|(room_index, ratio)| {
            ratio.map(|ratio| DirectRatio {
                room_index: *room_index,
                ratio,
            })
        })
        .collect();

    let luminaire_type = match content.type_indicator {
        Some(1) => Some(LuminaireType::PointSourceWithVerticalSymmetry),
        Some(2) => Some(LuminaireType::Linear),
        Some(3) => Some(LuminaireType::PointSourceWithOtherSymmetry),
        _ => None,
    };

    let metadata = PhotometryMetadata {
        format: FileFormat::Ldt,
        luminaire: content.luminaire_name.clone(),
        luminaire_catalog_number: content.luminaire_number.clone(),
        manufacturer: content.identification.clone(),
        measurement_report: content.measurement_report.clone(),
        file_name: content.file_name.clone(),
        date_and_user: content.date_user.clone(),
        luminaire_type,
        tilt: content.tilt.map(|t| t.to_string()),
        direct_ratios,
        file_units: LengthUnits::Millimeters,
        file_source: content.source.clone(),
        additional_properties: Default::default(),
    };

    let photometric_properties = LuminairePhotometricProperties {
        is_absolute,
        luminous_flux: None,
        light_output_ratio: content
            .light_output_ratio
            .map(|lor| Calculable::from_source(lor / 100.0)),
        downward_flux_fraction: content
            .downward_flux_fraction
            .map(|dff| Calculable::from_source(dff / 100.0)),
        efficacy: None,
    };

    log::info!(
        "Converted EULUMDAT photometry: symmetry {}, {} C-planes x {} gamma angles ({})",
        symmetry.code(),
        photometry.c_planes.len(),
        photometry.gamma_angles.len(),
        if is_absolute { "absolute" } else { "relative" }
    );

    Ok(Luminaire {
        photometry,
        geometry: housing(&content),
        luminous_opening: opening(&content),
        lamps,
        metadata,
        photometric_properties,
    })
}

fn convert_lamp_set(set: &LdtLampSet) -> Lamps {
    let count = set.number_of_lamps.map(i64::unsigned_abs).unwrap_or(1) as u32;
    let lumens_per_lamp = match (set.total_luminous_flux, count) {
        (Some(flux), count) if count > 0 => Some(flux / f64::from(count)),
        _ => None,
    };
    Lamps {
        number_of_lamps: count,
        description: set.lamp_type.clone(),
        lumens_per_lamp,
        wattage: set.wattage,
        color: set.color_appearance.clone(),
        cri: set.color_rendering.clone(),
        ..Default::default()
    }
}

fn mm(value: Option<f64>) -> Option<f64> {
    value.map(|v| LengthUnits::Millimeters.to_meters(v))
}

/// Housing dimensions; a zero width marks a round luminaire.
fn housing(content: &LdtContent) -> Option<LuminaireGeometry> {
    let length = mm(content.length)?;
    let width = mm(content.width)?;
    let height = mm(content.height).unwrap_or(0.0);
    Some(if width == 0.0 {
        LuminaireGeometry {
            length,
            width: length,
            height,
            shape: LuminaireShape::Round,
        }
    } else {
        LuminaireGeometry {
            length,
            width,
            height,
            shape: LuminaireShape::Rectangular,
        }
    })
}

fn opening(content: &LdtContent) -> Option<LuminousOpeningGeometry> {
    let length = mm(content.luminous_length)?;
    let width = mm(content.luminous_width)?;

    let heights = [
        mm(content.height_c0),
        mm(content.height_c90),
        mm(content.height_c180),
        mm(content.height_c270),
    ];
    let height = heights.iter().flatten().copied().fold(0.0, f64::max);

    let mut geometry = if length == 0.0 && width == 0.0 {
        LuminousOpeningGeometry::new(0.0, 0.0, height, LuminousOpeningShape::Point)
    } else if width == 0.0 {
        LuminousOpeningGeometry::new(length, length, height, LuminousOpeningShape::Round)
    } else {
        LuminousOpeningGeometry::new(length, width, height, LuminousOpeningShape::Rectangular)
    };
    geometry.height_c0 = heights[0];
    geometry.height_c90 = heights[1];
    geometry.height_c180 = heights[2];
    geometry.height_c270 = heights[3];
    Some(geometry)
}
