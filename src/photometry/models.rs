use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::units::LengthUnits;

/// An angle in degrees usable as a map key.
///
/// Values are rounded to 1e-6 degrees so that mirrored angles computed during
/// symmetry expansion compare equal to the angles read from the file.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Angle(f64);

impl Angle {
    pub fn new(degrees: f64) -> Self {
        let rounded = (degrees * 1e6).round() / 1e6;
        // -0.0 and 0.0 must be the same key
        Angle(if rounded == 0.0 { 0.0 } else { rounded })
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Angle {}

impl PartialOrd for Angle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Angle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Intensity values keyed by `(c_plane, gamma)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntensityGrid {
    values: BTreeMap<(Angle, Angle), f64>,
}

impl IntensityGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, c_plane: f64, gamma: f64, value: f64) {
        self.values.insert((Angle::new(c_plane), Angle::new(gamma)), value);
    }

    pub fn get(&self, c_plane: f64, gamma: f64) -> Option<f64> {
        self.values
            .get(&(Angle::new(c_plane), Angle::new(gamma)))
            .copied()
    }

    pub fn contains(&self, c_plane: f64, gamma: f64) -> bool {
        self.get(c_plane, gamma).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(c_plane, gamma, value)` ordered by C-plane, then gamma.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.values
            .iter()
            .map(|((c, g), v)| (c.degrees(), g.degrees(), *v))
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values.values().copied().reduce(f64::max)
    }
}

impl Serialize for IntensityGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for (c, g, v) in self.iter() {
            seq.serialize_element(&[c, g, v])?;
        }
        seq.end()
    }
}

/// The angular grid and the intensities measured on it.
///
/// Absolute photometry stores candela, relative photometry stores cd/klm.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Photometry {
    pub gamma_angles: Vec<f64>,
    pub c_planes: Vec<f64>,
    pub intensities: IntensityGrid,
}

impl Photometry {
    pub fn intensity(&self, c_plane: f64, gamma: f64) -> Option<f64> {
        self.intensities.get(c_plane, gamma)
    }

    pub fn max_intensity(&self) -> Option<f64> {
        self.intensities.max_value()
    }

    /// Closest C-plane of the grid, measured around the circle.
    pub fn nearest_c_plane(&self, c_plane: f64) -> Option<f64> {
        let target = c_plane.rem_euclid(360.0);
        self.c_planes.iter().copied().min_by(|a, b| {
            circular_distance(*a, target).total_cmp(&circular_distance(*b, target))
        })
    }

    /// Closest gamma angle of the grid. Ties go to the first angle in grid order.
    pub fn nearest_gamma(&self, gamma: f64) -> Option<f64> {
        let mut best: Option<f64> = None;
        for &g in &self.gamma_angles {
            match best {
                Some(b) if (b - gamma).abs() <= (g - gamma).abs() => {}
                _ => best = Some(g),
            }
        }
        best
    }

    /// `(gamma, intensity)` samples of the grid C-plane nearest to `c_plane`,
    /// in gamma-array order. Missing grid points are skipped.
    pub fn curve(&self, c_plane: f64) -> Vec<(f64, f64)> {
        let Some(c) = self.nearest_c_plane(c_plane) else {
            return Vec::new();
        };
        self.gamma_angles
            .iter()
            .filter_map(|&g| self.intensity(c, g).map(|v| (g, v)))
            .collect()
    }
}

fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a.rem_euclid(360.0) - b).abs();
    d.min(360.0 - d)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LuminaireShape {
    Rectangular,
    Round,
}

/// Outer housing dimensions in meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuminaireGeometry {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub shape: LuminaireShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LuminousOpeningShape {
    Point,
    Rectangular,
    Round,
    Sphere,
    HorizontalCylinderAlongWidth,
    HorizontalCylinderAlongLength,
    EllipseAlongWidth,
    EllipseAlongLength,
    EllipsoidAlongWidth,
    EllipsoidAlongLength,
}

impl LuminousOpeningShape {
    pub fn description(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Rectangular => "Rectangular",
            Self::Round => "Round",
            Self::Sphere => "Sphere",
            Self::HorizontalCylinderAlongWidth => "Horizontal cylinder along width",
            Self::HorizontalCylinderAlongLength => "Horizontal cylinder along length",
            Self::EllipseAlongWidth => "Ellipse along width",
            Self::EllipseAlongLength => "Ellipse along length",
            Self::EllipsoidAlongWidth => "Ellipsoid along width",
            Self::EllipsoidAlongLength => "Ellipsoid along length",
        }
    }
}

/// Luminous opening dimensions in meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuminousOpeningGeometry {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub height_c0: Option<f64>,
    pub height_c90: Option<f64>,
    pub height_c180: Option<f64>,
    pub height_c270: Option<f64>,
    pub shape: LuminousOpeningShape,
}

impl LuminousOpeningGeometry {
    pub fn new(length: f64, width: f64, height: f64, shape: LuminousOpeningShape) -> Self {
        Self {
            length,
            width,
            height,
            height_c0: None,
            height_c90: None,
            height_c180: None,
            height_c270: None,
            shape,
        }
    }
}

/// One lamp set of a luminaire.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Lamps {
    pub number_of_lamps: u32,
    pub description: Option<String>,
    pub catalog_number: Option<String>,
    pub position: Option<String>,
    pub lumens_per_lamp: Option<f64>,
    pub wattage: Option<f64>,
    pub color: Option<String>,
    pub cri: Option<String>,
    pub ballast_description: Option<String>,
    pub ballast_catalog_number: Option<String>,
}

impl Lamps {
    pub fn total_lumens(&self) -> Option<f64> {
        self.lumens_per_lamp
            .map(|lumens| lumens * f64::from(self.number_of_lamps))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LuminaireType {
    PointSourceWithVerticalSymmetry,
    Linear,
    PointSourceWithOtherSymmetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Ies,
    Ldt,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectRatio {
    pub room_index: f64,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PhotometryMetadata {
    pub format: FileFormat,
    pub luminaire: Option<String>,
    pub luminaire_catalog_number: Option<String>,
    pub manufacturer: Option<String>,
    pub measurement_report: Option<String>,
    pub file_name: Option<String>,
    pub date_and_user: Option<String>,
    pub luminaire_type: Option<LuminaireType>,
    pub tilt: Option<String>,
    pub direct_ratios: Vec<DirectRatio>,
    pub file_units: LengthUnits,
    /// Complete text of the imported file.
    #[serde(skip_serializing)]
    pub file_source: String,
    pub additional_properties: BTreeMap<String, String>,
}

/// A photometric value together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Calculable {
    pub value: f64,
    pub is_calculated: bool,
}

impl Calculable {
    /// Value supplied by the file.
    pub fn from_source(value: f64) -> Self {
        Self {
            value,
            is_calculated: false,
        }
    }

    pub fn calculated(value: f64) -> Self {
        Self {
            value,
            is_calculated: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LuminairePhotometricProperties {
    pub is_absolute: bool,
    pub luminous_flux: Option<Calculable>,
    pub light_output_ratio: Option<Calculable>,
    pub downward_flux_fraction: Option<Calculable>,
    pub efficacy: Option<Calculable>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Luminaire {
    pub photometry: Photometry,
    pub geometry: Option<LuminaireGeometry>,
    pub luminous_opening: Option<LuminousOpeningGeometry>,
    pub lamps: Vec<Lamps>,
    pub metadata: PhotometryMetadata,
    pub photometric_properties: LuminairePhotometricProperties,
}

impl Luminaire {
    pub fn is_absolute(&self) -> bool {
        self.photometric_properties.is_absolute
    }

    /// Nominal lamp flux summed over all lamp sets, if any set declares it.
    pub fn total_lamp_flux(&self) -> Option<f64> {
        self.lamps
            .iter()
            .filter_map(Lamps::total_lumens)
            .reduce(|a, b| a + b)
    }

    pub fn total_wattage(&self) -> Option<f64> {
        self.lamps
            .iter()
            .filter_map(|lamp| lamp.wattage)
            .reduce(|a, b| a + b)
    }

    /// Intensity in candela, converting relative data with the lamp flux.
    pub fn candela(&self, c_plane: f64, gamma: f64) -> Option<f64> {
        let value = self.photometry.intensity(c_plane, gamma)?;
        if self.is_absolute() {
            Some(value)
        } else {
            self.total_lamp_flux().map(|flux| value * flux / 1000.0)
        }
    }

    /// Copy of this luminaire with missing photometric values calculated.
    pub fn with_calculated_photometry(mut self) -> Self {
        self.photometric_properties = crate::photometry::calculate_photometry(&self);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_keys_normalize() {
        assert_eq!(Angle::new(-0.0), Angle::new(0.0));
        assert_eq!(Angle::new(360.0 - 22.5), Angle::new(337.5));
        assert_eq!(Angle::new(180.0 - 17.499_999_999_9), Angle::new(162.5));
        assert!(Angle::new(10.0) < Angle::new(10.5));
    }

    #[test]
    fn test_grid_lookup() {
        let mut grid = IntensityGrid::new();
        grid.insert(0.0, 5.0, 100.0);
        grid.insert(0.0, 5.0, 110.0);
        grid.insert(90.0, 0.0, 50.0);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.get(0.0, 5.0), Some(110.0));
        assert_eq!(grid.get(180.0, 5.0), None);
        assert_eq!(grid.max_value(), Some(110.0));
    }

    #[test]
    fn test_nearest_c_plane_wraps() {
        let photometry = Photometry {
            gamma_angles: vec![0.0, 10.0],
            c_planes: vec![0.0, 90.0, 180.0, 270.0],
            intensities: IntensityGrid::new(),
        };
        assert_eq!(photometry.nearest_c_plane(350.0), Some(0.0));
        assert_eq!(photometry.nearest_c_plane(200.0), Some(180.0));
        assert_eq!(photometry.nearest_gamma(4.0), Some(0.0));
        assert_eq!(photometry.nearest_gamma(5.0), Some(0.0));
        assert_eq!(photometry.nearest_gamma(7.0), Some(10.0));
    }

    #[test]
    fn test_lamp_totals() {
        let luminaire = Luminaire {
            lamps: vec![
                Lamps {
                    number_of_lamps: 2,
                    lumens_per_lamp: Some(1000.0),
                    wattage: Some(30.0),
                    ..Default::default()
                },
                Lamps {
                    number_of_lamps: 1,
                    lumens_per_lamp: None,
                    wattage: Some(10.0),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(luminaire.total_lamp_flux(), Some(2000.0));
        assert_eq!(luminaire.total_wattage(), Some(40.0));
    }
}
