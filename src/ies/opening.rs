//! Luminous opening classification from the signed IES width/length/height triple.
//!
//! LM-63-1995 and LM-63-2002 files are read with different rule tables. The
//! tables disagree on mixed width/length signs, so one triple can map to
//! different shapes depending on the header.

use crate::error::PhotometryError;
use crate::photometry::LuminousOpeningShape as Shape;
use crate::photometry::{LuminousOpeningGeometry, LuminousOpeningShape};
use crate::units::LengthUnits;
use Fill::{AsGiven, LengthForBoth, WidthForBoth};
use Sign::{Neg, NonNeg, Pos, Zero};

/// Which LM-63 revision a file declares in its header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IesStandard {
    Lm63_1995,
    #[default]
    Lm63_2002,
}

impl IesStandard {
    pub fn from_header(header: &str) -> Self {
        if header.to_uppercase().contains("LM-63-2002") {
            IesStandard::Lm63_2002
        } else {
            IesStandard::Lm63_1995
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            IesStandard::Lm63_1995 => "IESNA:LM-63-1995",
            IesStandard::Lm63_2002 => "IESNA:LM-63-2002",
        }
    }

    /// Revision whose rule table reads `geometry` back as the same shape.
    pub fn for_opening(geometry: &LuminousOpeningGeometry) -> Self {
        match geometry.shape {
            LuminousOpeningShape::HorizontalCylinderAlongWidth
            | LuminousOpeningShape::HorizontalCylinderAlongLength => IesStandard::Lm63_1995,
            LuminousOpeningShape::EllipseAlongWidth | LuminousOpeningShape::EllipseAlongLength
                if geometry.height == 0.0 =>
            {
                IesStandard::Lm63_1995
            }
            _ => IesStandard::Lm63_2002,
        }
    }

    fn rules(self) -> &'static [OpeningRule] {
        match self {
            IesStandard::Lm63_1995 => LM63_1995_RULES,
            IesStandard::Lm63_2002 => LM63_2002_RULES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Neg,
    Zero,
    Pos,
    NonNeg,
}

impl Sign {
    fn matches(self, value: f64) -> bool {
        match self {
            Sign::Neg => value < 0.0,
            Sign::Zero => value == 0.0,
            Sign::Pos => value > 0.0,
            Sign::NonNeg => value >= 0.0,
        }
    }
}

/// How the stored dimensions are derived from the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fill {
    AsGiven,
    WidthForBoth,
    LengthForBoth,
}

#[derive(Debug, Clone, Copy)]
struct OpeningRule {
    width: Sign,
    length: Sign,
    height: Sign,
    shape: LuminousOpeningShape,
    fill: Fill,
}

const fn rule(width: Sign, length: Sign, height: Sign, shape: LuminousOpeningShape, fill: Fill) -> OpeningRule {
    OpeningRule {
        width,
        length,
        height,
        shape,
        fill,
    }
}

const LM63_1995_RULES: &[OpeningRule] = &[
    rule(Zero, Zero, Zero, Shape::Point, AsGiven),
    rule(Pos, Pos, NonNeg, Shape::Rectangular, AsGiven),
    rule(Pos, Zero, NonNeg, Shape::Rectangular, WidthForBoth),
    rule(Zero, Pos, NonNeg, Shape::Rectangular, LengthForBoth),
    rule(Neg, Neg, NonNeg, Shape::Round, AsGiven),
    rule(Neg, Neg, Neg, Shape::Sphere, AsGiven),
    rule(Pos, Neg, Neg, Shape::HorizontalCylinderAlongWidth, AsGiven),
    rule(Neg, Pos, Neg, Shape::HorizontalCylinderAlongLength, AsGiven),
    rule(Pos, Neg, NonNeg, Shape::EllipseAlongWidth, AsGiven),
    rule(Neg, Pos, NonNeg, Shape::EllipseAlongLength, AsGiven),
];

const LM63_2002_RULES: &[OpeningRule] = &[
    rule(Zero, Zero, Zero, Shape::Point, AsGiven),
    rule(Pos, Pos, NonNeg, Shape::Rectangular, AsGiven),
    rule(Pos, Zero, NonNeg, Shape::Rectangular, WidthForBoth),
    rule(Zero, Pos, NonNeg, Shape::Rectangular, LengthForBoth),
    rule(Neg, Neg, NonNeg, Shape::Round, AsGiven),
    rule(Neg, Neg, Neg, Shape::Sphere, AsGiven),
    rule(Pos, Neg, Pos, Shape::EllipseAlongWidth, AsGiven),
    rule(Neg, Pos, Pos, Shape::EllipseAlongLength, AsGiven),
    rule(Pos, Neg, Neg, Shape::EllipsoidAlongWidth, AsGiven),
    rule(Neg, Pos, Neg, Shape::EllipsoidAlongLength, AsGiven),
];

/// Classify the opening and build its geometry in meters.
///
/// Returns `Ok(None)` when any of the three dimensions is missing.
pub fn luminous_opening(
    standard: IesStandard,
    width: Option<f64>,
    length: Option<f64>,
    height: Option<f64>,
    units: LengthUnits,
) -> Result<Option<LuminousOpeningGeometry>, PhotometryError> {
    let (Some(width), Some(length), Some(height)) = (width, length, height) else {
        return Ok(None);
    };

    let width = units.to_meters(width);
    let length = units.to_meters(length);
    let height = units.to_meters(height);

    let rule = standard
        .rules()
        .iter()
        .find(|r| r.width.matches(width) && r.length.matches(length) && r.height.matches(height))
        .ok_or(PhotometryError::InvalidLuminousOpening {
            width,
            length,
            height,
        })?;

    let (width, length) = match rule.fill {
        Fill::AsGiven => (width.abs(), length.abs()),
        Fill::WidthForBoth => (width.abs(), width.abs()),
        Fill::LengthForBoth => (length.abs(), length.abs()),
    };

    Ok(Some(LuminousOpeningGeometry::new(
        length,
        width,
        height.abs(),
        rule.shape,
    )))
}

/// Signed `(width, length, height)` triple that reads back as `geometry`
/// under the table of [`IesStandard::for_opening`].
pub fn signed_dimensions(geometry: &LuminousOpeningGeometry) -> (f64, f64, f64) {
    let w = geometry.width.abs();
    let l = geometry.length.abs();
    let h = geometry.height.abs();

    match geometry.shape {
        Shape::Point => (0.0, 0.0, 0.0),
        Shape::Rectangular => (w, l, h),
        Shape::Round => (-w, -l, h),
        Shape::Sphere => (-w, -l, -h),
        Shape::HorizontalCylinderAlongWidth | Shape::EllipsoidAlongWidth => (w, -l, -h),
        Shape::HorizontalCylinderAlongLength | Shape::EllipsoidAlongLength => (-w, l, -h),
        Shape::EllipseAlongWidth => (w, -l, h),
        Shape::EllipseAlongLength => (-w, l, h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn classify(standard: IesStandard, w: f64, l: f64, h: f64) -> Result<Option<LuminousOpeningGeometry>, PhotometryError> {
        luminous_opening(standard, Some(w), Some(l), Some(h), LengthUnits::Meters)
    }

    #[test]
    fn test_point_opening() {
        let geometry = luminous_opening(
            IesStandard::Lm63_2002,
            Some(0.0),
            Some(0.0),
            Some(0.0),
            LengthUnits::from_ies_code(2).unwrap(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(geometry.shape, Shape::Point);
        assert_eq!((geometry.width, geometry.length, geometry.height), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_round_opening_in_feet() {
        let geometry = luminous_opening(
            IesStandard::Lm63_2002,
            Some(-0.1),
            Some(-0.2),
            Some(0.3),
            LengthUnits::Feet,
        )
        .unwrap()
        .unwrap();
        assert_eq!(geometry.shape, Shape::Round);
        assert_relative_eq!(geometry.width, 0.1 * 0.3048);
        assert_relative_eq!(geometry.length, 0.2 * 0.3048);
        assert_relative_eq!(geometry.height, 0.3 * 0.3048);
    }

    #[test]
    fn test_missing_dimension_gives_no_geometry() {
        let geometry =
            luminous_opening(IesStandard::Lm63_2002, None, Some(0.2), Some(0.3), LengthUnits::Meters).unwrap();
        assert!(geometry.is_none());
    }

    #[test]
    fn test_rectangular_fallback_uses_non_zero_side() {
        let geometry = classify(IesStandard::Lm63_1995, 0.0, 0.4, 0.0).unwrap().unwrap();
        assert_eq!(geometry.shape, Shape::Rectangular);
        assert_eq!((geometry.width, geometry.length), (0.4, 0.4));

        let geometry = classify(IesStandard::Lm63_2002, 0.3, 0.0, 0.1).unwrap().unwrap();
        assert_eq!((geometry.width, geometry.length, geometry.height), (0.3, 0.3, 0.1));
    }

    #[test]
    fn test_sphere() {
        let geometry = classify(IesStandard::Lm63_1995, -0.1, -0.1, -0.1).unwrap().unwrap();
        assert_eq!(geometry.shape, Shape::Sphere);
    }

    #[test]
    fn test_tables_disagree_on_mixed_signs() {
        let old = classify(IesStandard::Lm63_1995, -0.1, 0.5, -0.1).unwrap().unwrap();
        let new = classify(IesStandard::Lm63_2002, -0.1, 0.5, -0.1).unwrap().unwrap();
        assert_eq!(old.shape, Shape::HorizontalCylinderAlongLength);
        assert_eq!(new.shape, Shape::EllipsoidAlongLength);

        let old = classify(IesStandard::Lm63_1995, 0.5, -0.1, -0.1).unwrap().unwrap();
        let new = classify(IesStandard::Lm63_2002, 0.5, -0.1, -0.1).unwrap().unwrap();
        assert_eq!(old.shape, Shape::HorizontalCylinderAlongWidth);
        assert_eq!(new.shape, Shape::EllipsoidAlongWidth);
    }

    #[test]
    fn test_ellipse_with_flat_height_only_in_1995() {
        let old = classify(IesStandard::Lm63_1995, 0.5, -0.2, 0.0).unwrap().unwrap();
        assert_eq!(old.shape, Shape::EllipseAlongWidth);

        let new = classify(IesStandard::Lm63_2002, 0.5, -0.2, 0.0);
        assert!(matches!(new, Err(PhotometryError::InvalidLuminousOpening { .. })));

        let new = classify(IesStandard::Lm63_2002, -0.5, 0.2, 0.1).unwrap().unwrap();
        assert_eq!(new.shape, Shape::EllipseAlongLength);
    }

    #[test]
    fn test_unclassifiable_triple() {
        let result = classify(IesStandard::Lm63_2002, 0.5, 0.5, -0.1);
        assert!(matches!(result, Err(PhotometryError::InvalidLuminousOpening { .. })));
        let result = classify(IesStandard::Lm63_1995, -0.5, 0.0, 0.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_signed_dimensions_read_back() {
        for (w, l, h) in [(0.0, 0.0, 0.0), (0.2, 0.6, 0.0), (-0.2, -0.2, 0.05), (-0.1, -0.1, -0.1), (0.4, -0.1, 0.1), (-0.1, 0.4, -0.2)] {
            let geometry = classify(IesStandard::Lm63_2002, w, l, h).unwrap().unwrap();
            let (sw, sl, sh) = signed_dimensions(&geometry);
            let again = classify(IesStandard::for_opening(&geometry), sw, sl, sh).unwrap().unwrap();
            assert_eq!(again.shape, geometry.shape);
        }
    }

    #[test]
    fn test_cylinders_read_back_under_1995() {
        let geometry = classify(IesStandard::Lm63_1995, 0.6, -0.1, -0.1).unwrap().unwrap();
        assert_eq!(IesStandard::for_opening(&geometry), IesStandard::Lm63_1995);
        let (w, l, h) = signed_dimensions(&geometry);
        let again = classify(IesStandard::Lm63_1995, w, l, h).unwrap().unwrap();
        assert_eq!(again.shape, Shape::HorizontalCylinderAlongWidth);
    }

    #[test]
    fn test_standard_from_header() {
        assert_eq!(IesStandard::from_header("IESNA:LM-63-2002"), IesStandard::Lm63_2002);
        assert_eq!(IesStandard::from_header("IESNA:LM-63-1995"), IesStandard::Lm63_1995);
        assert_eq!(IesStandard::from_header("IESNA91"), IesStandard::Lm63_1995);
    }
}
