//! EULUMDAT symmetry indicator and expansion to a full 0-360° grid.

use crate::parse::unique_angles;
use crate::photometry::IntensityGrid;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Symmetry {
    /// No symmetry, every C-plane is stored.
    #[default]
    None,
    /// Rotationally symmetric, a single curve is stored.
    VerticalAxis,
    /// Symmetric about the C0-C180 plane, C0..C180 stored.
    PlaneC0C180,
    /// Symmetric about the C90-C270 plane, C90..C270 stored.
    PlaneC90C270,
    /// Symmetric about both planes, C0..C90 stored.
    BothPlanes,
}

impl Symmetry {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Symmetry::None),
            1 => Some(Symmetry::VerticalAxis),
            2 => Some(Symmetry::PlaneC0C180),
            3 => Some(Symmetry::PlaneC90C270),
            4 => Some(Symmetry::BothPlanes),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Symmetry::None => 0,
            Symmetry::VerticalAxis => 1,
            Symmetry::PlaneC0C180 => 2,
            Symmetry::PlaneC90C270 => 3,
            Symmetry::BothPlanes => 4,
        }
    }

    /// Number of C-planes whose intensities are stored for `n_c` planes in the file.
    pub fn stored_plane_count(self, n_c: usize) -> usize {
        match self {
            Symmetry::None => n_c,
            Symmetry::VerticalAxis => 1,
            Symmetry::PlaneC0C180 | Symmetry::PlaneC90C270 => n_c / 2 + 1,
            Symmetry::BothPlanes => n_c / 4 + 1,
        }
    }

    /// Positions in the C-angle list of the stored planes, in file order.
    ///
    /// C90..C270 starts a quarter of the way round, everything else at C0.
    pub fn stored_slots(self, n_c: usize) -> Range<usize> {
        let start = match self {
            Symmetry::PlaneC90C270 => n_c / 4,
            _ => 0,
        };
        start..start + self.stored_plane_count(n_c)
    }

    /// Planes that receive a copy of the stored plane `c`, excluding `c` itself.
    pub fn mirrors(self, c: f64) -> Vec<f64> {
        let targets = match self {
            Symmetry::None | Symmetry::VerticalAxis => Vec::new(),
            Symmetry::PlaneC0C180 if c == 0.0 => Vec::new(),
            Symmetry::PlaneC0C180 => vec![360.0 - c],
            Symmetry::PlaneC90C270 if c <= 180.0 => vec![180.0 - c],
            Symmetry::PlaneC90C270 => vec![540.0 - c],
            Symmetry::BothPlanes if c == 0.0 => vec![180.0],
            Symmetry::BothPlanes => vec![180.0 - c, 180.0 + c, 360.0 - c],
        };
        targets
            .into_iter()
            .filter(|target| (target - c).abs() > 1e-9)
            .collect()
    }

    /// Number of intensity values a file with `n_c` C-planes carries.
    pub fn value_count(self, n_c: usize, n_gamma: usize) -> usize {
        self.stored_plane_count(n_c) * n_gamma
    }

    /// Expand stored values (C-major, gamma-minor) onto every C-plane.
    ///
    /// Angles are positional: a `None` slot drops its own block or value
    /// and leaves the others where the file put them. The first value
    /// written to a (plane, gamma) pair is kept.
    ///
    /// Returns the full grid and the sorted union of the file C-planes and
    /// every plane that received values.
    pub fn expand(
        self,
        c_angles: &[Option<f64>],
        gamma_angles: &[Option<f64>],
        values: &[Option<f64>],
    ) -> (IntensityGrid, Vec<f64>) {
        let n_gamma = gamma_angles.len();
        let known: Vec<f64> = c_angles.iter().flatten().copied().collect();
        let mut grid = IntensityGrid::new();
        let mut planes = known.clone();

        for (block, slot) in self.stored_slots(c_angles.len()).enumerate() {
            let targets: Vec<f64> = match self {
                Symmetry::VerticalAxis if known.is_empty() => vec![0.0],
                Symmetry::VerticalAxis => known.clone(),
                _ => match c_angles.get(slot).copied().flatten() {
                    Some(c) => std::iter::once(c).chain(self.mirrors(c)).collect(),
                    None => {
                        log::warn!("Skipping intensities of unreadable C-angle #{}", slot + 1);
                        continue;
                    }
                },
            };

            for (j, gamma) in gamma_angles.iter().enumerate() {
                let Some(gamma) = *gamma else {
                    continue;
                };
                let Some(value) = values.get(block * n_gamma + j).copied().flatten() else {
                    continue;
                };
                for &target in &targets {
                    if !grid.contains(target, gamma) {
                        grid.insert(target, gamma, value);
                    }
                }
            }
            planes.extend(targets);
        }

        let mut planes = unique_angles(planes);
        planes.sort_by(f64::total_cmp);

        log::debug!(
            "Expanded symmetry {:?}: {} C-planes, {} grid values",
            self,
            planes.len(),
            grid.len()
        );
        (grid, planes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spaced(step: f64, end: f64) -> Vec<f64> {
        let n = (end / step).round() as usize;
        (0..=n).map(|i| i as f64 * step).collect()
    }

    fn known(angles: &[f64]) -> Vec<Option<f64>> {
        angles.iter().copied().map(Some).collect()
    }

    /// Distinct value per stored (plane, gamma) slot.
    fn stored_values(symmetry: Symmetry, c_angles: &[f64], gammas: &[f64]) -> Vec<Option<f64>> {
        let count = symmetry.value_count(c_angles.len(), gammas.len());
        (0..count).map(|i| Some(100.0 + i as f64)).collect()
    }

    #[test]
    fn test_codes() {
        for code in 0..=4 {
            assert_eq!(Symmetry::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Symmetry::from_code(5), None);
    }

    #[test]
    fn test_no_symmetry_is_c_major() {
        let c = vec![0.0, 90.0, 180.0, 270.0];
        let g = vec![0.0, 90.0];
        let values: Vec<Option<f64>> = (1..=8).map(|v| Some(v as f64)).collect();
        let (grid, planes) = Symmetry::None.expand(&known(&c), &known(&g), &values);
        assert_eq!(planes, c);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid.get(90.0, 0.0), Some(3.0));
        assert_eq!(grid.get(270.0, 90.0), Some(8.0));
    }

    #[test]
    fn test_vertical_axis_replicates_to_every_plane() {
        let c = spaced(30.0, 330.0);
        let g = vec![0.0, 45.0, 90.0];
        let values = vec![Some(300.0), Some(200.0), Some(10.0)];
        assert_eq!(Symmetry::VerticalAxis.value_count(c.len(), g.len()), 3);
        let (grid, planes) = Symmetry::VerticalAxis.expand(&known(&c), &known(&g), &values);
        assert_eq!(planes, c);
        for plane in &c {
            assert_eq!(grid.get(*plane, 45.0), Some(200.0));
        }
    }

    #[test]
    fn test_plane_c0_c180_mirror() {
        let c = spaced(15.0, 345.0);
        let g = spaced(10.0, 180.0);
        let values = stored_values(Symmetry::PlaneC0C180, &c, &g);
        assert_eq!(values.len(), 13 * 19);
        let (grid, planes) = Symmetry::PlaneC0C180.expand(&known(&c), &known(&g), &values);
        assert_eq!(planes.len(), 24);
        for &plane in c.iter().filter(|p| **p <= 180.0) {
            for &gamma in &g {
                let value = grid.get(plane, gamma);
                assert!(value.is_some());
                if plane > 0.0 {
                    assert_eq!(value, grid.get(360.0 - plane, gamma));
                }
            }
        }
        // C0 is not copied to C360
        assert!(!grid.contains(360.0, 0.0));
    }

    #[test]
    fn test_plane_c90_c270_mirror() {
        let c = spaced(30.0, 330.0);
        let g = vec![0.0, 90.0];
        let values = stored_values(Symmetry::PlaneC90C270, &c, &g);
        assert_eq!(values.len(), 7 * 2);
        let (grid, planes) = Symmetry::PlaneC90C270.expand(&known(&c), &known(&g), &values);
        assert_eq!(planes.len(), 12);
        assert_eq!(grid.get(120.0, 0.0), grid.get(60.0, 0.0));
        assert_eq!(grid.get(180.0, 90.0), grid.get(0.0, 90.0));
        assert_eq!(grid.get(210.0, 0.0), grid.get(330.0, 0.0));
        assert_eq!(grid.get(270.0, 0.0), Some(112.0));
        assert_eq!(grid.len(), 24);
    }

    #[test]
    fn test_both_planes_mirror() {
        let c = spaced(15.0, 345.0);
        let g = spaced(5.0, 180.0);
        let values = stored_values(Symmetry::BothPlanes, &c, &g);
        assert_eq!(values.len(), 7 * 37);
        let (grid, planes) = Symmetry::BothPlanes.expand(&known(&c), &known(&g), &values);
        assert_eq!(planes.len(), 24);
        assert_eq!(grid.len(), 24 * 37);
        for &plane in c.iter().filter(|p| **p <= 90.0) {
            for &gamma in &g {
                let value = grid.get(plane, gamma);
                assert!(value.is_some());
                assert_eq!(value, grid.get(180.0 - plane, gamma));
                if plane > 0.0 {
                    assert_eq!(value, grid.get(180.0 + plane, gamma));
                    assert_eq!(value, grid.get(360.0 - plane, gamma));
                }
            }
        }
        assert!(!grid.contains(360.0, 0.0));
    }

    #[test]
    fn test_stored_plane_counts() {
        assert_eq!(Symmetry::None.stored_plane_count(24), 24);
        assert_eq!(Symmetry::VerticalAxis.stored_plane_count(24), 1);
        assert_eq!(Symmetry::PlaneC0C180.stored_plane_count(24), 13);
        assert_eq!(Symmetry::PlaneC90C270.stored_plane_count(24), 13);
        assert_eq!(Symmetry::BothPlanes.stored_plane_count(24), 7);
        assert_eq!(Symmetry::PlaneC90C270.stored_slots(24), 6..19);
        assert_eq!(Symmetry::BothPlanes.value_count(4, 3), 6);
    }

    #[test]
    fn test_unreadable_c_angle_keeps_other_blocks_in_place() {
        let c = vec![Some(0.0), None, Some(180.0), Some(270.0)];
        let g = known(&[0.0, 90.0]);
        let values: Vec<Option<f64>> = [10.0, 11.0, 20.0, 21.0, 30.0, 31.0]
            .into_iter()
            .map(Some)
            .collect();
        let (grid, planes) = Symmetry::PlaneC0C180.expand(&c, &g, &values);
        assert_eq!(grid.get(0.0, 0.0), Some(10.0));
        assert_eq!(grid.get(0.0, 90.0), Some(11.0));
        assert_eq!(grid.get(180.0, 0.0), Some(30.0));
        assert_eq!(grid.get(180.0, 90.0), Some(31.0));
        // The block of the unreadable plane is dropped, not shifted
        assert!(!grid.contains(90.0, 0.0));
        assert!(!grid.contains(270.0, 0.0));
        assert_eq!(planes, vec![0.0, 180.0, 270.0]);
    }

    #[test]
    fn test_unreadable_gamma_drops_only_its_value() {
        let c = known(&[0.0]);
        let g = vec![Some(0.0), None, Some(90.0)];
        let values = vec![Some(5.0), Some(6.0), Some(7.0)];
        let (grid, _) = Symmetry::None.expand(&c, &g, &values);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.get(0.0, 0.0), Some(5.0));
        assert_eq!(grid.get(0.0, 90.0), Some(7.0));
    }

    #[test]
    fn test_mirrors_skip_identity() {
        assert!(Symmetry::PlaneC0C180.mirrors(0.0).is_empty());
        assert!(Symmetry::PlaneC0C180.mirrors(180.0).is_empty());
        assert!(Symmetry::PlaneC90C270.mirrors(90.0).is_empty());
        assert_eq!(Symmetry::BothPlanes.mirrors(0.0), vec![180.0]);
        assert_eq!(Symmetry::BothPlanes.mirrors(90.0), vec![270.0, 270.0]);
    }

    #[test]
    fn test_short_value_list_leaves_gaps() {
        let c = vec![0.0, 90.0, 180.0];
        let g = vec![0.0, 90.0];
        let values = vec![Some(1.0), None, Some(3.0)];
        let (grid, _) = Symmetry::PlaneC0C180.expand(&known(&c), &known(&g), &values);
        assert_eq!(grid.get(0.0, 0.0), Some(1.0));
        assert!(!grid.contains(0.0, 90.0));
        assert_eq!(grid.get(270.0, 0.0), Some(3.0));
        assert!(!grid.contains(180.0, 0.0));
    }

    #[test]
    fn test_empty_input() {
        let (grid, planes) = Symmetry::BothPlanes.expand(&[], &[], &[]);
        assert!(grid.is_empty());
        assert!(planes.is_empty());
    }
}
