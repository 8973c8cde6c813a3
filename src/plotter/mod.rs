//! Polar light distribution diagrams.
//!
//! The plotter draws the C0-C180 and C90-C270 intensity curves of a
//! [`Luminaire`] onto any [`Canvas`]. Gamma 0° points down the screen; the
//! C0 and C90 halves are drawn to the right, C180 and C270 to the left.

pub mod canvas;
pub mod settings;
pub mod svg;

pub use canvas::{Canvas, Fill, Point, Stroke};
pub use settings::{DiagramStyle, PlotterSettings, Theme, ValueSnap};
pub use svg::SvgCanvas;

use crate::photometry::{Luminaire, Photometry};

/// Scale ladder for [`ValueSnap::RoundNumber`], per decade.
const ROUND_NUMBER_BASES: [f64; 5] = [3.0, 4.8, 6.0, 9.0, 10.0];

/// Share of the canvas a hemisphere must reach to count as lit.
const HALF_SPACE_THRESHOLD: f64 = 0.1;

/// Where the diagram origin sits vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterPlacement {
    Middle,
    /// Near the top edge, for mostly downward light.
    Top,
    /// Near the bottom edge, for mostly upward light.
    Bottom,
}

/// Geometry of one diagram on a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramLayout {
    pub placement: CenterPlacement,
    pub center: Point,
    /// Radius of the outermost gridline in pixels.
    pub radius: f64,
    /// Intensity at the outermost gridline.
    pub max_value: f64,
}

impl DiagramLayout {
    /// Screen position of an intensity at `angle` degrees from nadir.
    pub fn screen_point(&self, angle: f64, intensity: f64) -> Point {
        let r = if self.max_value > 0.0 {
            intensity / self.max_value * self.radius
        } else {
            0.0
        };
        cartesian_to_screen(self.center, polar_to_cartesian(angle - 90.0, r))
    }
}

/// Map a cartesian point (y up) relative to `center` onto screen coordinates.
pub fn cartesian_to_screen(center: Point, point: Point) -> Point {
    (center.0 + point.0, center.1 - point.1)
}

fn polar_to_cartesian(degrees: f64, radius: f64) -> Point {
    let radians = degrees.to_radians();
    (radius * radians.cos(), radius * radians.sin())
}

/// Smallest ladder value not below `max`.
pub fn round_number_above(max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    let exponent = max.log10().floor() as i32;
    let mut best = f64::INFINITY;
    for e in exponent - 1..=exponent + 1 {
        let decade = 10f64.powi(e);
        for base in ROUND_NUMBER_BASES {
            let candidate = base * decade;
            if candidate >= max && candidate < best {
                best = candidate;
            }
        }
    }
    best
}

/// The four cardinal curves, keyed by requested plane.
fn cardinal_curves(photometry: &Photometry) -> [(f64, Vec<(f64, f64)>); 4] {
    [0.0, 90.0, 180.0, 270.0].map(|c| (c, photometry.curve(c)))
}

fn band_max(curves: &[(f64, Vec<(f64, f64)>)], band: impl Fn(f64) -> bool) -> f64 {
    curves
        .iter()
        .flat_map(|(_, curve)| curve.iter())
        .filter(|(gamma, _)| band(*gamma))
        .map(|(_, value)| *value)
        .fold(0.0, f64::max)
}

pub struct LightDistributionPlotter {
    settings: PlotterSettings,
}

impl LightDistributionPlotter {
    pub fn new(settings: PlotterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PlotterSettings {
        &self.settings
    }

    /// Decide where the origin goes from the light in each band.
    pub fn center_placement(&self, photometry: &Photometry) -> CenterPlacement {
        if self.settings.show_both_half_spaces {
            return CenterPlacement::Middle;
        }
        let curves = cardinal_curves(photometry);
        let lower = band_max(&curves, |g| g < 45.0);
        let upper = band_max(&curves, |g| g >= 135.0);
        let middle = band_max(&curves, |g| (45.0..135.0).contains(&g));

        if middle > lower && middle > upper {
            CenterPlacement::Middle
        } else if upper < lower * HALF_SPACE_THRESHOLD {
            CenterPlacement::Top
        } else if lower < upper * HALF_SPACE_THRESHOLD {
            CenterPlacement::Bottom
        } else {
            CenterPlacement::Middle
        }
    }

    pub fn layout(&self, luminaire: &Luminaire, size: (f64, f64)) -> DiagramLayout {
        let (width, height) = size;
        let placement = self.center_placement(&luminaire.photometry);
        let center_y = match placement {
            CenterPlacement::Middle => height * 0.5,
            CenterPlacement::Top => height * HALF_SPACE_THRESHOLD,
            CenterPlacement::Bottom => height * (1.0 - HALF_SPACE_THRESHOLD),
        };
        let ratio = match placement {
            CenterPlacement::Middle => 0.4,
            _ => 0.72,
        };

        let curves = cardinal_curves(&luminaire.photometry);
        let max_candela = band_max(&curves, |_| true);
        let max_value = match self.settings.snap {
            ValueSnap::MaxValue => max_candela,
            ValueSnap::RoundNumber => round_number_above(max_candela),
            ValueSnap::Fixed(value) => value,
        };

        let layout = DiagramLayout {
            placement,
            center: (width * 0.5, center_y),
            radius: width.min(height) * ratio,
            max_value,
        };
        log::debug!("Diagram layout: {:?} (max intensity {})", layout, max_candela);
        layout
    }

    /// Render the polar diagram of `luminaire` onto `canvas`.
    pub fn draw(&self, canvas: &mut dyn Canvas, luminaire: &Luminaire) {
        let size = canvas.size();
        let layout = self.layout(luminaire, size);
        let theme = &self.settings.theme;
        let style = self.settings.style;

        if self.settings.draw_background {
            canvas.fill_background(&theme.background);
        }

        // Gridline circles with their values
        let grid_stroke = Stroke::solid(&theme.grid, 1.0);
        let circles = style.gridline_count();
        let font_size = (size.0.min(size.1) / 50.0).max(8.0);
        for k in 1..=circles {
            let fraction = k as f64 / circles as f64;
            let radius = layout.radius * fraction;
            canvas.draw_circle(layout.center, radius, &grid_stroke);
            if layout.max_value > 0.0 {
                let label = format_intensity(layout.max_value * fraction);
                let position = cartesian_to_screen(layout.center, (3.0, -radius - 3.0));
                canvas.draw_text((position.0, position.1 + font_size), &label, &theme.text, font_size);
            }
        }

        // Spokes
        let spokes = style.spoke_count();
        for k in 0..spokes {
            let angle = 360.0 * k as f64 / spokes as f64;
            let end = cartesian_to_screen(layout.center, polar_to_cartesian(angle, layout.radius));
            canvas.draw_line(layout.center, end, &grid_stroke);
        }

        if layout.max_value > 0.0 {
            let photometry = &luminaire.photometry;
            self.draw_family(canvas, &layout, photometry, (0.0, 180.0), &theme.c0_c180, false);
            self.draw_family(canvas, &layout, photometry, (90.0, 270.0), &theme.c90_c270, true);
        } else {
            log::warn!("No positive intensity to plot, skipping curves");
        }

        if self.settings.draw_legend {
            let unit = if luminaire.is_absolute() { "cd" } else { "cd/klm" };
            let x = font_size;
            let mut y = font_size * 1.5;
            for (text, color) in [
                ("C0-C180", theme.c0_c180.as_str()),
                ("C90-C270", theme.c90_c270.as_str()),
                (unit, theme.text.as_str()),
            ] {
                canvas.draw_text((x, y), text, color, font_size);
                y += font_size * 1.4;
            }
        }
    }

    /// Draw one plane pair: the first plane to the right, its opposite to the left.
    fn draw_family(
        &self,
        canvas: &mut dyn Canvas,
        layout: &DiagramLayout,
        photometry: &Photometry,
        planes: (f64, f64),
        color: &str,
        dashed: bool,
    ) {
        let stroke = if dashed {
            Stroke::dashed(color, 2.0)
        } else {
            Stroke::solid(color, 2.0)
        };
        let fill = Fill {
            color: color.to_string(),
            opacity: self.settings.theme.fill_opacity,
        };
        let fill = self.settings.fill_curves.then_some(&fill);

        for (plane, sign) in [(planes.0, 1.0), (planes.1, -1.0)] {
            let points: Vec<Point> = photometry
                .curve(plane)
                .into_iter()
                .map(|(gamma, value)| layout.screen_point(sign * gamma, value))
                .collect();
            if points.len() > 1 {
                canvas.draw_polyline(&points, &stroke, fill);
            }
        }
    }
}

impl Default for LightDistributionPlotter {
    fn default() -> Self {
        Self::new(PlotterSettings::default())
    }
}

fn format_intensity(value: f64) -> String {
    if value >= 100.0 {
        format!("{:.0}", value)
    } else {
        crate::parse::format_number(crate::parse::round_to(value, 1))
    }
}
