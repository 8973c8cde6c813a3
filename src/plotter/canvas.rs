/// Screen coordinates, y pointing down.
pub type Point = (f64, f64);

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub dashed: bool,
}

impl Stroke {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: String,
    pub opacity: f64,
}

/// Drawing surface the polar plotter renders onto.
pub trait Canvas {
    /// Width and height in pixels.
    fn size(&self) -> (f64, f64);

    fn fill_background(&mut self, color: &str);

    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke);

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    fn draw_text(&mut self, position: Point, text: &str, color: &str, font_size: f64);

    /// Connect `points` in order; a fill closes the shape.
    fn draw_polyline(&mut self, points: &[Point], stroke: &Stroke, fill: Option<&Fill>);
}
