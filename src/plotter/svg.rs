use std::fmt::Write;

use crate::plotter::canvas::{Canvas, Fill, Point, Stroke};

/// A [`Canvas`] that records SVG elements.
pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// The complete SVG document.
    pub fn finish(self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    fn stroke_attributes(stroke: &Stroke) -> String {
        let mut attributes = format!(r#"stroke="{}" stroke-width="{:.2}""#, stroke.color, stroke.width);
        if stroke.dashed {
            attributes.push_str(r#" stroke-dasharray="6,4""#);
        }
        attributes
    }
}

impl Canvas for SvgCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_background(&mut self, color: &str) {
        let _ = writeln!(
            self.body,
            r#"  <rect x="0" y="0" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            self.width, self.height, color
        );
    }

    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) {
        let _ = writeln!(
            self.body,
            r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" {}/>"#,
            center.0,
            center.1,
            radius,
            Self::stroke_attributes(stroke)
        );
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let _ = writeln!(
            self.body,
            r#"  <path d="M{:.2},{:.2}L{:.2},{:.2}" {}/>"#,
            from.0,
            from.1,
            to.0,
            to.1,
            Self::stroke_attributes(stroke)
        );
    }

    fn draw_text(&mut self, position: Point, text: &str, color: &str, font_size: f64) {
        let _ = writeln!(
            self.body,
            r#"  <text x="{:.2}" y="{:.2}" fill="{}" font-size="{:.1}" font-family="sans-serif">{}</text>"#,
            position.0,
            position.1,
            color,
            font_size,
            escape(text)
        );
    }

    fn draw_polyline(&mut self, points: &[Point], stroke: &Stroke, fill: Option<&Fill>) {
        if points.is_empty() {
            return;
        }
        let mut path = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            let _ = write!(path, "{}{:.2},{:.2}", command, x, y);
        }
        let fill = match fill {
            Some(fill) => {
                path.push('Z');
                format!(r#"fill="{}" fill-opacity="{:.2}""#, fill.color, fill.opacity)
            }
            None => r#"fill="none""#.to_string(),
        };
        let _ = writeln!(
            self.body,
            r#"  <path d="{}" {} {}/>"#,
            path,
            fill,
            Self::stroke_attributes(stroke)
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_wraps_elements() {
        let mut canvas = SvgCanvas::new(200.0, 100.0);
        canvas.fill_background("#fff");
        canvas.draw_circle((100.0, 50.0), 20.0, &Stroke::solid("#000", 1.0));
        let svg = canvas.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r#"<circle cx="100.00" cy="50.00" r="20.00""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_polyline_path() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        let fill = Fill {
            color: "red".to_string(),
            opacity: 0.5,
        };
        canvas.draw_polyline(&[(1.0, 2.0), (3.0, 4.0)], &Stroke::dashed("red", 2.0), Some(&fill));
        let svg = canvas.finish();
        assert!(svg.contains(r#"d="M1.00,2.00L3.00,4.00Z""#));
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains(r#"fill-opacity="0.50""#));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.draw_text((0.0, 0.0), "C0 < C180 & more", "#000", 10.0);
        assert!(canvas.finish().contains("C0 &lt; C180 &amp; more"));
    }
}
