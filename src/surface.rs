//! The drawing capability every renderer targets.
//!
//! Coordinates are logical canvas pixels (400×500, y down). Angles are
//! radians, clockwise on screen because y points down.

use crate::color::{Rgb, Rgba};

pub(crate) const CANVAS_W: f32 = 400.0;
pub(crate) const CANVAS_H: f32 = 500.0;
pub(crate) const TEXT_LINE_HEIGHT: f32 = 15.0;
pub(crate) const TEXT_CHAR_WIDTH: f32 = 6.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Point {
    pub(crate) const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn in_canvas(&self) -> bool {
        (0.0..=CANVAS_W).contains(&self.x) && (0.0..=CANVAS_H).contains(&self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
}

pub(crate) trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn fill_ellipse(&mut self, center: Point, rx: f32, ry: f32, rotation: f32, color: Rgba);
    /// Round-capped stroke.
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba);
    /// Sweeps from `start` to `end` (clockwise on screen).
    fn stroke_arc(&mut self, center: Point, radius: f32, start: f32, end: f32, width: f32, color: Rgba);
    /// Closed polygon.
    fn fill_path(&mut self, points: &[Point], color: Rgba);
    fn draw_text(&mut self, at: Point, text: &str, align: Align, color: Rgb);

    /// Logical distance between stacked lines of text.
    fn line_height(&self) -> f32 {
        TEXT_LINE_HEIGHT
    }

    /// Logical advance of one character.
    fn char_width(&self) -> f32 {
        TEXT_CHAR_WIDTH
    }
}

/// Rigid 2D transform (translate + rotate), composed like a canvas context:
/// each call applies in the local frame of the previous ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Affine {
    pub(crate) const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub(crate) fn translate(self, tx: f32, ty: f32) -> Self {
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..self
        }
    }

    pub(crate) fn rotate(self, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    pub(crate) fn rotate_deg(self, degrees: f32) -> Self {
        self.rotate(degrees.to_radians())
    }

    pub(crate) fn apply(&self, x: f32, y: f32) -> Point {
        Point {
            x: self.a * x + self.c * y + self.e,
            y: self.b * x + self.d * y + self.f,
        }
    }

    /// Net rotation of the local x axis.
    pub(crate) fn angle(&self) -> f32 {
        self.b.atan2(self.a)
    }
}

/// A surface seen through a transform, for renderers that work in a local
/// frame (stem base, leaf root, bloom center).
pub(crate) struct Pen<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    pub(crate) xf: Affine,
}

impl<'a, S: Surface + ?Sized> Pen<'a, S> {
    pub(crate) fn new(surface: &'a mut S, xf: Affine) -> Self {
        Self { surface, xf }
    }

    pub(crate) fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: impl Into<Rgba>) {
        let c = self.xf.apply(cx, cy);
        self.surface.fill_ellipse(c, rx, ry, self.xf.angle(), color.into());
    }

    pub(crate) fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: impl Into<Rgba>) {
        let (p0, p1) = (self.xf.apply(x0, y0), self.xf.apply(x1, y1));
        self.surface.stroke_line(p0, p1, width, color.into());
    }

    pub(crate) fn arc(&mut self, cx: f32, cy: f32, r: f32, start: f32, end: f32, width: f32, color: impl Into<Rgba>) {
        let c = self.xf.apply(cx, cy);
        let rot = self.xf.angle();
        self.surface.stroke_arc(c, r, start + rot, end + rot, width, color.into());
    }
}

/// Outline of a rounded rectangle as a polygon, clockwise from the top edge.
pub(crate) fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Vec<Point> {
    const STEPS: usize = 6;
    let r = radius.clamp(0.0, w.min(h) / 2.0);
    let corners = [
        (x + w - r, y + r, -std::f32::consts::FRAC_PI_2),
        (x + w - r, y + h - r, 0.0),
        (x + r, y + h - r, std::f32::consts::FRAC_PI_2),
        (x + r, y + r, std::f32::consts::PI),
    ];
    let mut pts = Vec::with_capacity(corners.len() * (STEPS + 1));
    for (cx, cy, a0) in corners {
        for i in 0..=STEPS {
            let a = a0 + std::f32::consts::FRAC_PI_2 * i as f32 / STEPS as f32;
            pts.push(Point::new(cx + r * a.cos(), cy + r * a.sin()));
        }
    }
    pts
}

/* -----------------------------
   Recording surface for tests
------------------------------ */

#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawOp {
    Rect { x: f32, y: f32, w: f32, h: f32, color: Rgba },
    Ellipse { center: Point, rx: f32, ry: f32, rotation: f32, color: Rgba },
    Line { from: Point, to: Point, width: f32, color: Rgba },
    Arc { center: Point, radius: f32, start: f32, end: f32, width: f32, color: Rgba },
    Path { points: Vec<Point>, color: Rgba },
    Text { at: Point, text: String, align: Align, color: Rgb },
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct Recorder {
    pub(crate) ops: Vec<DrawOp>,
}

#[cfg(test)]
impl Recorder {
    pub(crate) fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

#[cfg(test)]
impl Surface for Recorder {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }
    fn fill_ellipse(&mut self, center: Point, rx: f32, ry: f32, rotation: f32, color: Rgba) {
        self.ops.push(DrawOp::Ellipse { center, rx, ry, rotation, color });
    }
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.ops.push(DrawOp::Line { from, to, width, color });
    }
    fn stroke_arc(&mut self, center: Point, radius: f32, start: f32, end: f32, width: f32, color: Rgba) {
        self.ops.push(DrawOp::Arc { center, radius, start, end, width, color });
    }
    fn fill_path(&mut self, points: &[Point], color: Rgba) {
        self.ops.push(DrawOp::Path { points: points.to_vec(), color });
    }
    fn draw_text(&mut self, at: Point, text: &str, align: Align, color: Rgb) {
        self.ops.push(DrawOp::Text { at, text: text.to_string(), align, color });
    }
}
