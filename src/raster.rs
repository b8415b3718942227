use crate::color::{Rgb, Rgba};
use crate::surface::{Align, Point, Surface, TEXT_CHAR_WIDTH, TEXT_LINE_HEIGHT};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Pixel {
    pub(crate) fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Text can't be rasterized at terminal resolution, so it is kept as a label
/// in pixel coordinates and composited as characters on presentation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Label {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) text: String,
    pub(crate) align: Align,
    pub(crate) color: Rgb,
}

/// Software rasterizer behind the drawing surface.
///
/// Draw calls arrive in logical canvas units and are multiplied by `scale`,
/// so the same scene fits whatever pixel grid the terminal offers.
pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) scale: f32,
    pub(crate) px: Vec<Pixel>,
    pub(crate) labels: Vec<Label>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32, scale: f32) -> Self {
        Self {
            w,
            h,
            scale,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
            labels: Vec::new(),
        }
    }

    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn get(&self, x: u32, y: u32) -> Pixel {
        if x < self.w && y < self.h {
            self.px[self.idx(x, y)]
        } else {
            Pixel::default()
        }
    }

    pub(crate) fn clear(&mut self, p: Pixel) {
        self.px.fill(p);
        self.labels.clear();
    }

    /// Reallocate only when the target grid changes.
    pub(crate) fn ensure_size(&mut self, w: u32, h: u32, scale: f32) {
        if self.w != w || self.h != h {
            *self = Self::new(w, h, scale);
        }
        self.scale = scale;
    }

    fn blend_over(&mut self, x: i32, y: i32, src: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        let dst = self.px[i];

        let sa = src.a;
        let da = dst.a as f32 / 255.0;

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 1e-6 {
            self.px[i] = Pixel::default();
            return;
        }

        let blend = |sc: u8, dc: u8| -> u8 {
            let sc = sc as f32 / 255.0;
            let dc = dc as f32 / 255.0;
            let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        };

        self.px[i] = Pixel {
            r: blend(src.rgb.r, dst.r),
            g: blend(src.rgb.g, dst.g),
            b: blend(src.rgb.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        };
    }

    fn to_px(&self, p: Point) -> (f32, f32) {
        (p.x * self.scale, p.y * self.scale)
    }

    /// Pixel rows/cols whose centers may fall inside `[lo, hi]`, clipped to the grid.
    fn span(&self, lo: f32, hi: f32, limit: u32) -> std::ops::Range<i32> {
        let a = (lo - 0.5).ceil().max(0.0) as i32;
        let b = ((hi - 0.5).floor() + 1.0).min(limit as f32) as i32;
        a..b.max(a)
    }

    /// Fill every pixel whose center lies within `width / 2` of the segment.
    fn capsule(&mut self, a: (f32, f32), b: (f32, f32), half: f32, color: Rgba) {
        let half = half.max(0.5);
        let (ys, xs) = (
            self.span(a.1.min(b.1) - half, a.1.max(b.1) + half, self.h),
            self.span(a.0.min(b.0) - half, a.0.max(b.0) + half, self.w),
        );
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len2 = dx * dx + dy * dy;
        for y in ys {
            for x in xs.clone() {
                let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
                let t = if len2 <= f32::EPSILON {
                    0.0
                } else {
                    (((cx - a.0) * dx + (cy - a.1) * dy) / len2).clamp(0.0, 1.0)
                };
                let (qx, qy) = (a.0 + dx * t - cx, a.1 + dy * t - cy);
                if qx * qx + qy * qy <= half * half {
                    self.blend_over(x, y, color);
                }
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (x0, y0) = self.to_px(Point::new(x, y));
        let (x1, y1) = self.to_px(Point::new(x + w, y + h));
        for py in self.span(y0.min(y1), y0.max(y1), self.h) {
            for px in self.span(x0.min(x1), x0.max(x1), self.w) {
                self.blend_over(px, py, color);
            }
        }
    }

    fn fill_ellipse(&mut self, center: Point, rx: f32, ry: f32, rotation: f32, color: Rgba) {
        let (rx, ry) = (rx * self.scale, ry * self.scale);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (cx, cy) = self.to_px(center);
        let reach = rx.max(ry);
        let (sin, cos) = rotation.sin_cos();
        for y in self.span(cy - reach, cy + reach, self.h) {
            for x in self.span(cx - reach, cx + reach, self.w) {
                let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
                // back into the ellipse's own frame
                let lx = dx * cos + dy * sin;
                let ly = -dx * sin + dy * cos;
                if (lx / rx).powi(2) + (ly / ry).powi(2) <= 1.0 {
                    self.blend_over(x, y, color);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        let half = width * self.scale / 2.0;
        self.capsule(self.to_px(from), self.to_px(to), half, color);
    }

    fn stroke_arc(&mut self, center: Point, radius: f32, start: f32, end: f32, width: f32, color: Rgba) {
        let sweep = end - start;
        let steps = ((radius * self.scale * sweep.abs()) / 2.0).ceil().clamp(4.0, 64.0) as usize;
        let half = width * self.scale / 2.0;
        let at = |i: usize| {
            let a = start + sweep * i as f32 / steps as f32;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        };
        for i in 0..steps {
            let (p0, p1) = (self.to_px(at(i)), self.to_px(at(i + 1)));
            self.capsule(p0, p1, half, color);
        }
    }

    fn fill_path(&mut self, points: &[Point], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let pts: Vec<(f32, f32)> = points.iter().map(|p| self.to_px(*p)).collect();
        let (min_y, max_y) = pts
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.1), hi.max(p.1)));

        let mut xs: Vec<f32> = Vec::new();
        for y in self.span(min_y, max_y, self.h) {
            let sy = y as f32 + 0.5;
            xs.clear();
            for (i, a) in pts.iter().enumerate() {
                let b = pts[(i + 1) % pts.len()];
                if (a.1 <= sy && b.1 > sy) || (b.1 <= sy && a.1 > sy) {
                    xs.push(a.0 + (sy - a.1) / (b.1 - a.1) * (b.0 - a.0));
                }
            }
            xs.sort_by(|a, b| a.total_cmp(b));
            // even-odd pairs
            for pair in xs.chunks_exact(2) {
                for x in self.span(pair[0], pair[1], self.w) {
                    self.blend_over(x, y, color);
                }
            }
        }
    }

    fn draw_text(&mut self, at: Point, text: &str, align: Align, color: Rgb) {
        let (x, y) = self.to_px(at);
        self.labels.push(Label {
            x,
            y,
            text: text.to_string(),
            align,
            color,
        });
    }

    // A label cell is one pixel wide and two pixels tall. Lines step a bit
    // more than one cell so flooring never lands two of them on a row.
    fn line_height(&self) -> f32 {
        if self.scale > 0.0 {
            (2.05 / self.scale).max(TEXT_LINE_HEIGHT)
        } else {
            TEXT_LINE_HEIGHT
        }
    }

    fn char_width(&self) -> f32 {
        if self.scale > 0.0 {
            (1.0 / self.scale).max(TEXT_CHAR_WIDTH)
        } else {
            TEXT_CHAR_WIDTH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn later_draws_occlude_earlier_ones() {
        let mut c = PixelCanvas::new(20, 20, 1.0);
        c.fill_rect(0.0, 0.0, 20.0, 20.0, RED.into());
        c.fill_ellipse(Point::new(10.0, 10.0), 4.0, 4.0, 0.0, BLUE.into());
        assert_eq!(c.get(10, 10).rgb(), BLUE);
        assert_eq!(c.get(1, 1).rgb(), RED);
    }

    #[test]
    fn translucent_fill_blends() {
        let mut c = PixelCanvas::new(4, 4, 1.0);
        c.fill_rect(0.0, 0.0, 4.0, 4.0, Rgb::gray(0).into());
        c.fill_rect(0.0, 0.0, 4.0, 4.0, Rgb::gray(255).alpha(0.5));
        let p = c.get(2, 2);
        assert!((127..=129).contains(&p.r), "got {}", p.r);
        assert_eq!(p.a, 255);
    }

    #[test]
    fn rotated_ellipse_follows_its_axis() {
        let mut c = PixelCanvas::new(40, 40, 1.0);
        c.fill_ellipse(Point::new(20.0, 20.0), 15.0, 2.0, std::f32::consts::FRAC_PI_2, RED.into());
        assert_eq!(c.get(20, 32).a, 255, "long axis is vertical");
        assert_eq!(c.get(32, 20).a, 0);
    }

    #[test]
    fn scale_maps_logical_units() {
        let mut c = PixelCanvas::new(40, 50, 0.1);
        c.fill_rect(200.0, 250.0, 200.0, 250.0, RED.into());
        assert_eq!(c.get(30, 40).rgb(), RED);
        assert_eq!(c.get(10, 10).a, 0);
    }

    #[test]
    fn line_has_round_caps() {
        let mut c = PixelCanvas::new(30, 30, 1.0);
        c.stroke_line(Point::new(10.0, 15.0), Point::new(20.0, 15.0), 6.0, RED.into());
        assert_eq!(c.get(15, 15).a, 255);
        assert_eq!(c.get(8, 15).a, 255, "cap extends past the endpoint");
        assert_eq!(c.get(15, 20).a, 0);
    }

    #[test]
    fn path_fill_covers_interior_only() {
        let mut c = PixelCanvas::new(20, 20, 1.0);
        let tri = [Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(0.0, 20.0)];
        c.fill_path(&tri, RED.into());
        assert_eq!(c.get(2, 2).a, 255);
        assert_eq!(c.get(18, 18).a, 0);
    }

    #[test]
    fn offscreen_draws_are_clipped() {
        let mut c = PixelCanvas::new(10, 10, 1.0);
        c.fill_ellipse(Point::new(-50.0, -50.0), 10.0, 10.0, 0.0, RED.into());
        c.stroke_line(Point::new(-5.0, 5.0), Point::new(100.0, 5.0), 2.0, RED.into());
        c.fill_rect(-10.0, -10.0, 5.0, 5.0, RED.into());
        assert_eq!(c.get(0, 0).a, 0);
        assert_eq!(c.get(9, 5).a, 255);
    }

    #[test]
    fn text_metrics_grow_when_cells_are_coarse() {
        let full = PixelCanvas::new(400, 500, 1.0);
        assert_eq!(full.line_height(), TEXT_LINE_HEIGHT);
        assert_eq!(full.char_width(), TEXT_CHAR_WIDTH);

        let tiny = PixelCanvas::new(36, 46, 0.092);
        assert!(tiny.line_height() * tiny.scale > 2.0, "a line spans more than one cell row");
        assert!(tiny.char_width() * tiny.scale >= 1.0);
    }

    #[test]
    fn text_becomes_labels_in_pixel_space() {
        let mut c = PixelCanvas::new(200, 250, 0.5);
        c.draw_text(Point::new(200.0, 100.0), "hi", Align::Center, RED);
        assert_eq!(c.labels.len(), 1);
        assert_eq!((c.labels[0].x, c.labels[0].y), (100.0, 50.0));
        c.clear(Pixel::default());
        assert!(c.labels.is_empty());
    }
}
