use crate::color::{hsb_to_rgb, lerp};
use crate::params::DerivedParameters;
use crate::surface::{Point, Surface, CANVAS_H, CANVAS_W};

pub(crate) const GROUND_H: f32 = 60.0;
pub(crate) const GRASS_H: f32 = 20.0;
pub(crate) const SUN_CENTER: Point = Point::new(CANVAS_W * 0.12, CANVAS_H * 0.18);

const GLOW_RINGS: usize = 10;
const RAY_COUNT: usize = 24;

/// Sky, ground and sun, back to front.
pub(crate) fn draw_backdrop<S: Surface + ?Sized>(s: &mut S, p: &DerivedParameters) {
    let sky = hsb_to_rgb(p.sky_hue, p.sky_saturation, p.sky_brightness);
    s.fill_rect(0.0, 0.0, CANVAS_W, CANVAS_H, sky.into());

    let soil = hsb_to_rgb(100.0, 40.0, 40.0);
    s.fill_rect(0.0, CANVAS_H - GROUND_H, CANVAS_W, GROUND_H, soil.into());
    let grass = hsb_to_rgb(100.0, 30.0, 60.0);
    s.fill_rect(0.0, CANVAS_H - GROUND_H, CANVAS_W, GRASS_H, grass.into());

    draw_sun(s, p);
}

fn draw_sun<S: Surface + ?Sized>(s: &mut S, p: &DerivedParameters) {
    let core = p.sun_core_size;
    let bri = p.sun_core_brightness;

    // Outermost ring first; each ring is smaller and more opaque.
    let glow = hsb_to_rgb(55.0, 40.0, bri);
    for i in (1..=GLOW_RINGS).rev() {
        let diameter = core * (1.0 + i as f32 * 0.15);
        let alpha = (i as f32 / GLOW_RINGS as f32) * 0.3;
        s.fill_ellipse(SUN_CENTER, diameter / 2.0, diameter / 2.0, 0.0, glow.alpha(alpha));
    }

    let k = p.sun_strength();
    let ray_len = lerp(10.0, 130.0, k);
    let ray_width = lerp(1.0, 6.0, k);
    let ray = hsb_to_rgb(55.0, 50.0, bri).alpha(lerp(0.2, 0.9, k));
    let inner = core * 0.55 / 2.0;
    let outer = (core * 0.55 + ray_len) / 2.0;
    for i in 0..RAY_COUNT {
        let a = std::f32::consts::TAU / RAY_COUNT as f32 * i as f32;
        let (sin, cos) = a.sin_cos();
        let from = Point::new(SUN_CENTER.x + cos * inner, SUN_CENTER.y + sin * inner);
        let to = Point::new(SUN_CENTER.x + cos * outer, SUN_CENTER.y + sin * outer);
        s.stroke_line(from, to, ray_width, ray);
    }

    let core_col = hsb_to_rgb(55.0, 40.0, bri).alpha(0.95);
    s.fill_ellipse(SUN_CENTER, core / 2.0, core / 2.0, 0.0, core_col);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MoodState;
    use crate::surface::{DrawOp, Recorder};

    fn draw(mood: MoodState) -> Recorder {
        let mut rec = Recorder::default();
        draw_backdrop(&mut rec, &DerivedParameters::derive(mood));
        rec
    }

    #[test]
    fn paints_back_to_front() {
        let rec = draw(MoodState::default());
        let kinds: Vec<&str> = rec
            .ops
            .iter()
            .map(|op| match op {
                DrawOp::Rect { .. } => "rect",
                DrawOp::Ellipse { .. } => "ellipse",
                DrawOp::Line { .. } => "line",
                _ => "other",
            })
            .collect();
        assert_eq!(&kinds[..3], ["rect", "rect", "rect"], "sky, soil, grass");
        assert!(kinds[3..13].iter().all(|k| *k == "ellipse"), "ten glow rings");
        assert!(kinds[13..37].iter().all(|k| *k == "line"), "24 rays");
        assert_eq!(kinds[37], "ellipse", "core last");
        assert_eq!(kinds.len(), 38);

        match &rec.ops[0] {
            DrawOp::Rect { x, y, w, h, .. } => assert_eq!((*x, *y, *w, *h), (0.0, 0.0, 400.0, 500.0)),
            other => panic!("sky should be a full-canvas rect, got {other:?}"),
        }
    }

    #[test]
    fn glow_rings_shrink_and_brighten() {
        let rec = draw(MoodState::new(60, 50, 20));
        let rings: Vec<(f32, f32)> = rec.ops[3..13]
            .iter()
            .map(|op| match op {
                DrawOp::Ellipse { rx, color, .. } => (*rx, color.a),
                other => panic!("expected ring, got {other:?}"),
            })
            .collect();
        for w in rings.windows(2) {
            assert!(w[1].0 < w[0].0, "radius decreases");
            assert!(w[1].1 > w[0].1, "alpha increases");
        }
        let core = DerivedParameters::derive(MoodState::new(60, 50, 20)).sun_core_size;
        assert!(rings[9].0 > core / 2.0, "innermost ring still surrounds the core");
    }

    #[test]
    fn rays_grow_with_sun() {
        let ray_len = |rec: &Recorder| match &rec.ops[13] {
            DrawOp::Line { from, to, width, .. } => (((to.x - from.x).powi(2) + (to.y - from.y).powi(2)).sqrt(), *width),
            other => panic!("expected ray, got {other:?}"),
        };
        let (short, thin) = ray_len(&draw(MoodState::new(0, 50, 0)));
        let (long, thick) = ray_len(&draw(MoodState::new(100, 50, 0)));
        assert!((short - 5.0).abs() < 1e-3, "10px ray at the smallest sun, halved like the radii");
        assert!((long - 65.0).abs() < 1e-3);
        assert!(thin < thick);
    }
}
