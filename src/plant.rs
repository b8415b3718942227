//! The flower: stem, two leaves, bloom and face.
//!
//! Geometry is built in a local frame rooted at the stem base, with -y
//! pointing up the stem. The whole frame sways by `sin(t) * sway` degrees.

use crate::color::{hsb_mix, hsb_to_rgb, Rgb};
use crate::params::DerivedParameters;
use crate::scene::GROUND_H;
use crate::surface::{Affine, Pen, Surface, CANVAS_H, CANVAS_W};
use std::f32::consts::{PI, TAU};

/// Petals per bloom.
pub(crate) const PETAL_COUNT: usize = 8;
const LEAF_ANCHOR: f32 = 0.6;
const LEAF_SPREAD_DEG: f32 = 60.0;
const SIDE_VEINS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Expression {
    Happy,
    Neutral,
    Crying,
}

impl Expression {
    /// Bands are closed on the low side: 30 is still happy, 60 still neutral.
    pub(crate) fn from_stress(stress: u8) -> Self {
        match stress {
            0..=30 => Expression::Happy,
            31..=60 => Expression::Neutral,
            _ => Expression::Crying,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Expression::Happy => "happy",
            Expression::Neutral => "neutral",
            Expression::Crying => "crying",
        }
    }
}

/// Where the stem meets the grass.
pub(crate) fn stem_base() -> Affine {
    Affine::IDENTITY.translate(CANVAS_W / 2.0, CANVAS_H - GROUND_H)
}

pub(crate) fn draw_plant<S: Surface + ?Sized>(s: &mut S, p: &DerivedParameters, stress: u8, t: f64) {
    let sway = (t.sin() as f32) * p.sway_amplitude;
    let base = stem_base().rotate_deg(sway);
    let mut pen = Pen::new(s, base);

    let stem = hsb_mix((110.0, 60.0, 60.0), (0.0, 0.0, 30.0), p.gray_mix);
    pen.line(0.0, 0.0, 0.0, -p.plant_height, p.stem_thickness, stem);

    // Stress makes the leaves tremble on top of their droop.
    let tremble = (t * 6.0).sin() as f32 * p.jitter_amplitude;
    for side in [1.0, -1.0] {
        draw_leaf(&mut pen, base, p, side, p.droop_angle_deg + tremble);
    }

    draw_bloom(&mut pen, base, p, stress, t);
}

fn draw_leaf<S: Surface + ?Sized>(pen: &mut Pen<'_, S>, base: Affine, p: &DerivedParameters, side: f32, droop: f32) {
    let size = p.leaf_size;
    let g = p.gray_mix;
    pen.xf = base
        .translate(0.0, -LEAF_ANCHOR * p.plant_height)
        .rotate_deg(-side * LEAF_SPREAD_DEG + droop * side);

    let body = hsb_mix((110.0, 50.0, 60.0), (0.0, 0.0, 30.0), g);
    let highlight = hsb_mix((110.0, 30.0, 80.0), (0.0, 0.0, 40.0), g);
    let vein = hsb_mix((110.0, 40.0, 90.0), (0.0, 0.0, 50.0), g);

    let tip = side * 0.6 * size;
    pen.ellipse(tip, 0.0, size / 2.0, size * 0.25, body);
    pen.ellipse(tip * 0.96, 0.0, size * 0.3, size * 0.125, highlight);
    pen.line(0.0, 0.0, tip, 0.0, (size * 0.02).max(1.0), vein);

    let side_w = (size * 0.01).max(0.5);
    let reach = size * 0.12;
    for v in 1..=SIDE_VEINS {
        let x = tip * v as f32 / (SIDE_VEINS + 1) as f32;
        pen.line(x, 0.0, x, reach * side, side_w, vein);
        pen.line(x, 0.0, x, -reach * side, side_w, vein);
    }
}

fn draw_bloom<S: Surface + ?Sized>(pen: &mut Pen<'_, S>, base: Affine, p: &DerivedParameters, stress: u8, t: f64) {
    let b = p.bloom_size;
    let g = p.gray_mix;
    let head = base.translate(0.0, -p.plant_height);

    let petal = hsb_mix((50.0, 90.0, 95.0), (0.0, 0.0, 40.0), g);
    let highlight = hsb_mix((50.0, 40.0, 100.0), (0.0, 0.0, 50.0), g);
    let vein = hsb_mix((45.0, 80.0, 70.0), (0.0, 0.0, 40.0), g);

    let jitter = (t * 2.0).sin() as f32 * 0.05;
    for i in 0..PETAL_COUNT {
        pen.xf = head.rotate(TAU / PETAL_COUNT as f32 * i as f32 + jitter);
        pen.ellipse(b * 0.6, 0.0, b * 0.6, b * 0.4, petal);
        pen.ellipse(b * 0.612, 0.0, b * 0.35, b * 0.2, highlight);
        pen.line(b * 0.2, 0.0, b, 0.0, (b * 0.02).max(1.0), vein);
    }

    // Disk plus its outline stroke, folded into one slightly larger fill.
    pen.xf = head;
    let face = b * 0.7;
    let rim = (b * 0.08).max(1.0);
    let disk = hsb_mix((50.0, 70.0, 90.0), (0.0, 0.0, 35.0), g);
    pen.ellipse(0.0, 0.0, (face + rim) / 2.0, (face + rim) / 2.0, disk);

    draw_face(pen, face, stress);
}

fn draw_face<S: Surface + ?Sized>(pen: &mut Pen<'_, S>, face: f32, stress: u8) {
    let stroke = (face * 0.06).max(1.0);
    let level = ((20.0 + stress as f32 / 100.0 * 40.0) * 2.55).round() as u8;
    let ink = Rgb::gray(level);
    let eye_x = face * 0.2;
    let eye_y = -face * 0.15;

    match Expression::from_stress(stress) {
        Expression::Happy => {
            pen.arc(-eye_x, eye_y, face * 0.075, 0.0, PI, stroke, ink);
            pen.arc(eye_x, eye_y, face * 0.075, 0.0, PI, stroke, ink);
            pen.arc(0.0, face * 0.05, face * 0.15, 0.0, PI, stroke, ink);
        }
        Expression::Neutral => {
            pen.line(-face * 0.25, eye_y, -face * 0.1, eye_y, stroke, ink);
            pen.line(face * 0.1, eye_y, face * 0.25, eye_y, stroke, ink);
            pen.line(-face * 0.15, face * 0.08, face * 0.15, face * 0.08, stroke, ink);
        }
        Expression::Crying => {
            pen.arc(-eye_x, eye_y, face * 0.075, PI, TAU, stroke, ink);
            pen.arc(eye_x, eye_y, face * 0.075, PI, TAU, stroke, ink);
            pen.arc(0.0, face * 0.1, face * 0.17, PI, TAU, stroke, ink);
            let tear = hsb_to_rgb(210.0, 20.0, 90.0).alpha(0.7);
            for x in [-eye_x, eye_x] {
                pen.ellipse(x, eye_y + face * 0.16, face * 0.035, face * 0.06, tear);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MoodState;
    use crate::surface::{DrawOp, Point, Recorder};

    fn draw(mood: MoodState, t: f64) -> Recorder {
        let mut rec = Recorder::default();
        let p = DerivedParameters::derive(mood);
        draw_plant(&mut rec, &p, mood.stress, t);
        rec
    }

    #[test]
    fn expression_band_edges() {
        assert_eq!(Expression::from_stress(0), Expression::Happy);
        assert_eq!(Expression::from_stress(30), Expression::Happy);
        assert_eq!(Expression::from_stress(31), Expression::Neutral);
        assert_eq!(Expression::from_stress(60), Expression::Neutral);
        assert_eq!(Expression::from_stress(61), Expression::Crying);
        assert_eq!(Expression::from_stress(100), Expression::Crying);
    }

    #[test]
    fn expression_ignores_other_inputs() {
        for stress in [10, 45, 80] {
            let faces: Vec<_> = [(0, 0), (100, 0), (0, 100), (100, 100)]
                .iter()
                .map(|&(m, f)| {
                    let rec = draw(MoodState::new(m, f, stress), 1.0);
                    (
                        rec.count(|op| matches!(op, DrawOp::Arc { .. })),
                        rec.count(|op| matches!(op, DrawOp::Line { .. })),
                    )
                })
                .collect();
            assert!(faces.windows(2).all(|w| w[0] == w[1]), "stress {stress}: {faces:?}");
        }
    }

    #[test]
    fn face_features_per_expression() {
        let arcs = |r: &Recorder| r.count(|op| matches!(op, DrawOp::Arc { .. }));
        let happy = draw(MoodState::new(50, 50, 10), 0.0);
        assert_eq!(arcs(&happy), 3);

        let neutral = draw(MoodState::new(50, 50, 50), 0.0);
        assert_eq!(arcs(&neutral), 0);

        let crying = draw(MoodState::new(50, 50, 90), 0.0);
        assert_eq!(arcs(&crying), 3);
        match crying.ops.last() {
            Some(DrawOp::Ellipse { color, .. }) => assert!(color.a < 1.0, "tears are translucent"),
            other => panic!("tears should be drawn last, got {other:?}"),
        }
        match happy.ops.iter().find(|op| matches!(op, DrawOp::Arc { .. })) {
            Some(DrawOp::Arc { start, end, .. }) => assert!(end > start),
            _ => unreachable!(),
        }
    }

    #[test]
    fn stem_spans_plant_height_when_still() {
        // sin(0) == 0, so no sway
        let rec = draw(MoodState::new(100, 100, 0), 0.0);
        match &rec.ops[0] {
            DrawOp::Line { from, to, width, .. } => {
                assert_eq!((from.x, from.y), (200.0, 440.0));
                assert!((to.x - 200.0).abs() < 1e-3);
                assert!((to.y - 140.0).abs() < 1e-3);
                assert_eq!(*width, 24.0);
            }
            other => panic!("stem first, got {other:?}"),
        }
    }

    #[test]
    fn sway_tracks_the_clock() {
        let mood = MoodState::new(50, 0, 0);
        let tip_x = |t: f64| match &draw(mood, t).ops[0] {
            DrawOp::Line { to, .. } => to.x,
            _ => unreachable!(),
        };
        assert!(tip_x(std::f64::consts::FRAC_PI_2) > 200.0, "sways right at sin(t)=1");
        assert!(tip_x(-std::f64::consts::FRAC_PI_2) < 200.0);
        assert!((tip_x(std::f64::consts::PI) - 200.0).abs() < 1e-2);
    }

    #[test]
    fn bloom_has_fixed_petal_count() {
        for mood in [MoodState::new(0, 0, 0), MoodState::new(100, 100, 100)] {
            let rec = draw(mood, 3.3);
            let big = rec.count(|op| match op {
                DrawOp::Ellipse { rx, ry, .. } => {
                    let b = DerivedParameters::derive(mood).bloom_size;
                    (*rx - b * 0.6).abs() < 1e-3 && (*ry - b * 0.4).abs() < 1e-3
                }
                _ => false,
            });
            assert_eq!(big, PETAL_COUNT);
        }
    }

    fn leaf_ops(rec: &Recorder, side: usize) -> &[DrawOp] {
        // stem is op 0, then nine ops per leaf
        let start = 1 + side * 9;
        &rec.ops[start..start + 9]
    }

    fn body(ops: &[DrawOp]) -> (Point, f32) {
        match &ops[0] {
            DrawOp::Ellipse { center, rotation, .. } => (*center, *rotation),
            other => panic!("leaf body first, got {other:?}"),
        }
    }

    #[test]
    fn each_leaf_has_body_highlight_and_veins() {
        let rec = draw(MoodState::new(50, 50, 0), 0.0);
        for side in 0..2 {
            let ops = leaf_ops(&rec, side);
            let ellipses = ops.iter().filter(|op| matches!(op, DrawOp::Ellipse { .. })).count();
            let lines = ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count();
            assert_eq!((ellipses, lines), (2, 1 + SIDE_VEINS * 2), "side {side}");
            assert!(matches!(ops[1], DrawOp::Ellipse { .. }), "highlight over the body");
        }
        assert!(
            matches!(rec.ops[19], DrawOp::Ellipse { .. }),
            "petals start right after the leaves"
        );
    }

    #[test]
    fn leaves_root_at_sixty_percent_of_height() {
        for m in [0, 50, 100] {
            let mood = MoodState::new(m, 50, 0);
            let h = DerivedParameters::derive(mood).plant_height;
            let rec = draw(mood, 0.0);
            for side in 0..2 {
                match &leaf_ops(&rec, side)[2] {
                    DrawOp::Line { from, .. } => {
                        assert!((from.x - 200.0).abs() < 1e-3);
                        assert!((from.y - (440.0 - 0.6 * h)).abs() < 1e-3, "m={m}: {from:?}");
                    }
                    other => panic!("central vein expected, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn leaves_spread_symmetrically() {
        let rec = draw(MoodState::new(50, 50, 0), 0.0);
        let (right, r_rot) = body(leaf_ops(&rec, 0));
        let (left, l_rot) = body(leaf_ops(&rec, 1));
        assert!((r_rot + PI / 3.0).abs() < 1e-4, "{r_rot}");
        assert!((l_rot - PI / 3.0).abs() < 1e-4, "{l_rot}");
        assert!(right.x > 200.0 && left.x < 200.0);
        assert!(((right.x - 200.0) - (200.0 - left.x)).abs() < 1e-3, "mirrored about the stem");
        assert!((right.y - left.y).abs() < 1e-3);
        assert!(right.y < 326.0, "leaves reach upward when calm");
    }

    #[test]
    fn full_stress_droops_both_leaves_by_forty_five_degrees() {
        let calm = draw(MoodState::new(50, 50, 0), 0.0);
        let tense = draw(MoodState::new(50, 50, 100), 0.0);
        for side in 0..2 {
            let (c_at, c_rot) = body(leaf_ops(&calm, side));
            let (t_at, t_rot) = body(leaf_ops(&tense, side));
            let sign = if side == 0 { 1.0 } else { -1.0 };
            assert!((t_rot - c_rot - sign * PI / 4.0).abs() < 1e-4, "side {side}: {c_rot} -> {t_rot}");
            assert!(t_at.y > c_at.y, "side {side} droops downward");
        }
        let (_, r) = body(leaf_ops(&tense, 0));
        let (_, l) = body(leaf_ops(&tense, 1));
        assert!((r + PI / 12.0).abs() < 1e-4 && (l - PI / 12.0).abs() < 1e-4);
    }

    #[test]
    fn petals_jitter_with_the_clock() {
        let mood = MoodState::new(50, 50, 0);
        let p = DerivedParameters::derive(mood);
        let b = p.bloom_size;
        let first_petal = |t: f64| {
            draw(mood, t)
                .ops
                .into_iter()
                .find_map(|op| match op {
                    DrawOp::Ellipse { rx, ry, rotation, .. }
                        if (rx - b * 0.6).abs() < 1e-3 && (ry - b * 0.4).abs() < 1e-3 =>
                    {
                        Some(rotation)
                    }
                    _ => None,
                })
                .expect("petal")
        };
        assert!(first_petal(0.0).abs() < 1e-5, "no sway or jitter at t=0");

        let t = std::f64::consts::FRAC_PI_4;
        let sway = (t.sin() as f32 * p.sway_amplitude).to_radians();
        // sin(2t) peaks at t = pi/4
        assert!((first_petal(t) - sway - 0.05).abs() < 1e-4);
    }

    #[test]
    fn stem_grays_out_under_stress() {
        let color = |stress| match &draw(MoodState::new(50, 50, stress), 0.0).ops[0] {
            DrawOp::Line { color, .. } => color.rgb,
            _ => unreachable!(),
        };
        let calm = color(0);
        assert!(calm.g > calm.r && calm.g > calm.b, "green stem when calm");
        let gray = color(100);
        assert_eq!((gray.r, gray.g), (gray.g, gray.b), "neutral gray at full stress");
    }
}
