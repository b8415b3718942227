use crate::model::{HistoryEntry, MoodState};
use crate::params::DerivedParameters;
use crate::plant::{draw_plant, Expression};
use crate::scene::draw_backdrop;
use crate::surface::{Point, Surface};
use crate::timeline::draw_timeline;
use crate::weather::WeatherSystem;

pub(crate) const CLOCK_STEP: f64 = 0.02;

/// Frame-counted animation time. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct AnimationClock {
    t: f64,
}

impl AnimationClock {
    pub(crate) fn t(&self) -> f64 {
        self.t
    }

    fn advance(&mut self) {
        self.t += CLOCK_STEP;
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct FrameOptions {
    pub(crate) weather: bool,
    pub(crate) timeline: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            weather: true,
            timeline: true,
        }
    }
}

/// What a tick derived, for the status panel and for tests.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrameReport {
    pub(crate) mood: MoodState,
    pub(crate) params: DerivedParameters,
    pub(crate) expression: Expression,
    pub(crate) hovered: Option<usize>,
    pub(crate) raining: bool,
    pub(crate) blooming: bool,
}

/// Everything that persists between frames. The clock and the particles
/// are owned here and nowhere else.
pub(crate) struct SceneContext {
    clock: AnimationClock,
    weather: WeatherSystem,
    options: FrameOptions,
}

impl SceneContext {
    pub(crate) fn new(seed: u64, options: FrameOptions) -> Self {
        Self {
            clock: AnimationClock::default(),
            weather: WeatherSystem::new(seed),
            options,
        }
    }

    #[cfg(test)]
    pub(crate) fn clock(&self) -> AnimationClock {
        self.clock
    }

    #[cfg(test)]
    pub(crate) fn weather(&self) -> &WeatherSystem {
        &self.weather
    }

    /// One frame, back to front: backdrop, plant, weather, timeline.
    pub(crate) fn tick<S: Surface + ?Sized>(
        &mut self,
        mood: MoodState,
        surface: &mut S,
        history: &[HistoryEntry],
        pointer: Option<Point>,
    ) -> FrameReport {
        let mood = mood.clamped();
        self.clock.advance();
        let params = DerivedParameters::derive(mood);

        draw_backdrop(surface, &params);
        draw_plant(surface, &params, mood.stress, self.clock.t());

        if self.options.weather {
            self.weather.update(mood);
        } else {
            self.weather.clear();
        }
        self.weather.draw(surface);

        let hovered = if self.options.timeline {
            draw_timeline(surface, history, pointer.filter(Point::in_canvas))
        } else {
            None
        };

        FrameReport {
            mood,
            params,
            expression: Expression::from_stress(mood.stress),
            hovered,
            raining: !self.weather.rain().is_empty(),
            blooming: !self.weather.petals().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelCanvas;
    use crate::surface::{DrawOp, Recorder};
    use crate::timeline::PLACEHOLDER;
    use crate::weather::{MAX_PETALS, MAX_RAINDROPS};

    #[test]
    fn clock_advances_by_fixed_step() {
        let mut ctx = SceneContext::new(1, FrameOptions::default());
        let mut rec = Recorder::default();
        let mut last = ctx.clock().t();
        for _ in 0..100 {
            ctx.tick(MoodState::default(), &mut rec, &[], None);
            let t = ctx.clock().t();
            assert!((t - last - CLOCK_STEP).abs() < 1e-9);
            last = t;
        }
        assert!((last - 2.0).abs() < 1e-9);
    }

    #[test]
    fn thriving_inputs_end_to_end() {
        let mut ctx = SceneContext::new(1, FrameOptions::default());
        let mut rec = Recorder::default();
        let r = ctx.tick(MoodState::new(100, 100, 0), &mut rec, &[], None);
        assert_eq!(r.params.plant_height, 300.0);
        assert_eq!(r.params.bloom_size, 60.0);
        assert_eq!(r.params.stem_thickness, 24.0);
        assert_eq!(r.params.leaf_size, 100.0);
        assert_eq!(r.params.gray_mix, 0.0);
        assert_eq!(r.expression, Expression::Happy);
        assert!(!r.raining);
        assert!(r.blooming, "motivation 100 is above the petal threshold");
    }

    #[test]
    fn struggling_inputs_end_to_end() {
        let mut ctx = SceneContext::new(1, FrameOptions::default());
        let mut rec = Recorder::default();
        let r = ctx.tick(MoodState::new(0, 0, 100), &mut rec, &[], None);
        assert_eq!(r.params.plant_height, 80.0);
        assert_eq!(r.params.bloom_size, 20.0);
        assert_eq!(r.params.stem_thickness, 4.0);
        assert_eq!(r.params.gray_mix, 1.0);
        assert_eq!(r.expression, Expression::Crying);
        assert!(r.raining);
        assert!(!r.blooming);
    }

    #[test]
    fn particle_caps_hold_through_the_loop() {
        let mut ctx = SceneContext::new(4, FrameOptions::default());
        let mut rec = Recorder::default();
        for _ in 0..300 {
            rec.ops.clear();
            ctx.tick(MoodState::new(100, 50, 100), &mut rec, &[], None);
        }
        assert_eq!(ctx.weather().rain().len(), MAX_RAINDROPS);
        assert_eq!(ctx.weather().petals().len(), MAX_PETALS);

        ctx.tick(MoodState::new(50, 50, 50), &mut rec, &[], None);
        assert!(ctx.weather().rain().is_empty());
        assert!(ctx.weather().petals().is_empty());
    }

    #[test]
    fn weather_can_be_switched_off() {
        let opts = FrameOptions { weather: false, timeline: true };
        let mut ctx = SceneContext::new(4, opts);
        let mut rec = Recorder::default();
        let r = ctx.tick(MoodState::new(100, 50, 100), &mut rec, &[], None);
        assert!(!r.raining && !r.blooming);
    }

    #[test]
    fn timeline_draws_last() {
        let mut ctx = SceneContext::new(4, FrameOptions::default());
        let mut rec = Recorder::default();
        ctx.tick(MoodState::default(), &mut rec, &[], None);
        match rec.ops.last() {
            Some(DrawOp::Text { text, .. }) => assert_eq!(text, PLACEHOLDER),
            other => panic!("timeline should overlay everything, got {other:?}"),
        }

        let off = FrameOptions { weather: true, timeline: false };
        let mut ctx = SceneContext::new(4, off);
        let mut rec = Recorder::default();
        ctx.tick(MoodState::default(), &mut rec, &[], None);
        assert!(rec.texts().is_empty());
    }

    #[test]
    fn out_of_range_pointer_means_no_hover() {
        use chrono::Utc;
        let hist = vec![HistoryEntry::new(MoodState::default(), "", Utc::now())];
        let mut ctx = SceneContext::new(4, FrameOptions::default());
        let mut rec = Recorder::default();
        let r = ctx.tick(MoodState::default(), &mut rec, &hist, Some(Point::new(200.0, 9999.0)));
        assert_eq!(r.hovered, None);
        let r = ctx.tick(MoodState::default(), &mut rec, &hist, Some(Point::new(200.0, 480.0)));
        assert_eq!(r.hovered, Some(0));
    }

    #[test]
    fn renders_into_a_real_canvas() {
        let mut ctx = SceneContext::new(4, FrameOptions::default());
        let mut canvas = PixelCanvas::new(80, 100, 0.2);
        ctx.tick(MoodState::new(60, 100, 0), &mut canvas, &[], None);
        // stem base sits just above the grass line, mid-canvas
        let stem = canvas.get(40, 86);
        assert!(stem.g > stem.r, "green stem pixel, got {stem:?}");
        assert!(canvas.px.iter().all(|p| p.a == 255), "sky covers everything");
        assert_eq!(canvas.labels.len(), 1, "placeholder label");
    }
}
