//! Threshold-gated particles: rain while stressed, drifting petals while
//! highly motivated. Each population exists only above its cutoff and is
//! dropped the frame the input falls back.

use crate::color::hsb_to_rgb;
use crate::model::MoodState;
use crate::scene::GROUND_H;
use crate::surface::{Point, Surface, CANVAS_H, CANVAS_W};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub(crate) const RAIN_STRESS_THRESHOLD: u8 = 70;
pub(crate) const PETAL_MOTIVATION_THRESHOLD: u8 = 80;
pub(crate) const MAX_RAINDROPS: usize = 200;
pub(crate) const MAX_PETALS: usize = 50;
const RAIN_BATCH: usize = 5;
const PETAL_BATCH: usize = 1;

const RAIN_SPEED: (f32, f32) = (5.0, 10.0);
const PETAL_RISE: (f32, f32) = (0.3, 0.8);
const PETAL_SPIN: f32 = 0.05;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Raindrop {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) speed: f32,
    pub(crate) size: f32,
    pub(crate) length: f32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Petal {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) size: f32,
    pub(crate) rotation: f32,
    pub(crate) spin: f32,
}

pub(crate) struct WeatherSystem {
    rain: Vec<Raindrop>,
    petals: Vec<Petal>,
    rng: StdRng,
}

impl WeatherSystem {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rain: Vec::with_capacity(MAX_RAINDROPS),
            petals: Vec::with_capacity(MAX_PETALS),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub(crate) fn rain(&self) -> &[Raindrop] {
        &self.rain
    }

    pub(crate) fn petals(&self) -> &[Petal] {
        &self.petals
    }

    pub(crate) fn clear(&mut self) {
        self.rain.clear();
        self.petals.clear();
    }

    /// One frame: gate, spawn, advance, recycle.
    pub(crate) fn update(&mut self, mood: MoodState) {
        if mood.stress > RAIN_STRESS_THRESHOLD {
            if self.rain.is_empty() {
                tracing::debug!(stress = mood.stress, "rain starts");
            }
            let room = MAX_RAINDROPS - self.rain.len().min(MAX_RAINDROPS);
            for _ in 0..RAIN_BATCH.min(room) {
                let y = self.rng.gen_range(-CANVAS_H..0.0);
                let d = self.new_raindrop(y);
                self.rain.push(d);
            }
            self.advance_rain();
        } else if !self.rain.is_empty() {
            tracing::debug!(stress = mood.stress, "rain stops");
            self.rain.clear();
        }

        if mood.motivation > PETAL_MOTIVATION_THRESHOLD {
            if self.petals.is_empty() {
                tracing::debug!(motivation = mood.motivation, "petals start");
            }
            let room = MAX_PETALS - self.petals.len().min(MAX_PETALS);
            for _ in 0..PETAL_BATCH.min(room) {
                let petal = self.new_petal();
                self.petals.push(petal);
            }
            self.advance_petals();
        } else if !self.petals.is_empty() {
            tracing::debug!(motivation = mood.motivation, "petals stop");
            self.petals.clear();
        }
    }

    fn new_raindrop(&mut self, y: f32) -> Raindrop {
        Raindrop {
            x: self.rng.gen_range(0.0..CANVAS_W),
            y,
            speed: self.rng.gen_range(RAIN_SPEED.0..RAIN_SPEED.1),
            size: self.rng.gen_range(1.0..2.0),
            length: self.rng.gen_range(8.0..18.0),
        }
    }

    /// Petals rise out of the grass band.
    fn new_petal(&mut self) -> Petal {
        Petal {
            x: self.rng.gen_range(0.0..CANVAS_W),
            y: self.rng.gen_range(CANVAS_H - GROUND_H..CANVAS_H),
            vx: self.rng.gen_range(-0.6..0.6),
            vy: -self.rng.gen_range(PETAL_RISE.0..PETAL_RISE.1),
            size: self.rng.gen_range(6.0..12.0),
            rotation: self.rng.gen_range(0.0..std::f32::consts::TAU),
            spin: self.rng.gen_range(-PETAL_SPIN..PETAL_SPIN),
        }
    }

    fn advance_rain(&mut self) {
        for d in &mut self.rain {
            d.y += d.speed;
            if d.y > CANVAS_H {
                d.y = -d.length - self.rng.gen_range(0.0..40.0);
                d.x = self.rng.gen_range(0.0..CANVAS_W);
            }
        }
    }

    fn advance_petals(&mut self) {
        for petal in &mut self.petals {
            petal.x += petal.vx;
            petal.y += petal.vy;
            petal.rotation = (petal.rotation + petal.spin).rem_euclid(std::f32::consts::TAU);
            if petal.y < -petal.size {
                petal.y = CANVAS_H + petal.size;
                petal.x = self.rng.gen_range(0.0..CANVAS_W);
            }
            // sideways drift wraps instead of leaking off-canvas
            if petal.x < -petal.size {
                petal.x += CANVAS_W + petal.size * 2.0;
            } else if petal.x > CANVAS_W + petal.size {
                petal.x -= CANVAS_W + petal.size * 2.0;
            }
        }
    }

    pub(crate) fn draw<S: Surface + ?Sized>(&self, s: &mut S) {
        let rain = hsb_to_rgb(210.0, 30.0, 85.0).alpha(0.6);
        for d in &self.rain {
            s.stroke_line(Point::new(d.x, d.y), Point::new(d.x, d.y + d.length), d.size, rain);
        }
        let petal = hsb_to_rgb(50.0, 70.0, 98.0).alpha(0.85);
        for p in &self.petals {
            s.fill_ellipse(Point::new(p.x, p.y), p.size / 2.0, p.size / 4.0, p.rotation, petal);
        }
    }
}
