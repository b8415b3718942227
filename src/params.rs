//! Mood inputs to visual parameters.
//!
//! Everything here is a straight `lerp(lo, hi, x / 100)` of one input unless
//! noted. Values are recomputed every frame and never cached, so the scene
//! can't drift out of sync with the sliders.

use crate::color::lerp;
use crate::model::MoodState;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DerivedParameters {
    pub(crate) plant_height: f32,
    pub(crate) bloom_size: f32,
    pub(crate) stem_thickness: f32,
    pub(crate) leaf_size: f32,
    pub(crate) sway_amplitude: f32,
    pub(crate) droop_angle_deg: f32,
    pub(crate) jitter_amplitude: f32,
    pub(crate) gray_mix: f32,
    pub(crate) sky_hue: f32,
    pub(crate) sky_saturation: f32,
    pub(crate) sky_brightness_base: f32,
    pub(crate) sky_brightness: f32,
    pub(crate) sun_core_size: f32,
    pub(crate) sun_core_brightness: f32,
}

pub(crate) const SUN_CORE_MIN: f32 = 36.0;
pub(crate) const SUN_CORE_MAX: f32 = 140.0;

impl DerivedParameters {
    pub(crate) fn derive(mood: MoodState) -> Self {
        let mood = mood.clamped();
        let m = mood.motivation as f32 / 100.0;
        let f = mood.focus as f32 / 100.0;
        let s = mood.stress as f32 / 100.0;

        let sky_brightness_base = lerp(90.0, 40.0, s);
        // Focus "cleans" the sky: a touch more saturation and light.
        let sky_brightness = (sky_brightness_base + lerp(-10.0, 10.0, f)).clamp(20.0, 100.0);

        Self {
            plant_height: lerp(80.0, 300.0, m),
            bloom_size: lerp(20.0, 60.0, m),
            stem_thickness: lerp(4.0, 24.0, f),
            leaf_size: lerp(20.0, 100.0, f),
            sway_amplitude: lerp(15.0, 2.0, f),
            droop_angle_deg: lerp(0.0, 45.0, s),
            jitter_amplitude: lerp(0.0, 3.0, s),
            gray_mix: s,
            sky_hue: lerp(200.0, 55.0, m),
            sky_saturation: lerp(10.0, 25.0, f),
            sky_brightness_base,
            sky_brightness,
            sun_core_size: lerp(SUN_CORE_MIN, SUN_CORE_MAX, m),
            sun_core_brightness: (lerp(70.0, 100.0, m) - lerp(0.0, 40.0, s)).clamp(30.0, 100.0),
        }
    }

    /// Where the sun core sits between its smallest and largest size, in [0, 1].
    pub(crate) fn sun_strength(&self) -> f32 {
        ((self.sun_core_size - SUN_CORE_MIN) / (SUN_CORE_MAX - SUN_CORE_MIN)).clamp(0.0, 1.0)
    }
}
