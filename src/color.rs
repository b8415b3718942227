#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub(crate) fn alpha(self, a: f32) -> Rgba {
        Rgba {
            rgb: self,
            a: a.clamp(0.0, 1.0),
        }
    }
}

/// A color plus coverage in [0, 1]; every draw call takes one of these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgba {
    pub(crate) rgb: Rgb,
    pub(crate) a: f32,
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Self { rgb, a: 1.0 }
    }
}

/// Hue in degrees, saturation and brightness in percent.
///
/// `f(n) = b * (1 - s * clamp(min(k, 4 - k, 1), 0, 1))` with
/// `k = (n + h / 60) mod 6`; red, green and blue are `f(5)`, `f(3)`, `f(1)`.
pub(crate) fn hsb_to_rgb(h: f32, s: f32, b: f32) -> Rgb {
    let s = s.clamp(0.0, 100.0) / 100.0;
    let b = b.clamp(0.0, 100.0) / 100.0;
    let k = |n: f32| (n + h / 60.0).rem_euclid(6.0);
    let f = |n: f32| {
        let k = k(n);
        b * (1.0 - s * k.min(4.0 - k).min(1.0).clamp(0.0, 1.0))
    };
    let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(f(5.0)),
        g: channel(f(3.0)),
        b: channel(f(1.0)),
    }
}

pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub(crate) fn lerp_color(c1: Rgb, c2: Rgb, t: f32) -> Rgb {
    let ch = |a: u8, b: u8| lerp(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: ch(c1.r, c2.r),
        g: ch(c1.g, c2.g),
        b: ch(c1.b, c2.b),
    }
}

/// Mix a vivid hue/saturation/brightness triple toward its gray counterpart.
///
/// Each component is lerped by `gray_mix` before conversion, which is how
/// the plant, leaves and timeline fade out as stress rises.
pub(crate) fn hsb_mix(vivid: (f32, f32, f32), gray: (f32, f32, f32), gray_mix: f32) -> Rgb {
    hsb_to_rgb(
        lerp(vivid.0, gray.0, gray_mix),
        lerp(vivid.1, gray.1, gray_mix),
        lerp(vivid.2, gray.2, gray_mix),
    )
}
