//! Color allocation for token highlighting.
//!
//! Backgrounds are drawn from a constrained HSL range so they are neither
//! too dull nor too dark/light on screen; the foreground is picked by YIQ
//! luma so text stays legible. The random source is injected so tests can
//! seed it and assert exact outputs.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use crate::types::TextColor;

static HSL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"hsl\((\d+),\s*(\d+)%,\s*(\d+)%\)").expect("hsl regex"));

/// Allocates visually random background colors with matching contrast colors.
pub struct ColorAllocator<R: Rng> {
    rng: R,
}

impl ColorAllocator<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> ColorAllocator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Random CSS `hsl(...)` color: hue 0-360, saturation 40-100%,
    /// lightness 40-70%, each uniform.
    pub fn random_color(&mut self) -> String {
        let h: u16 = self.rng.gen_range(0..=360);
        let s: u8 = self.rng.gen_range(40..=100);
        let l: u8 = self.rng.gen_range(40..=70);
        format!("hsl({h}, {s}%, {l}%)")
    }

    /// One background plus its contrast color.
    pub fn color_pair(&mut self) -> (String, TextColor) {
        let background = self.random_color();
        let text = contrast_of(&background);
        (background, text)
    }
}

/// Black or white foreground for the given `hsl(...)` background, chosen by
/// YIQ luma. Malformed input yields black.
pub fn contrast_of(hsl_color: &str) -> TextColor {
    let Some(caps) = HSL_RE.captures(hsl_color) else {
        return TextColor::Black;
    };

    let h: f64 = caps[1].parse().unwrap_or(0.0);
    let s: f64 = caps[2].parse::<f64>().unwrap_or(0.0) / 100.0;
    let l: f64 = caps[3].parse::<f64>().unwrap_or(0.0) / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = match h {
        h if (0.0..60.0).contains(&h) => (c, x, 0.0),
        h if (60.0..120.0).contains(&h) => (x, c, 0.0),
        h if (120.0..180.0).contains(&h) => (0.0, c, x),
        h if (180.0..240.0).contains(&h) => (0.0, x, c),
        h if (240.0..300.0).contains(&h) => (x, 0.0, c),
        h if (300.0..360.0).contains(&h) => (c, 0.0, x),
        _ => (0.0, 0.0, 0.0),
    };

    let r = ((r1 + m) * 255.0).round();
    let g = ((g1 + m) * 255.0).round();
    let b = ((b1 + m) * 255.0).round();

    let yiq = (r * 299.0 + g * 587.0 + b * 114.0) / 1000.0;
    if yiq >= 128.0 {
        TextColor::Black
    } else {
        TextColor::White
    }
}
