//! Linear scales with "nice" domain rounding. Tick positions come from the
//! plotters ranged coordinates, so they match what `configure_mesh` would draw.

use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Maps a numeric domain linearly onto a pixel range (either direction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

/// Signed 1-2-5 step for about `count` intervals; `-k` stands for `1/k`.
fn nice_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain value to range value. A zero-width domain maps to the middle of the range.
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 { 0.5 } else { (v - d0) / (d1 - d0) };
        r0 + t * (r1 - r0)
    }

    /// Range value back to domain value.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if r1 == r0 { 0.5 } else { (px - r0) / (r1 - r0) };
        d0 + t * (d1 - d0)
    }

    /// Extend the domain outward to round multiples of a 1-2-5 step.
    pub fn nice(self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut prestep = None;
        for _ in 0..10 {
            let step = nice_increment(start, stop, count);
            if prestep == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }
        let domain = if reversed { (stop, start) } else { (start, stop) };
        Self { domain, ..self }
    }

    fn bounds(&self) -> (f64, f64) {
        let (a, b) = self.domain;
        (a.min(b), a.max(b))
    }

    /// Round tick values inside the domain, at most `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = self.bounds();
        if !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        let slack = (hi - lo) * 1e-9;
        RangedCoordf64::from(lo..hi)
            .key_points(count.max(1))
            .into_iter()
            .filter(|v| *v >= lo - slack && *v <= hi + slack)
            .collect()
    }

    /// Whole-number ticks inside the domain (for year axes), about `count` of them.
    pub fn integer_ticks(&self, count: usize) -> Vec<i32> {
        let (lo, hi) = self.bounds();
        if !lo.is_finite() || !hi.is_finite() || hi - lo > i32::MAX as f64 {
            return Vec::new();
        }
        let (lo, hi) = (lo.ceil() as i32, hi.floor() as i32);
        if lo > hi {
            return Vec::new();
        }
        RangedCoordi32::from(lo..hi).key_points(count.max(2))
    }
}

/// Spacing of evenly spaced `ticks`, or 1 when there are fewer than two.
pub fn tick_spacing(ticks: &[f64]) -> f64 {
    match ticks {
        [a, b, ..] => (b - a).abs(),
        _ => 1.0,
    }
}

/// Tick label with just enough decimals for `step` (0.5 → one decimal, 5 → none).
pub fn format_tick(v: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        // Spacing from summed floats can be a hair off a power of ten.
        (-step.log10() - 1e-6).ceil() as usize
    } else {
        0
    };
    let s = format!("{v:.decimals$}");
    // Avoid "-0".
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}
