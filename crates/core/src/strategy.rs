//! Strategy sampler: keeps the input colors and appends colors from one of
//! six seeded strategies.

use crate::color::{normalize_hex, Color, Hsl};
use crate::prng::{fnv1a, Xorshift64};
use std::f64::consts::PI;

const GOLDEN_ANGLE: f64 = 137.508;
const SATURATION_LEVELS: [f64; 3] = [15.0, 45.0, 75.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Golden-angle hue steps around the inputs in turn.
    GoldenRatioHarmony,
    /// Bowed path from the first input to the last.
    PerceptualFlow,
    /// Sinusoidal hue, saturation and lightness offsets.
    ContrastWaves,
    /// Hue walk with a fixed drift per step.
    ChromaticDrift,
    /// Evenly stepped lightness from 15 to 85.
    LuminanceSteps,
    /// Cycling saturation levels with alternating near and opposite hues.
    SaturationPlay,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Self::GoldenRatioHarmony,
        Self::PerceptualFlow,
        Self::ContrastWaves,
        Self::ChromaticDrift,
        Self::LuminanceSteps,
        Self::SaturationPlay,
    ];

    /// Picks a strategy as `floor(r * 6)` of one uniform draw.
    pub fn pick(rng: &mut Xorshift64) -> Self {
        let n = Self::ALL.len();
        Self::ALL[((rng.next_f64() * n as f64) as usize).min(n - 1)]
    }

    /// Produces `count` new colors (HSL, percent scale) anchored on `bases`.
    ///
    /// `bases` must be non-empty.
    fn extend(self, bases: &[Hsl], count: usize, rng: &mut Xorshift64) -> Vec<Hsl> {
        let base = |i: usize| bases[i % bases.len()];
        match self {
            Self::GoldenRatioHarmony => (0..count)
                .map(|i| {
                    let b = base(i);
                    let hue_shift = GOLDEN_ANGLE * (i + 1) as f64 + rng.next_f64() * 30.0 - 15.0;
                    let s = b.s + rng.next_jitter() * 40.0;
                    let l = b.l + rng.next_jitter() * 30.0;
                    Hsl::new(b.h + hue_shift, s.clamp(10.0, 90.0), l.clamp(15.0, 85.0))
                })
                .collect(),
            Self::PerceptualFlow => {
                let first = bases[0];
                let last = bases[bases.len() - 1];
                let steps = (count + 1) as f64;
                (1..=count)
                    .map(|i| {
                        let p = i as f64 / steps;
                        let bow = (p * PI).sin() * 60.0;
                        let h = first.h + (last.h - first.h) * p + bow;
                        let s = first.s + (last.s - first.s) * p + rng.next_jitter() * 20.0;
                        let l = first.l + (last.l - first.l) * p + rng.next_jitter() * 15.0;
                        Hsl::new(h, s.clamp(10.0, 90.0), l.clamp(15.0, 85.0))
                    })
                    .collect()
            }
            Self::ContrastWaves => (0..count)
                .map(|i| {
                    let b = base(i);
                    let phase = i as f64 / count as f64 * PI * 2.0;
                    let h = b.h + phase.sin() * 180.0 + rng.next_f64() * 40.0 - 20.0;
                    let s = b.s + (phase * 1.5).cos() * 30.0;
                    let l = b.l + (phase * 0.7).sin() * 25.0;
                    Hsl::new(h, s.clamp(15.0, 85.0), l.clamp(20.0, 80.0))
                })
                .collect(),
            Self::ChromaticDrift => {
                let drift = 15.0 + rng.next_f64() * 25.0;
                let mut hue = bases[0].h;
                (0..count)
                    .map(|i| {
                        hue += drift + rng.next_jitter() * 20.0;
                        let b = base(i);
                        let s = b.s + rng.next_jitter() * 30.0;
                        let l = b.l + rng.next_jitter() * 20.0;
                        Hsl::new(hue, s.clamp(20.0, 80.0), l.clamp(25.0, 75.0))
                    })
                    .collect()
            }
            Self::LuminanceSteps => {
                let step = (85.0 - 15.0) / (count + 1) as f64;
                (0..count)
                    .map(|i| {
                        let b = base(i);
                        let h = b.h + rng.next_jitter() * 60.0;
                        let s = b.s + rng.next_jitter() * 25.0;
                        Hsl::new(h, s.clamp(20.0, 80.0), 15.0 + (i + 1) as f64 * step)
                    })
                    .collect()
            }
            Self::SaturationPlay => (0..count)
                .map(|i| {
                    let b = base(i);
                    let target_s = SATURATION_LEVELS[i % SATURATION_LEVELS.len()];
                    let hue_shift = if i % 2 == 0 {
                        rng.next_jitter() * 30.0
                    } else {
                        180.0 + rng.next_jitter() * 60.0
                    };
                    let s = target_s + rng.next_jitter() * 15.0;
                    let l = b.l + rng.next_jitter() * 25.0;
                    Hsl::new(b.h + hue_shift, s.clamp(10.0, 90.0), l.clamp(20.0, 80.0))
                })
                .collect(),
        }
    }
}

/// Canonical form of an input: normalized hex, or black if malformed.
fn canonical(input: &str) -> String {
    normalize_hex(input).unwrap_or_else(|_| {
        tracing::debug!(input, "unparseable strategy input, using black");
        Color::from_hex(input).hex
    })
}

/// Returns `total` colors: the inputs first, then sampled colors.
///
/// Without a seed the FNV-1a hash of the comma-joined inputs is used, so the
/// result is always reproducible. If `total` does not exceed the number of
/// inputs the inputs are truncated.
pub fn generate_strategy_palette<S: AsRef<str>>(
    inputs: &[S],
    total: usize,
    seed: Option<u64>,
) -> Vec<String> {
    let seed = seed.unwrap_or_else(|| {
        let joined = inputs.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        u64::from(fnv1a(&joined))
    });
    let mut rng = Xorshift64::new(seed);
    let strategy = Strategy::pick(&mut rng);
    generate_with_strategy(inputs, total, strategy, &mut rng)
}

/// Like [`generate_strategy_palette`] with an explicit strategy and stream.
pub fn generate_with_strategy<S: AsRef<str>>(
    inputs: &[S],
    total: usize,
    strategy: Strategy,
    rng: &mut Xorshift64,
) -> Vec<String> {
    let mut palette: Vec<String> = inputs.iter().map(|s| canonical(s.as_ref())).collect();
    if total <= palette.len() {
        palette.truncate(total);
        return palette;
    }

    let mut bases: Vec<Hsl> = palette.iter().map(|hex| Color::from_hex(hex).hsl).collect();
    if bases.is_empty() {
        bases.push(Hsl::default());
    }
    let needed = total - palette.len();
    tracing::debug!(?strategy, needed, "sampling strategy colors");
    palette.extend(
        strategy
            .extend(&bases, needed, rng)
            .into_iter()
            .map(|hsl| Color::from_hsl(hsl).hex),
    );
    palette
}
