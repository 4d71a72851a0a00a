//! Multi-series orchestrator.
//!
//! Produces one [`PaletteSeries`] per base color. Template algorithms map the
//! harmony generator over the bases; the auto algorithms dispatch to their
//! generators with per-series recovery so one bad base color never empties
//! the result.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, MOOD_MAX_COLORS};
use crate::color::Color;
use crate::harmony;
use crate::lock_aware::{
    aligned_color, generate_auto_palette_with_shown_locks, master_harmony_pattern, HarmonyKind,
};
use crate::mood::{generate_mood_palette, MoodOptions};
use crate::params::{HslShift, MoodSeriesOptions, DEFAULT_MIN_HUE_SEPARATION};
use crate::request::PaletteRequest;
use crate::strategy::generate_strategy_palette;

/// Mood synthesis slower than this is logged as a warning.
const SLOW_MOOD: Duration = Duration::from_secs(1);
/// Separation bounds applied by the mood series wrapper, in degrees.
const SERIES_SEPARATION_RANGE: (f64, f64) = (8.0, 45.0);

/// The palette generated for one base color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteSeries {
    pub base_color: String,
    pub palette: Vec<Color>,
}

impl PaletteSeries {
    pub fn new(base_color: impl Into<String>, palette: Vec<Color>) -> Self {
        Self {
            base_color: base_color.into(),
            palette,
        }
    }

    pub fn hexes(&self) -> Vec<&str> {
        self.palette.iter().map(|c| c.hex.as_str()).collect()
    }
}

/// Runs `request`, reading locked colors from `previous` where the lock map
/// asks for them.
pub fn generate(request: &PaletteRequest, previous: Option<&[PaletteSeries]>) -> Vec<PaletteSeries> {
    let bases = &request.base_colors;
    let count = request.count;
    tracing::debug!(
        algorithm = %request.algorithm,
        series = bases.len(),
        count,
        "generating palettes"
    );

    match request.algorithm {
        Algorithm::AutoLockAware => lock_aware_series(request, previous),
        Algorithm::AutoMoodDriven => generate_mood_series(bases, count, &request.mood_options()),
        Algorithm::AutoStrategy => generate_strategy_series(bases, count, request.seed),
        template => bases
            .iter()
            .map(|base| {
                let palette = harmony::generate(&Color::from_hex(base), count, template, &request.shift);
                PaletteSeries::new(base.clone(), palette)
            })
            .collect(),
    }
}

/// One series per base color with default seed, deltas and options.
pub fn generate_multiple_palette_series<S: AsRef<str>>(
    base_colors: &[S],
    count: usize,
    algorithm: Algorithm,
    shift: &HslShift,
) -> Vec<PaletteSeries> {
    let mut request = PaletteRequest::new(
        base_colors.iter().map(|s| s.as_ref().to_string()).collect(),
        count,
        algorithm,
    );
    request.shift = *shift;
    generate(&request, None)
}

/// The palette of the first base color, or empty when there is none.
pub fn generate_palette<S: AsRef<str>>(
    base_colors: &[S],
    count: usize,
    algorithm: Algorithm,
    shift: &HslShift,
) -> Vec<Color> {
    let first = &base_colors[..base_colors.len().min(1)];
    generate_multiple_palette_series(first, count, algorithm, shift)
        .into_iter()
        .next()
        .map(|series| series.palette)
        .unwrap_or_default()
}

/// Lock-aware series: unlocked series follow the shared master pattern,
/// locked series regenerate around their locked colors. Locked colors come
/// from the previous result as shown and are kept exactly.
fn lock_aware_series(request: &PaletteRequest, previous: Option<&[PaletteSeries]>) -> Vec<PaletteSeries> {
    let count = request.count;
    let seed = request.seed.unwrap_or(0) as i64;
    let pattern = master_harmony_pattern(count);

    request
        .base_colors
        .iter()
        .enumerate()
        .map(|(i, hex)| {
            let base = Color::from_hex(hex);
            let palette = if request.has_locks(i) {
                let locked = request.locked_colors(i, previous);
                tracing::debug!(series = i, locks = locked.len(), "regenerating around locks");
                generate_auto_palette_with_shown_locks(&base, count, &locked, &request.shift, &request.delta, seed)
            } else {
                aligned_palette(&base, count, &pattern, i, seed, &request.shift)
            };
            PaletteSeries::new(hex.clone(), palette)
        })
        .collect()
}

fn aligned_palette(
    base: &Color,
    count: usize,
    pattern: &[HarmonyKind],
    series_index: usize,
    seed: i64,
    shift: &HslShift,
) -> Vec<Color> {
    if count == 0 {
        return Vec::new();
    }
    let mut palette = Vec::with_capacity(count);
    palette.push(base.shifted(shift));
    palette.extend(
        pattern
            .iter()
            .enumerate()
            .map(|(j, kind)| aligned_color(base, *kind, j + 1, series_index, seed).shifted(shift)),
    );
    palette
}

/// Mood-driven palette per base color, the base being the only lock.
///
/// The size is capped at 10 and the separation clamped to [8, 45]. A series
/// whose synthesis fails falls back to the harmony rotation.
pub fn generate_mood_series<S: AsRef<str>>(
    base_colors: &[S],
    count: usize,
    options: &MoodSeriesOptions,
) -> Vec<PaletteSeries> {
    let (lo, hi) = SERIES_SEPARATION_RANGE;
    let mood = MoodOptions {
        size: count.min(MOOD_MAX_COLORS),
        seed: options.seed,
        min_hue_separation: Some(
            options
                .min_hue_separation
                .unwrap_or(DEFAULT_MIN_HUE_SEPARATION)
                .clamp(lo, hi),
        ),
        prefer_pastel: options.prefer_pastel,
        prefer_dark: options.prefer_dark,
        lock_at_ends: options.lock_at_ends,
    };

    base_colors
        .iter()
        .map(|base| {
            let base = base.as_ref();
            let started = Instant::now();
            let palette = match generate_mood_palette(&[base], &mood) {
                Ok(hexes) => hexes.iter().map(|h| Color::from_hex(h)).collect(),
                Err(e) => {
                    tracing::warn!(base, error = %e, "mood synthesis failed, using harmony rotation");
                    harmony::rotation(&Color::from_hex(base), count, &HslShift::default())
                }
            };
            let elapsed = started.elapsed();
            if elapsed > SLOW_MOOD {
                tracing::warn!(base, elapsed_ms = elapsed.as_millis() as u64, "slow mood synthesis");
            }
            PaletteSeries::new(base, palette)
        })
        .collect()
}

/// Strategy-sampled palette per base color with a shared seed.
pub fn generate_strategy_series<S: AsRef<str>>(
    base_colors: &[S],
    count: usize,
    seed: Option<u64>,
) -> Vec<PaletteSeries> {
    base_colors
        .iter()
        .map(|base| {
            let base = base.as_ref();
            let palette = generate_strategy_palette(&[base], count, seed)
                .iter()
                .map(|h| Color::from_hex(h))
                .collect();
            PaletteSeries::new(base, palette)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift() -> HslShift {
        HslShift::default()
    }

    #[test]
    fn template_maps_each_base() {
        let series = generate_multiple_palette_series(
            &["#FF6B6B", "#3182CE"],
            4,
            Algorithm::Triadic,
            &shift(),
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].base_color, "#FF6B6B");
        assert_eq!(series[0].palette.len(), 3);
        assert_eq!(series[1].palette[0].hex, "#3182CE");
    }

    #[test]
    fn generate_palette_uses_first_base() {
        let palette = generate_palette(&["#FF6B6B", "#3182CE"], 2, Algorithm::Complementary, &shift());
        let hexes: Vec<&str> = palette.iter().map(|c| c.hex.as_str()).collect();
        assert_eq!(hexes, ["#FF6B6B", "#6BFFFF"]);
    }

    #[test]
    fn generate_palette_without_bases_is_empty() {
        let none: [&str; 0] = [];
        assert!(generate_palette(&none, 5, Algorithm::AutoLockAware, &shift()).is_empty());
    }

    #[test]
    fn lock_aware_series_share_pattern_and_start_at_base() {
        let shift = HslShift::new(10.0, 0.0, 0.0);
        let series = generate_multiple_palette_series(
            &["#FF6B6B", "#3182CE", "#10B981"],
            6,
            Algorithm::AutoLockAware,
            &shift,
        );
        assert_eq!(series.len(), 3);
        for s in &series {
            assert_eq!(s.palette.len(), 6);
            assert_eq!(s.palette[0], Color::from_hex(&s.base_color).shifted(&shift));
        }
    }

    #[test]
    fn aligned_palette_follows_pattern_kinds() {
        let base = Color::from_hex("#3182CE");
        let pattern = [HarmonyKind::Complementary];
        let palette = aligned_palette(&base, 2, &pattern, 0, 0, &shift());
        assert_eq!(palette[1], aligned_color(&base, HarmonyKind::Complementary, 1, 0, 0));
    }

    #[test]
    fn locked_series_keeps_previous_colors() {
        let mut request = PaletteRequest::new(
            vec!["#3182CE".into(), "#FF6B6B".into()],
            5,
            Algorithm::AutoLockAware,
        );
        request.shift = HslShift::new(20.0, 0.0, -10.0);
        request.seed = Some(9);
        let first = generate(&request, None);

        request.set_lock(0, 3, true);
        request.set_lock(1, 3, true);
        request.seed = Some(10);
        let second = generate(&request, Some(&first));
        request.seed = Some(11);
        let third = generate(&request, Some(&second));

        for i in 0..2 {
            assert_eq!(second[i].palette[3], first[i].palette[3]);
            assert_eq!(third[i].palette[3], first[i].palette[3]);
            assert_eq!(third[i].palette[0], first[i].palette[0]);
        }
    }

    #[test]
    fn mood_series_caps_size_at_ten() {
        let series = generate_mood_series(&["#0EA5E9"], 25, &MoodSeriesOptions::default());
        assert_eq!(series[0].palette.len(), 10);
        assert!(series[0].hexes().contains(&"#0EA5E9"));
    }

    #[test]
    fn mood_series_falls_back_on_bad_base() {
        let series = generate_mood_series(&["nope", "#F59E0B"], 6, &MoodSeriesOptions::default());
        assert_eq!(series.len(), 2);
        assert_eq!(
            series[0].palette,
            harmony::rotation(&Color::from_hex("nope"), 6, &HslShift::default())
        );
        assert_eq!(series[1].palette.len(), 6);
    }

    #[test]
    fn mood_series_is_deterministic_with_seed() {
        let opts = MoodSeriesOptions {
            seed: Some(42),
            ..Default::default()
        };
        let a = generate_mood_series(&["#0EA5E9", "#F59E0B"], 8, &opts);
        let b = generate_mood_series(&["#0EA5E9", "#F59E0B"], 8, &opts);
        assert_eq!(a, b);
    }

    #[test]
    fn strategy_series_keeps_base_first() {
        let series = generate_strategy_series(&["#4ECDC4", "#FFE66D"], 7, Some(12345));
        assert_eq!(series.len(), 2);
        for s in &series {
            assert_eq!(s.palette.len(), 7);
            assert_eq!(s.palette[0].hex, s.base_color);
        }
    }

    #[test]
    fn series_serializes_with_camel_case() {
        let s = PaletteSeries::new("#FFFFFF", vec![Color::from_hex("#FFFFFF")]);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["baseColor"], "#FFFFFF");
        assert_eq!(v["palette"][0]["hex"], "#FFFFFF");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn auto_counts_are_exact(
                seed: u64,
                count in 1_usize..16,
                algo in proptest::sample::select(vec![
                    Algorithm::AutoLockAware,
                    Algorithm::AutoMoodDriven,
                    Algorithm::AutoStrategy,
                ]),
            ) {
                let mut request = PaletteRequest::new(
                    vec!["#3182CE".into(), "#F59E0B".into()],
                    count,
                    algo,
                );
                request.seed = Some(seed);
                let expected = if algo == Algorithm::AutoMoodDriven {
                    count.min(MOOD_MAX_COLORS)
                } else {
                    count
                };
                for s in generate(&request, None) {
                    prop_assert_eq!(s.palette.len(), expected);
                }
            }

            #[test]
            fn requests_are_deterministic(seed: u64, count in 1_usize..10) {
                let mut request = PaletteRequest::new(
                    vec!["#10B981".into()],
                    count,
                    Algorithm::AutoStrategy,
                );
                request.seed = Some(seed);
                prop_assert_eq!(generate(&request, None), generate(&request, None));
            }
        }
    }
}
