//! Template harmony generator: fixed-angle rotations of one base color.
//!
//! Hue offsets are taken from the unshifted base color; saturation and
//! lightness are copied from it unless the algorithm overrides them. The
//! global [`HslShift`] is applied to every emitted color as the last step, so
//! the first color is always the shifted base.

use crate::algorithm::Algorithm;
use crate::color::Color;
use crate::params::HslShift;

/// Hue step between analogous neighbours, in degrees.
const ANALOGOUS_STEP: f64 = 30.0;
/// Half-width of the monochromatic lightness ramp around the base lightness.
const MONO_SPAN: f64 = 40.0;
/// Monochromatic lightness is kept inside this band.
const MONO_MIN_L: f64 = 10.0;
const MONO_MAX_L: f64 = 90.0;

/// Offsets cycled by [`rotation`]: the classic template angles in one list.
pub const ROTATION_OFFSETS: [f64; 9] = [0.0, 180.0, 120.0, 240.0, 30.0, 330.0, 150.0, 210.0, 90.0];

/// Generates a template palette.
///
/// Returns `min(count, cap)` colors where the cap is
/// [`Algorithm::max_colors`]; analogous and monochromatic return exactly
/// `count`. Auto algorithms are not templates and fall back to [`rotation`].
pub fn generate(base: &Color, count: usize, algorithm: Algorithm, shift: &HslShift) -> Vec<Color> {
    if count == 0 {
        return Vec::new();
    }
    match algorithm {
        Algorithm::Complementary
        | Algorithm::Triadic
        | Algorithm::SplitComplementary
        | Algorithm::Tetradic => fixed(base, count, algorithm.hue_offsets(), shift),
        Algorithm::Analogous => analogous(base, count, shift),
        Algorithm::Monochromatic => monochromatic(base, count, shift),
        Algorithm::AutoLockAware | Algorithm::AutoMoodDriven | Algorithm::AutoStrategy => {
            rotation(base, count, shift)
        }
    }
}

fn fixed(base: &Color, count: usize, offsets: &[f64], shift: &HslShift) -> Vec<Color> {
    offsets
        .iter()
        .take(count)
        .map(|offset| Color::from_hsl_shifted(base.hsl.h + offset, base.hsl.s, base.hsl.l, shift))
        .collect()
}

/// Alternates outward from the base: 0, +30, -30, +60, -60, ...
fn analogous(base: &Color, count: usize, shift: &HslShift) -> Vec<Color> {
    (0..count)
        .map(|i| {
            let side = if i % 2 == 1 { 1.0 } else { -1.0 };
            let rotation = side * i.div_ceil(2) as f64 * ANALOGOUS_STEP;
            Color::from_hsl_shifted(base.hsl.h + rotation, base.hsl.s, base.hsl.l, shift)
        })
        .collect()
}

/// Base color first, then a lightness ramp from `base - 40` toward `base + 40`.
fn monochromatic(base: &Color, count: usize, shift: &HslShift) -> Vec<Color> {
    let mut colors = vec![base.shifted(shift)];
    if count == 1 {
        return colors;
    }
    let step = 2.0 * MONO_SPAN / (count - 1) as f64;
    colors.extend((1..count).map(|i| {
        let l = (base.hsl.l - MONO_SPAN + (i - 1) as f64 * step).clamp(MONO_MIN_L, MONO_MAX_L);
        Color::from_hsl_shifted(base.hsl.h, base.hsl.s, l, shift)
    }));
    colors
}

/// Produces exactly `count` colors by cycling `offsets`.
///
/// The first pass keeps the base lightness. Each later pass `k` moves the
/// lightness to `20 + 60 * k / passes`, so repeated hues stay distinguishable.
pub fn cycle(base: &Color, count: usize, offsets: &[f64], shift: &HslShift) -> Vec<Color> {
    if offsets.is_empty() {
        return vec![base.shifted(shift); count];
    }
    let passes = (count / offsets.len()).max(1) as f64;
    (0..count)
        .map(|i| {
            let offset = offsets[i % offsets.len()];
            let pass = i / offsets.len();
            let l = if pass == 0 {
                base.hsl.l
            } else {
                (20.0 + 60.0 * pass as f64 / passes).clamp(MONO_MIN_L, MONO_MAX_L)
            };
            Color::from_hsl_shifted(base.hsl.h + offset, base.hsl.s, l, shift)
        })
        .collect()
}

/// Simple harmony rotation used when an auto generator is unavailable.
pub fn rotation(base: &Color, count: usize, shift: &HslShift) -> Vec<Color> {
    cycle(base, count, &ROTATION_OFFSETS, shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hue_distance;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn hexes(colors: &[Color]) -> Vec<&str> {
        colors.iter().map(|c| c.hex.as_str()).collect()
    }

    #[test]
    fn complementary_of_coral_is_cyan_with_same_s_and_l() {
        let base = Color::from_hex("#FF6B6B");
        let palette = generate(&base, 2, Algorithm::Complementary, &HslShift::default());
        assert_eq!(hexes(&palette), ["#FF6B6B", "#6BFFFF"]);
        assert!(approx_eq(palette[1].hsl.h, 180.0));
        assert!(approx_eq(palette[1].hsl.s, base.hsl.s));
        assert!(approx_eq(palette[1].hsl.l, base.hsl.l));
    }

    #[test]
    fn fixed_templates_truncate_to_cap() {
        let base = Color::from_hex("#3182CE");
        let shift = HslShift::default();
        assert_eq!(generate(&base, 8, Algorithm::Complementary, &shift).len(), 2);
        assert_eq!(generate(&base, 8, Algorithm::Triadic, &shift).len(), 3);
        assert_eq!(generate(&base, 8, Algorithm::SplitComplementary, &shift).len(), 3);
        assert_eq!(generate(&base, 8, Algorithm::Tetradic, &shift).len(), 4);
        assert_eq!(generate(&base, 2, Algorithm::Tetradic, &shift).len(), 2);
    }

    #[test]
    fn zero_count_is_empty() {
        let base = Color::from_hex("#3182CE");
        for algo in Algorithm::ALL {
            assert!(generate(&base, 0, algo, &HslShift::default()).is_empty());
        }
    }

    #[test]
    fn tetradic_angles_from_base() {
        let base = Color::from_hex("#FF0000");
        let palette = generate(&base, 4, Algorithm::Tetradic, &HslShift::default());
        let hues: Vec<f64> = palette.iter().map(|c| c.hsl.h).collect();
        for (h, expected) in hues.iter().zip([0.0, 90.0, 180.0, 270.0]) {
            assert!(approx_eq(*h, expected), "{h} vs {expected}");
        }
    }

    #[test]
    fn analogous_alternates_outward() {
        let base = Color::from_hex("#FF0000");
        let palette = generate(&base, 5, Algorithm::Analogous, &HslShift::default());
        let hues: Vec<f64> = palette.iter().map(|c| c.hsl.h).collect();
        for (h, expected) in hues.iter().zip([0.0, 30.0, 330.0, 60.0, 300.0]) {
            assert!(approx_eq(*h, expected), "{h} vs {expected}");
        }
    }

    #[test]
    fn analogous_produces_any_count() {
        let base = Color::from_hex("#3182CE");
        let palette = generate(&base, 15, Algorithm::Analogous, &HslShift::default());
        assert_eq!(palette.len(), 15);
    }

    #[test]
    fn monochromatic_shares_hue_and_ramps_lightness() {
        let base = Color::from_hex("#3182CE");
        let palette = generate(&base, 8, Algorithm::Monochromatic, &HslShift::default());
        assert_eq!(palette.len(), 8);
        assert_eq!(palette[0].hex, "#3182CE");
        for c in &palette {
            assert!(approx_eq(c.hsl.h, base.hsl.h));
            assert!(approx_eq(c.hsl.s, base.hsl.s));
        }
        let tail: Vec<f64> = palette[1..].iter().map(|c| c.hsl.l).collect();
        assert!(tail.windows(2).all(|w| w[0] <= w[1]), "not monotonic: {tail:?}");
        assert!(tail.iter().all(|l| (10.0..=90.0).contains(l)));
        assert!(approx_eq(tail[0], (base.hsl.l - 40.0).max(10.0)));
    }

    #[test]
    fn monochromatic_clamps_to_band() {
        let base = Color::from_hex("#F0F8FF");
        let palette = generate(&base, 6, Algorithm::Monochromatic, &HslShift::default());
        assert!(palette[1..].iter().all(|c| c.hsl.l <= 90.0 + EPSILON));
    }

    #[test]
    fn monochromatic_count_one_is_base() {
        let base = Color::from_hex("#3182CE");
        let palette = generate(&base, 1, Algorithm::Monochromatic, &HslShift::default());
        assert_eq!(hexes(&palette), ["#3182CE"]);
    }

    #[test]
    fn shift_applies_to_every_color_including_base() {
        let base = Color::from_hex("#FF0000");
        let shift = HslShift::new(10.0, -20.0, 5.0);
        let palette = generate(&base, 3, Algorithm::Triadic, &shift);
        assert_eq!(palette[0], base.shifted(&shift));
        assert!(approx_eq(palette[1].hsl.h, 130.0));
        assert!(approx_eq(palette[2].hsl.s, 80.0));
        assert!(approx_eq(palette[2].hsl.l, 55.0));
    }

    #[test]
    fn cycle_fills_exact_count_and_varies_lightness_on_repeat() {
        let base = Color::from_hex("#3182CE");
        let palette = cycle(&base, 9, &[0.0, 180.0], &HslShift::default());
        assert_eq!(palette.len(), 9);
        assert!(approx_eq(palette[0].hsl.l, base.hsl.l));
        assert!(!approx_eq(palette[2].hsl.l, palette[4].hsl.l));
        assert!(hue_distance(palette[2].hsl.h, base.hsl.h) < EPSILON);
    }

    #[test]
    fn rotation_starts_with_shifted_base() {
        let base = Color::from_hex("#0EA5E9");
        let shift = HslShift::new(0.0, 0.0, -10.0);
        let palette = rotation(&base, 12, &shift);
        assert_eq!(palette.len(), 12);
        assert_eq!(palette[0], base.shifted(&shift));
    }

    #[test]
    fn auto_algorithms_fall_back_to_rotation() {
        let base = Color::from_hex("#0EA5E9");
        let shift = HslShift::default();
        assert_eq!(
            generate(&base, 7, Algorithm::AutoStrategy, &shift),
            rotation(&base, 7, &shift)
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn algorithm() -> impl Strategy<Value = Algorithm> {
            proptest::sample::select(Algorithm::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn count_is_min_of_requested_and_cap(
                r: u8, g: u8, b: u8,
                count in 0_usize..30,
                algo in algorithm(),
            ) {
                let base = Color::from_rgb(crate::color::Rgb { r, g, b });
                let palette = generate(&base, count, algo, &HslShift::default());
                let expected = match algo {
                    Algorithm::Complementary
                    | Algorithm::Triadic
                    | Algorithm::SplitComplementary
                    | Algorithm::Tetradic => count.min(algo.hue_offsets().len()),
                    _ => count,
                };
                prop_assert_eq!(palette.len(), expected);
            }

            #[test]
            fn hues_always_wrap(
                h in 0.0_f64..360.0,
                dh in -180.0_f64..=180.0,
                count in 1_usize..16,
                algo in algorithm(),
            ) {
                let base = Color::from_hsl(crate::color::Hsl::new(h, 60.0, 50.0));
                let shift = HslShift::new(dh, 0.0, 0.0);
                for c in generate(&base, count, algo, &shift) {
                    prop_assert!(c.hsl.h >= 0.0 && c.hsl.h < 360.0, "h = {}", c.hsl.h);
                }
            }
        }
    }
}
