//! Lock-aware auto generator.
//!
//! Fills every unlocked palette position with a color sampled around the
//! nearest locked color, using one of four harmony kinds chosen by a stateless
//! hash of `seed + position * 1000`. Position 0 always follows the current base
//! color, locked positions are kept verbatim, and a candidate that comes out
//! too similar to an already-filled slot gets a single hue nudge.
//!
//! The same module provides the aligned variant used across several series:
//! a master pattern of harmony kinds shared by every series so that column `j`
//! of a palette grid uses the same relationship in every row.

use crate::color::{hue_distance, Color, Hsl};
use crate::params::{HslDelta, HslShift};
use crate::prng::unit_hash;
use serde::{Deserialize, Serialize};

/// Similarity above which a generated color is nudged away from its neighbour.
pub const SIMILARITY_THRESHOLD: f64 = 0.85;
/// Full width of the hue nudge applied to an over-similar color, in degrees.
const NUDGE_SPAN: f64 = 60.0;

/// A palette position whose color must survive regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedColor {
    pub color: Color,
    pub index: usize,
}

impl LockedColor {
    pub fn new(color: Color, index: usize) -> Self {
        Self { color, index }
    }
}

/// The four hue relationships the auto generators sample from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyKind {
    Analogous,
    Complementary,
    Triadic,
    SplitComplementary,
}

impl HarmonyKind {
    pub const ALL: [HarmonyKind; 4] = [
        Self::Analogous,
        Self::Complementary,
        Self::Triadic,
        Self::SplitComplementary,
    ];

    /// Maps a value in [0, 1) to one of the four kinds.
    pub fn from_unit(u: f64) -> Self {
        let idx = ((u * 4.0) as usize).min(3);
        Self::ALL[idx]
    }

    /// Candidate for the lock-aware generator, scaled by the caller's delta.
    ///
    /// `key` is the position key; sub-draws use `key + 1 ..= key + 4`.
    fn lock_aware_candidate(self, reference: &Hsl, delta: &HslDelta, key: i64) -> Hsl {
        let u = |k: i64| unit_hash(key.wrapping_add(k));
        let jitter = |k: i64| u(k) - 0.5;
        match self {
            Self::Analogous => Hsl {
                h: reference.h + jitter(1) * delta.hue * 0.6,
                s: (reference.s + jitter(2) * delta.saturation * 0.8).clamp(20.0, 80.0),
                l: (reference.l + jitter(3) * delta.lightness * 0.7).clamp(15.0, 85.0),
            },
            Self::Complementary => Hsl {
                h: reference.h + 180.0 + jitter(1) * delta.hue * 0.4,
                s: (reference.s + jitter(2) * delta.saturation * 0.6).clamp(30.0, 90.0),
                l: (reference.l + jitter(3) * delta.lightness * 0.8).clamp(20.0, 80.0),
            },
            Self::Triadic => {
                let offset = if u(1) > 0.5 { 120.0 } else { -120.0 };
                Hsl {
                    h: reference.h + offset + jitter(2) * delta.hue * 0.5,
                    s: (reference.s + jitter(3) * delta.saturation * 0.7).clamp(25.0, 85.0),
                    l: (reference.l + jitter(4) * delta.lightness * 0.6).clamp(18.0, 82.0),
                }
            }
            Self::SplitComplementary => {
                let offset = if u(1) > 0.5 { 150.0 } else { -150.0 };
                Hsl {
                    h: reference.h + offset + jitter(2) * delta.hue * 0.4,
                    s: (reference.s + jitter(3) * delta.saturation * 0.6).clamp(30.0, 88.0),
                    l: (reference.l + jitter(4) * delta.lightness * 0.7).clamp(22.0, 78.0),
                }
            }
        }
    }

    /// Candidate for the aligned multi-series variant, with fixed spreads.
    fn aligned_candidate(self, base: &Hsl, key: i64) -> Hsl {
        let u = |k: i64| unit_hash(key.wrapping_add(k));
        let jitter = |k: i64| u(k) - 0.5;
        match self {
            Self::Analogous => Hsl {
                h: base.h + jitter(0) * 60.0,
                s: (base.s + jitter(1) * 40.0).clamp(25.0, 85.0),
                l: (base.l + jitter(2) * 50.0).clamp(20.0, 80.0),
            },
            Self::Complementary => Hsl {
                h: base.h + 180.0 + jitter(0) * 30.0,
                s: (base.s + jitter(1) * 30.0).clamp(35.0, 90.0),
                l: (base.l + jitter(2) * 40.0).clamp(25.0, 75.0),
            },
            Self::Triadic => {
                let offset = if u(0) > 0.5 { 120.0 } else { -120.0 };
                Hsl {
                    h: base.h + offset + jitter(1) * 40.0,
                    s: (base.s + jitter(2) * 35.0).clamp(30.0, 85.0),
                    l: (base.l + jitter(3) * 45.0).clamp(22.0, 78.0),
                }
            }
            Self::SplitComplementary => {
                let offset = if u(0) > 0.5 { 150.0 } else { -150.0 };
                Hsl {
                    h: base.h + offset + jitter(1) * 35.0,
                    s: (base.s + jitter(2) * 32.0).clamp(32.0, 88.0),
                    l: (base.l + jitter(3) * 42.0).clamp(25.0, 75.0),
                }
            }
        }
    }
}

/// Generates `count` colors around `base`, keeping locked positions.
///
/// - Position 0 is always `base` with `shift` applied, even when locked.
/// - Locked positions in `1..count` are the locked color with `shift` applied.
/// - Every other position is sampled in index order from the nearest locked
///   color (by index distance) or from `base` when nothing is locked.
pub fn generate_auto_palette_with_locks(
    base: &Color,
    count: usize,
    locked: &[LockedColor],
    shift: &HslShift,
    delta: &HslDelta,
    seed: i64,
) -> Vec<Color> {
    fill(base, count, locked, shift, delta, seed, |c| c.shifted(shift))
}

/// Like [`generate_auto_palette_with_locks`], for locks taken from a palette
/// that is already on screen.
///
/// Those colors already carry `shift`, so they are placed verbatim and a
/// regeneration never moves them.
pub fn generate_auto_palette_with_shown_locks(
    base: &Color,
    count: usize,
    shown: &[LockedColor],
    shift: &HslShift,
    delta: &HslDelta,
    seed: i64,
) -> Vec<Color> {
    fill(base, count, shown, shift, delta, seed, Color::clone)
}

fn fill(
    base: &Color,
    count: usize,
    locked: &[LockedColor],
    shift: &HslShift,
    delta: &HslDelta,
    seed: i64,
    place: impl Fn(&Color) -> Color,
) -> Vec<Color> {
    if count == 0 {
        return Vec::new();
    }

    let mut slots: Vec<Option<Color>> = vec![None; count];
    slots[0] = Some(base.shifted(shift));
    for lock in locked.iter().filter(|l| l.index > 0 && l.index < count) {
        slots[lock.index] = Some(place(&lock.color));
    }

    for i in 1..count {
        if slots[i].is_some() {
            continue;
        }
        let reference = nearest_locked(i, locked).unwrap_or(base);
        let key = seed.wrapping_add((i as i64).wrapping_mul(1000));
        let kind = HarmonyKind::from_unit(unit_hash(key));
        let candidate = kind.lock_aware_candidate(&reference.hsl, delta, key);
        let color = separate(candidate, &slots, key, shift);
        tracing::trace!(position = i, ?kind, hex = %color.hex, "filled unlocked slot");
        slots[i] = Some(color);
    }

    slots.into_iter().flatten().collect()
}

/// Returns the locked color whose index is closest to `position`.
///
/// Ties go to the lock listed first.
pub fn nearest_locked(position: usize, locked: &[LockedColor]) -> Option<&Color> {
    locked
        .iter()
        .enumerate()
        .min_by_key(|(order, l)| (l.index.abs_diff(position), *order))
        .map(|(_, l)| &l.color)
}

/// Weighted HSL similarity in [0, 1]; 1 means identical.
///
/// Hue (circular) weighs 0.5, saturation 0.3 and lightness 0.2.
pub fn similarity(a: &Color, b: &Color) -> f64 {
    let dh = hue_distance(a.hsl.h, b.hsl.h) / 180.0;
    let ds = (a.hsl.s - b.hsl.s).abs() / 100.0;
    let dl = (a.hsl.l - b.hsl.l).abs() / 100.0;
    1.0 - (dh * 0.5 + ds * 0.3 + dl * 0.2)
}

/// Applies `shift` to `candidate` and, if the result is too similar to any
/// filled slot, nudges its hue once and accepts it unconditionally.
fn separate(candidate: Hsl, slots: &[Option<Color>], key: i64, shift: &HslShift) -> Color {
    let color = Color::from_hsl_shifted(candidate.h, candidate.s, candidate.l, shift);

    let closest = slots
        .iter()
        .enumerate()
        .filter_map(|(j, slot)| slot.as_ref().map(|c| (j, similarity(&color, c))))
        .max_by(|a, b| a.1.total_cmp(&b.1));

    match closest {
        Some((j, score)) if score > SIMILARITY_THRESHOLD => {
            let nudge = (unit_hash(key.wrapping_add(j as i64 * 100)) - 0.5) * NUDGE_SPAN;
            tracing::trace!(against = j, score, nudge, "nudging over-similar color");
            Color::from_hsl_shifted(candidate.h + nudge, candidate.s, candidate.l, shift)
        }
        _ => color,
    }
}

/// Cyclic pattern of harmony kinds shared by all series, one per non-base position.
pub fn master_harmony_pattern(count: usize) -> Vec<HarmonyKind> {
    (0..count.saturating_sub(1))
        .map(|i| HarmonyKind::ALL[i % HarmonyKind::ALL.len()])
        .collect()
}

/// Generates position `position` of series `series_index` following `kind`.
///
/// Keys are `seed + series_index * 1000 + position * 100`. The result is
/// unshifted; the orchestrator applies the global shift.
pub fn aligned_color(
    base: &Color,
    kind: HarmonyKind,
    position: usize,
    series_index: usize,
    seed: i64,
) -> Color {
    let key = seed
        .wrapping_add((series_index as i64).wrapping_mul(1000))
        .wrapping_add((position as i64).wrapping_mul(100));
    Color::from_hsl(kind.aligned_candidate(&base.hsl, key))
}
