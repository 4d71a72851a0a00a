//! Mood-driven generator.
//!
//! Builds a palette around a set of locked colors. A mood triple (softness,
//! darkness, punch) is drawn once per palette and biases both the proposal
//! mode and a final pull of every candidate toward target saturation and
//! lightness. Candidates are sampled from existing pool members in van der
//! Corput order and must keep a minimum HSL distance and, outside the
//! analogous cluster mode, a minimum hue separation from the pool.
//!
//! Every loop is bounded. Constraints relax as the attempt counter grows
//! (see [`distinctness_threshold`], [`fallback_threshold`], [`force_accept`]),
//! and a final unconstrained fill guarantees the requested size.
//!
//! Internally saturation and lightness are in [0, 1]; hue is in degrees.

use std::time::Instant;

use crate::color::{hue_distance, normalize_hex, parse_hex, rgb_to_hsl, wrap_hue, Color, Hsl};
use crate::error::PaletteError;
use crate::params::DEFAULT_MIN_HUE_SEPARATION;
use crate::prng::{fnv1a, Xorshift64};

/// Golden angle in degrees.
const GOLDEN_ANGLE: f64 = 137.507_764_050_037_85;
/// Mixed into the lock hash when no explicit seed is given.
const SEED_SALT: u32 = 0x9E37_79B9;
/// Bounds of the soft hue separation, in degrees.
const MIN_SEPARATION_RANGE: (f64, f64) = (8.0, 90.0);
/// Number of 30 degree sectors used when ordering the result.
const SECTORS: usize = 12;

/// Options of a single mood-driven palette.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoodOptions {
    /// Total colors wanted; raised to the number of locks if smaller.
    pub size: usize,
    pub seed: Option<u64>,
    /// Soft minimum hue separation in degrees, clamped to [8, 90]. `None` uses 22.
    pub min_hue_separation: Option<f64>,
    pub prefer_pastel: bool,
    pub prefer_dark: bool,
    /// Put the darkest and lightest locked colors at the two ends.
    pub lock_at_ends: bool,
}

impl MoodOptions {
    /// Default options asking for `size` colors.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Seed used when none is given: FNV-1a of the comma-joined locks, salted.
    pub fn effective_seed<S: AsRef<str>>(&self, locked: &[S]) -> u64 {
        self.seed.unwrap_or_else(|| {
            let joined = locked.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
            u64::from(fnv1a(&joined) ^ SEED_SALT)
        })
    }

    pub fn effective_min_separation(&self) -> f64 {
        let (lo, hi) = MIN_SEPARATION_RANGE;
        self.min_hue_separation
            .unwrap_or(DEFAULT_MIN_HUE_SEPARATION)
            .clamp(lo, hi)
    }
}

/// Palette-wide aesthetic bias, each component in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mood {
    /// Higher is more pastel.
    pub softness: f64,
    /// Higher is darker.
    pub darkness: f64,
    /// Higher is more saturated and contrasting.
    pub punch: f64,
}

impl Mood {
    /// Draws a mood around the pastel and dark preferences.
    ///
    /// Consumes three draws from `rng`.
    pub fn pick(rng: &mut Xorshift64, prefer_pastel: bool, prefer_dark: bool) -> Self {
        let softness_base = if prefer_pastel { 0.7 } else { 0.4 };
        let darkness_base = if prefer_dark { 0.65 } else { 0.45 };
        let softness = clamp01(softness_base + rng.next_jitter() * 0.25);
        let darkness = clamp01(darkness_base + rng.next_jitter() * 0.25);
        let punch = clamp01(0.55 + rng.next_jitter() * 0.35);
        Self {
            softness,
            darkness,
            punch,
        }
    }

    /// Saturation and lightness every candidate is pulled toward.
    fn targets(&self) -> (f64, f64) {
        let soft_factor = if self.softness > 0.55 { 0.85 } else { 1.0 };
        let s = clamp01(lerp(0.28, 0.70, self.punch * 0.9) * soft_factor);
        let l = clamp01(lerp(0.32, 0.78, 1.0 - self.darkness * 0.8));
        (s, l)
    }
}

/// Candidate proposal strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    AnalogCluster,
    AccentContrast,
    PastelRamp,
    DeepRamp,
    QuirkyOffsets,
}

impl Mode {
    /// Selection weights for `mood`, in a fixed order.
    pub fn weights(mood: &Mood) -> [(Mode, f64); 5] {
        [
            (Self::AnalogCluster, 0.26 + (1.0 - mood.punch) * 0.10),
            (Self::AccentContrast, 0.24 + mood.punch * 0.15),
            (Self::PastelRamp, 0.20 + mood.softness * 0.20),
            (Self::DeepRamp, 0.16 + mood.darkness * 0.15),
            (Self::QuirkyOffsets, 0.19),
        ]
    }

    /// Weighted choice over [`Mode::weights`].
    pub fn pick(rng: &mut Xorshift64, mood: &Mood) -> Self {
        let weights = Self::weights(mood);
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let mut t = rng.next_f64() * total;
        for (mode, w) in weights {
            t -= w;
            if t <= 0.0 {
                return mode;
            }
        }
        Self::AnalogCluster
    }
}

/// Distinctness score a main-loop candidate must reach.
///
/// 2 for the cluster mode, 4 otherwise, and 1 once past 70% of the budget.
pub fn distinctness_threshold(mode: Mode, attempt: usize, max_attempts: usize) -> f64 {
    if attempt as f64 > max_attempts as f64 * 0.7 {
        1.0
    } else if mode == Mode::AnalogCluster {
        2.0
    } else {
        4.0
    }
}

/// Distinctness score a fallback candidate must reach: 4, dropping by one
/// every ten attempts, never below 1.
pub fn fallback_threshold(attempt: usize) -> f64 {
    4_usize.saturating_sub(attempt / 10).max(1) as f64
}

/// Whether constraints are waived: true past 80% of the budget.
pub fn force_accept(attempt: usize, max_attempts: usize) -> bool {
    attempt as f64 > max_attempts as f64 * 0.8
}

/// HSL point in unit scale.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tone {
    h: f64,
    s: f64,
    l: f64,
}

impl Tone {
    fn clamped(self) -> Self {
        Self {
            h: wrap_hue(self.h),
            s: clamp01(self.s),
            l: clamp01(self.l),
        }
    }

    fn to_hex(self) -> String {
        Color::from_hsl(Hsl::new(self.h, self.s * 100.0, self.l * 100.0)).hex
    }
}

/// Weighted HSL distance in roughly [0, 1.5].
fn tone_distance(a: &Tone, b: &Tone) -> f64 {
    let dh = hue_distance(a.h, b.h) / 180.0;
    let ds = (a.s - b.s).abs();
    let dl = (a.l - b.l).abs();
    (dh * dh * 0.9 + ds * ds * 0.6 + dl * dl * 0.8).sqrt()
}

/// A pool member; locked entries remember their canonical hex.
#[derive(Debug, Clone)]
struct Entry {
    tone: Tone,
    locked_hex: Option<String>,
}

impl Entry {
    fn locked(hex: String) -> Result<Self, PaletteError> {
        let hsl = rgb_to_hsl(parse_hex(&hex)?);
        Ok(Self {
            tone: Tone {
                h: hsl.h,
                s: hsl.s / 100.0,
                l: hsl.l / 100.0,
            },
            locked_hex: Some(hex),
        })
    }

    fn generated(tone: Tone) -> Self {
        Self {
            tone,
            locked_hex: None,
        }
    }

    fn hex(&self) -> String {
        self.locked_hex
            .clone()
            .unwrap_or_else(|| self.tone.to_hex())
    }
}

fn is_distinct(candidate: &Tone, pool: &[Entry], min_score: f64) -> bool {
    let nearest = pool
        .iter()
        .map(|e| tone_distance(candidate, &e.tone))
        .fold(f64::INFINITY, f64::min);
    nearest * 10.0 >= min_score
}

/// Occupied hues with a soft minimum separation.
#[derive(Debug, Clone)]
pub struct HueSet {
    min_separation: f64,
    hues: Vec<f64>,
}

impl HueSet {
    /// Empty set requiring `min_separation` degrees between hues.
    pub fn new(min_separation: f64) -> Self {
        Self {
            min_separation,
            hues: Vec::new(),
        }
    }

    /// Marks `h` as occupied.
    pub fn add(&mut self, h: f64) {
        self.hues.push(wrap_hue(h));
    }

    /// Whether `h` keeps the minimum separation from every occupied hue.
    pub fn can_place(&self, h: f64) -> bool {
        let h = wrap_hue(h);
        self.hues
            .iter()
            .all(|&x| hue_distance(x, h) >= self.min_separation)
    }
}

/// Van der Corput sequence in base 2.
pub fn van_der_corput(mut n: usize) -> f64 {
    let mut v = 0.0;
    let mut denom = 1.0;
    while n > 0 {
        denom *= 2.0;
        v += (n % 2) as f64 / denom;
        n /= 2;
    }
    v
}

/// Hops `h` by `scale` golden angles up to `tries` times until it fits.
fn golden_hops(h: &mut f64, hues: &HueSet, rng: &mut Xorshift64, tries: usize, scale: f64) -> bool {
    for _ in 0..tries {
        *h = wrap_hue(*h + GOLDEN_ANGLE * rng.next_sign() * scale);
        if hues.can_place(*h) {
            return true;
        }
    }
    false
}

fn propose(base: Tone, mode: Mode, rng: &mut Xorshift64, hues: &HueSet, mood: &Mood) -> Tone {
    let mut tone = match mode {
        Mode::AnalogCluster => {
            let span = 16.0 + rng.next_f64() * 18.0;
            Tone {
                h: base.h + rng.next_jitter() * span,
                s: base.s + rng.next_jitter() * (0.10 + mood.punch * 0.08),
                l: base.l + rng.next_jitter() * (0.10 + (1.0 - mood.darkness) * 0.06),
            }
        }
        Mode::AccentContrast => {
            let hop = GOLDEN_ANGLE * rng.next_sign();
            let bias = rng.next_f64() * 40.0 - 20.0;
            let s = lerp(base.s, 0.75 + 0.2 * rng.next_f64(), 0.6);
            let target_l = if rng.next_bool() {
                0.25 + 0.2 * rng.next_f64()
            } else {
                0.75 - 0.2 * rng.next_f64()
            };
            Tone {
                h: base.h + hop + bias,
                s,
                l: lerp(base.l, target_l, 0.55),
            }
        }
        Mode::PastelRamp => {
            let dir = rng.next_sign();
            let h = base.h + dir * (22.0 + rng.next_f64() * 28.0);
            let s = 0.25 + (1.0 - mood.punch) * 0.25 + rng.next_f64() * 0.15;
            let l = 0.70 + (1.0 - mood.darkness) * 0.15 + rng.next_jitter() * 0.06;
            Tone { h, s, l }
        }
        Mode::DeepRamp => {
            let hop = GOLDEN_ANGLE * rng.next_sign();
            let h = base.h + hop + rng.next_jitter() * 18.0;
            let s = 0.60 + mood.punch * 0.30 + rng.next_jitter() * 0.10;
            let l = 0.28 + mood.darkness * 0.25 + rng.next_jitter() * 0.06;
            Tone { h, s, l }
        }
        Mode::QuirkyOffsets => {
            let step1 = 95.0 + rng.next_f64() * 60.0;
            let step2 = 40.0 + rng.next_f64() * 50.0;
            let dir = rng.next_sign();
            let second = if rng.next_bool() { step2 } else { -step2 };
            let h = base.h + dir * step1 + second;
            let s = 0.45 + rng.next_jitter() * 0.25 + mood.punch * 0.15;
            let l_base = if rng.next_bool() { 0.68 } else { 0.36 };
            let l = l_base + rng.next_jitter() * 0.08;
            Tone { h, s, l }
        }
    }
    .clamped();

    if !hues.can_place(tone.h) {
        golden_hops(&mut tone.h, hues, rng, 3, 0.35);
    }
    tone
}

fn nudge_to_mood(tone: Tone, mood: &Mood, rng: &mut Xorshift64) -> Tone {
    let (target_s, target_l) = mood.targets();
    let s = lerp(tone.s, target_s, 0.18 + rng.next_f64() * 0.12) + rng.next_jitter() * 0.02;
    let l = lerp(tone.l, target_l, 0.18 + rng.next_f64() * 0.12) + rng.next_jitter() * 0.02;
    Tone {
        h: tone.h,
        s: clamp01(s),
        l: clamp01(l),
    }
}

/// Orders by hue sector with alternating lightness direction, then walks
/// nearest neighbours starting from the first element.
fn smart_order(entries: Vec<Entry>) -> Vec<Entry> {
    let mut sectors: Vec<Vec<Entry>> = vec![Vec::new(); SECTORS];
    for e in entries {
        let sector = (wrap_hue(e.tone.h) / 30.0) as usize % SECTORS;
        sectors[sector].push(e);
    }
    for (i, bucket) in sectors.iter_mut().enumerate() {
        bucket.sort_by(|a, b| a.tone.l.total_cmp(&b.tone.l));
        if i % 2 == 1 {
            bucket.reverse();
        }
    }
    greedy_reorder(sectors.into_iter().flatten().collect())
}

fn greedy_reorder(linear: Vec<Entry>) -> Vec<Entry> {
    let n = linear.len();
    if n <= 2 {
        return linear;
    }
    let mut order = Vec::with_capacity(n);
    let mut used = vec![false; n];
    let mut current = 0;
    for _ in 0..n {
        used[current] = true;
        order.push(current);
        let next = (0..n)
            .filter(|&j| !used[j])
            .min_by(|&a, &b| {
                let da = tone_distance(&linear[current].tone, &linear[a].tone);
                let db = tone_distance(&linear[current].tone, &linear[b].tone);
                da.total_cmp(&db)
            });
        match next {
            Some(j) => current = j,
            None => break,
        }
    }
    let mut slots: Vec<Option<Entry>> = linear.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

fn unique_keep_order(hexes: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(hexes.len());
    for hex in hexes {
        if !out.contains(&hex) {
            out.push(hex);
        }
    }
    out
}

fn put_at_ends(hexes: Vec<String>, low: &str, high: &str) -> Vec<String> {
    let rest = hexes.into_iter().filter(|h| h != low && h != high).collect();
    let mut out = vec![low.to_string()];
    out.extend(unique_keep_order(rest));
    if high != low {
        out.push(high.to_string());
    }
    out
}

/// Normalizes and deduplicates locked hexes, keeping first occurrences.
fn dedupe_locks<S: AsRef<str>>(locked: &[S]) -> Result<Vec<String>, PaletteError> {
    let mut out: Vec<String> = Vec::with_capacity(locked.len());
    for hex in locked {
        let normalized = normalize_hex(hex.as_ref())?;
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    Ok(out)
}

/// Generates a mood-driven palette seeded from `options` or the locks.
pub fn generate_mood_palette<S: AsRef<str>>(
    locked: &[S],
    options: &MoodOptions,
) -> Result<Vec<String>, PaletteError> {
    let mut rng = Xorshift64::new(options.effective_seed(locked));
    generate_mood_palette_with_rng(locked, options, &mut rng)
}

/// Generates a mood-driven palette drawing from `rng`.
///
/// Returns exactly `max(options.size, locked.len())` uppercase hex strings.
/// Locked colors keep their normalized hex. Fails only when a locked color
/// is not a valid hex string.
pub fn generate_mood_palette_with_rng<S: AsRef<str>>(
    locked: &[S],
    options: &MoodOptions,
    rng: &mut Xorshift64,
) -> Result<Vec<String>, PaletteError> {
    let started = Instant::now();
    let size = options.size.max(locked.len());
    let lock_hexes = dedupe_locks(locked)?;
    if size == 0 {
        return Ok(Vec::new());
    }

    let locks = lock_hexes
        .into_iter()
        .map(Entry::locked)
        .collect::<Result<Vec<_>, _>>()?;
    let mut pool = locks.clone();
    let mood = Mood::pick(rng, options.prefer_pastel, options.prefer_dark);
    tracing::debug!(?mood, size, locks = locks.len(), "picked mood");

    if options.lock_at_ends && pool.len() >= 2 {
        pool.sort_by(|a, b| a.tone.l.total_cmp(&b.tone.l));
    }

    let mut hues = HueSet::new(options.effective_min_separation());
    for e in &pool {
        hues.add(e.tone.h);
    }

    if pool.is_empty() {
        let tone = Tone {
            h: rng.next_f64() * 360.0,
            s: 0.55 + rng.next_jitter() * 0.2,
            l: 0.55 + rng.next_jitter() * 0.2,
        }
        .clamped();
        hues.add(tone.h);
        pool.push(Entry::generated(tone));
    }

    sample(&mut pool, &mut hues, size, &mood, rng);
    fallback_fill(&mut pool, size, rng);
    forced_fill(&mut pool, size, rng);

    let ordered = smart_order(pool);
    let tones: Vec<Tone> = ordered.iter().map(|e| e.tone).collect();
    let hexes: Vec<String> = ordered.iter().map(Entry::hex).collect();

    let ends = if options.lock_at_ends && locks.len() >= 2 {
        let mut by_lightness: Vec<&Entry> = locks.iter().collect();
        by_lightness.sort_by(|a, b| a.tone.l.total_cmp(&b.tone.l));
        match (by_lightness.first(), by_lightness.last()) {
            (Some(lo), Some(hi)) => Some((lo.hex(), hi.hex())),
            _ => None,
        }
    } else {
        None
    };

    let mut result = match &ends {
        Some((lo, hi)) => put_at_ends(hexes, lo, hi),
        None => unique_keep_order(hexes),
    };
    top_up(&mut result, &tones, size, ends.is_some(), rng);
    result.truncate(size);

    tracing::debug!(
        colors = result.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "mood palette generated"
    );
    Ok(result)
}

/// Main sampling loop.
fn sample(pool: &mut Vec<Entry>, hues: &mut HueSet, size: usize, mood: &Mood, rng: &mut Xorshift64) {
    let max_attempts = (size * 12).min(100);
    let mut attempt = 0;
    while pool.len() < size && attempt < max_attempts {
        attempt += 1;
        let idx = (van_der_corput(attempt) * pool.len() as f64) as usize;
        let base = pool[idx.min(pool.len() - 1)].tone;
        let mode = Mode::pick(rng, mood);
        let candidate = propose(base, mode, rng, hues, mood);
        let mut candidate = nudge_to_mood(candidate, mood, rng);

        let threshold = distinctness_threshold(mode, attempt, max_attempts);
        if !is_distinct(&candidate, pool, threshold) {
            continue;
        }

        if mode != Mode::AnalogCluster
            && !hues.can_place(candidate.h)
            && !golden_hops(&mut candidate.h, hues, rng, 6, 1.0)
        {
            if !force_accept(attempt, max_attempts) {
                continue;
            }
            tracing::debug!(attempt, ?mode, "forcing crowded hue");
        }
        hues.add(candidate.h);
        pool.push(Entry::generated(candidate));
    }
}

/// Jitters one channel of a random pool member in rotation.
fn fallback_fill(pool: &mut Vec<Entry>, size: usize, rng: &mut Xorshift64) {
    let max_attempts = 30.max(size * 3);
    let mut attempt = 0;
    while pool.len() < size && attempt < max_attempts {
        attempt += 1;
        let base = pool[rng.next_usize(pool.len())].tone;
        let tone = match attempt % 3 {
            0 => Tone {
                l: clamp01(base.l + rng.next_jitter() * 0.3),
                ..base
            },
            1 => Tone {
                s: clamp01(base.s + rng.next_jitter() * 0.3),
                ..base
            },
            _ => Tone {
                h: wrap_hue(base.h + rng.next_jitter() * 60.0),
                ..base
            },
        };
        if is_distinct(&tone, pool, fallback_threshold(attempt)) {
            pool.push(Entry::generated(tone));
        } else if force_accept(attempt, max_attempts) {
            tracing::debug!(attempt, "forcing fallback color");
            pool.push(Entry::generated(tone));
        }
    }
}

fn jittered(base: Tone, rng: &mut Xorshift64) -> Tone {
    Tone {
        h: base.h + rng.next_jitter() * 120.0,
        s: base.s + rng.next_jitter() * 0.4,
        l: base.l + rng.next_jitter() * 0.4,
    }
    .clamped()
}

fn forced_fill(pool: &mut Vec<Entry>, size: usize, rng: &mut Xorshift64) {
    while pool.len() < size {
        let base = pool[rng.next_usize(pool.len())].tone;
        pool.push(Entry::generated(jittered(base, rng)));
    }
}

/// Restores the exact size after deduplication shrank the palette.
///
/// Tries a bounded number of jittered colors that are not yet present, then
/// accepts duplicates. With `keep_last` new colors go before the final element.
fn top_up(result: &mut Vec<String>, tones: &[Tone], size: usize, keep_last: bool, rng: &mut Xorshift64) {
    if tones.is_empty() {
        return;
    }
    let max_attempts = size * 20;
    let mut attempt = 0;
    while result.len() < size {
        attempt += 1;
        let base = tones[rng.next_usize(tones.len())];
        let hex = jittered(base, rng).to_hex();
        if result.contains(&hex) && attempt <= max_attempts {
            continue;
        }
        if keep_last && !result.is_empty() {
            let at = result.len() - 1;
            result.insert(at, hex);
        } else {
            result.push(hex);
        }
    }
}

fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
