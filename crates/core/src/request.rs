//! Reproducible palette request.
//!
//! A [`PaletteRequest`] captures everything needed to recreate a set of
//! palettes: base colors, count, algorithm, global shift, and for the auto
//! algorithms the spread, lock map, seed and mood options. It round-trips
//! through JSON and through a plain-text query string so a palette can be
//! shared and replayed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::algorithm::Algorithm;
use crate::color::normalize_hex;
use crate::error::PaletteError;
use crate::lock_aware::LockedColor;
use crate::params::{param_bool, param_f64, param_string, param_usize, HslDelta, HslShift, MoodSeriesOptions};
use crate::series::PaletteSeries;

/// Palette size used when a request does not say.
pub const DEFAULT_COUNT: usize = 5;

/// Series index → color index → locked.
pub type LockMap = BTreeMap<usize, BTreeMap<usize, bool>>;

/// Reproducible palette request.
///
/// Two identical requests with the same previous series produce identical
/// palettes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteRequest {
    pub base_colors: Vec<String>,
    pub count: usize,
    pub algorithm: Algorithm,
    #[serde(default)]
    pub shift: HslShift,
    #[serde(default)]
    pub delta: HslDelta,
    #[serde(default)]
    pub locks: LockMap,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub mood: MoodSeriesOptions,
}

impl Default for PaletteRequest {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_COUNT, Algorithm::Complementary)
    }
}

impl PaletteRequest {
    /// Creates a request with zero shift, default spread, no locks and no seed.
    pub fn new(base_colors: Vec<String>, count: usize, algorithm: Algorithm) -> Self {
        Self {
            base_colors,
            count,
            algorithm,
            shift: HslShift::default(),
            delta: HslDelta::default(),
            locks: LockMap::new(),
            seed: None,
            mood: MoodSeriesOptions::default(),
        }
    }

    /// Checks base colors, count and shift ranges.
    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.base_colors.is_empty() {
            return Err(PaletteError::InvalidRequest(
                "at least one base color is required".into(),
            ));
        }
        for hex in &self.base_colors {
            normalize_hex(hex)?;
        }
        if self.count == 0 {
            return Err(PaletteError::InvalidRequest("count must be positive".into()));
        }
        if self.shift.clamped() != self.shift {
            return Err(PaletteError::InvalidRequest(format!(
                "shift out of range: hue {}, saturation {}, lightness {}",
                self.shift.hue, self.shift.saturation, self.shift.lightness
            )));
        }
        Ok(())
    }

    /// Replaces every base color by its canonical `#RRGGBB` form.
    pub fn normalized(mut self) -> Result<Self, PaletteError> {
        self.base_colors = self
            .base_colors
            .iter()
            .map(|hex| normalize_hex(hex))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Options for the mood series, falling back to the request seed.
    pub fn mood_options(&self) -> MoodSeriesOptions {
        MoodSeriesOptions {
            seed: self.mood.seed.or(self.seed),
            ..self.mood
        }
    }

    /// Sets or clears the lock of color `index` in series `series`.
    pub fn set_lock(&mut self, series: usize, index: usize, locked: bool) {
        self.locks.entry(series).or_default().insert(index, locked);
    }

    /// Whether color `index` of series `series` is locked.
    pub fn is_locked(&self, series: usize, index: usize) -> bool {
        self.locks
            .get(&series)
            .and_then(|m| m.get(&index))
            .copied()
            .unwrap_or(false)
    }

    /// Locked color indices of `series`, ascending.
    pub fn locked_indices(&self, series: usize) -> Vec<usize> {
        self.locks
            .get(&series)
            .map(|m| m.iter().filter(|&(_, &on)| on).map(|(&i, _)| i).collect())
            .unwrap_or_default()
    }

    /// Whether `series` has a lock beyond the base position.
    pub fn has_locks(&self, series: usize) -> bool {
        self.locked_indices(series).iter().any(|&i| i > 0)
    }

    /// Locked colors of `series` read from the previous result.
    ///
    /// Indices the previous series does not cover are skipped.
    pub fn locked_colors(&self, series: usize, previous: Option<&[PaletteSeries]>) -> Vec<LockedColor> {
        let Some(prev) = previous.and_then(|p| p.get(series)) else {
            return Vec::new();
        };
        self.locked_indices(series)
            .into_iter()
            .filter_map(|i| prev.palette.get(i).map(|c| LockedColor::new(c.clone(), i)))
            .collect()
    }

    /// Encodes the request as a query string (without a leading `?`).
    ///
    /// Auto-only keys are written only for auto algorithms.
    pub fn to_query(&self) -> String {
        let colors = match self.base_colors.as_slice() {
            [single] => single.clone(),
            many => Value::from(many.to_vec()).to_string(),
        };
        let mut pairs: Vec<(&str, String)> = vec![
            ("colors", colors),
            ("count", self.count.to_string()),
            ("algorithm", self.algorithm.name().to_string()),
            ("hue", self.shift.hue.to_string()),
            ("saturation", self.shift.saturation.to_string()),
            ("lightness", self.shift.lightness.to_string()),
        ];

        if self.algorithm.is_auto() {
            pairs.push(("hueDelta", self.delta.hue.to_string()));
            pairs.push(("saturationDelta", self.delta.saturation.to_string()));
            pairs.push(("lightnessDelta", self.delta.lightness.to_string()));
            if let Some(seed) = self.seed {
                pairs.push(("seed", seed.to_string()));
            }
            if !self.locks.is_empty() {
                pairs.push(("locks", locks_to_json(&self.locks).to_string()));
            }
            if let Some(seed) = self.mood.seed {
                pairs.push(("moodSeed", seed.to_string()));
            }
            if let Some(sep) = self.mood.min_hue_separation {
                pairs.push(("minHueSeparation", sep.to_string()));
            }
            for (key, on) in [
                ("pastel", self.mood.prefer_pastel),
                ("dark", self.mood.prefer_dark),
                ("lockAtEnds", self.mood.lock_at_ends),
            ] {
                if on {
                    pairs.push((key, "true".to_string()));
                }
            }
        }

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decodes a query string produced by [`to_query`](Self::to_query).
    ///
    /// Missing or unparseable numeric keys take their defaults. Malformed
    /// escapes, color lists or lock maps and unknown algorithms are errors.
    /// The legacy `baseColor` key is accepted in place of `colors`.
    pub fn from_query(query: &str) -> Result<Self, PaletteError> {
        let raw = decode_pairs(query)?;
        let params = Value::Object(
            raw.iter()
                .map(|(k, v)| {
                    let value = serde_json::from_str(v).unwrap_or_else(|_| Value::String(v.clone()));
                    (k.clone(), value)
                })
                .collect(),
        );

        let colors = raw
            .get("colors")
            .or_else(|| raw.get("baseColor"))
            .map(|v| parse_colors(v))
            .transpose()?
            .unwrap_or_default();
        let algorithm: Algorithm = param_string(&params, "algorithm", Algorithm::Complementary.name()).parse()?;

        let mut request = Self::new(colors, param_usize(&params, "count", DEFAULT_COUNT), algorithm);
        request.shift = HslShift::new(
            param_f64(&params, "hue", 0.0),
            param_f64(&params, "saturation", 0.0),
            param_f64(&params, "lightness", 0.0),
        );
        request.delta = HslDelta::from_json(&params);
        request.seed = params.get("seed").and_then(Value::as_u64);
        if let Some(locks) = raw.get("locks") {
            request.locks = serde_json::from_str(locks)
                .map_err(|e| PaletteError::InvalidQuery(format!("locks: {e}")))?;
        }
        request.mood = MoodSeriesOptions {
            min_hue_separation: params.get("minHueSeparation").and_then(Value::as_f64),
            prefer_pastel: param_bool(&params, "pastel", false),
            prefer_dark: param_bool(&params, "dark", false),
            lock_at_ends: param_bool(&params, "lockAtEnds", false),
            seed: params.get("moodSeed").and_then(Value::as_u64),
        };
        Ok(request)
    }
}

fn locks_to_json(locks: &LockMap) -> Value {
    Value::Object(
        locks
            .iter()
            .map(|(series, m)| {
                let inner = m
                    .iter()
                    .map(|(i, on)| (i.to_string(), Value::Bool(*on)))
                    .collect();
                (series.to_string(), Value::Object(inner))
            })
            .collect(),
    )
}

/// A JSON array of strings, or a comma-separated list.
fn parse_colors(raw: &str) -> Result<Vec<String>, PaletteError> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw).map_err(|e| PaletteError::InvalidQuery(format!("colors: {e}")));
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}

fn decode_pairs(query: &str) -> Result<BTreeMap<String, String>, PaletteError> {
    query
        .trim()
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((percent_decode(k)?, percent_decode(v)?))
        })
        .collect()
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

fn percent_decode(s: &str) -> Result<String, PaletteError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| PaletteError::InvalidQuery(format!("bad escape in '{s}'")))?;
                out.push(hex);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).map_err(|e| PaletteError::InvalidQuery(e.to_string()))
}
