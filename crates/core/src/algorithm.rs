//! Palette algorithm selector.

use crate::error::PaletteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hard ceiling on the mood-driven generator's palette size.
pub const MOOD_MAX_COLORS: usize = 10;

/// All palette generation algorithms.
///
/// The six template algorithms rotate the base hue by fixed angles. The three
/// auto algorithms synthesize palettes with seeded randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Complementary,
    Triadic,
    Analogous,
    Monochromatic,
    SplitComplementary,
    Tetradic,
    /// Lock-aware harmony sampling, aligned across series.
    #[serde(alias = "auto-cursor")]
    AutoLockAware,
    /// Mood-driven generative sampler with hue spacing.
    #[serde(alias = "auto-gpt5")]
    AutoMoodDriven,
    /// Single-strategy sampler that keeps its input colors in front.
    #[serde(alias = "auto-sonnet4")]
    AutoStrategy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Self::Complementary,
        Self::Triadic,
        Self::Analogous,
        Self::Monochromatic,
        Self::SplitComplementary,
        Self::Tetradic,
        Self::AutoLockAware,
        Self::AutoMoodDriven,
        Self::AutoStrategy,
    ];

    /// Wire name used in query strings and JSON.
    pub fn name(self) -> &'static str {
        match self {
            Self::Complementary => "complementary",
            Self::Triadic => "triadic",
            Self::Analogous => "analogous",
            Self::Monochromatic => "monochromatic",
            Self::SplitComplementary => "split-complementary",
            Self::Tetradic => "tetradic",
            Self::AutoLockAware => "auto-lock-aware",
            Self::AutoMoodDriven => "auto-mood-driven",
            Self::AutoStrategy => "auto-strategy",
        }
    }

    /// Number of colors the template generator emits at most, or `None`
    /// when the algorithm produces any requested count.
    pub fn max_colors(self) -> Option<usize> {
        match self {
            Self::Complementary => Some(2),
            Self::Triadic | Self::SplitComplementary => Some(3),
            Self::Tetradic => Some(4),
            Self::AutoMoodDriven => Some(MOOD_MAX_COLORS),
            _ => None,
        }
    }

    /// Count a UI should offer as the upper bound for this algorithm.
    pub fn suggested_max(self) -> usize {
        match self {
            Self::Analogous | Self::Monochromatic => 12,
            Self::AutoLockAware | Self::AutoStrategy => 20,
            other => other.max_colors().unwrap_or(12),
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(
            self,
            Self::AutoLockAware | Self::AutoMoodDriven | Self::AutoStrategy
        )
    }

    /// Fixed hue offsets of a template algorithm, in emission order.
    ///
    /// Analogous and monochromatic have no fixed list and return an empty slice.
    pub fn hue_offsets(self) -> &'static [f64] {
        match self {
            Self::Complementary => &[0.0, 180.0],
            Self::Triadic => &[0.0, 120.0, 240.0],
            Self::SplitComplementary => &[0.0, 150.0, 210.0],
            Self::Tetradic => &[0.0, 90.0, 180.0, 270.0],
            _ => &[],
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complementary" => Ok(Self::Complementary),
            "triadic" => Ok(Self::Triadic),
            "analogous" => Ok(Self::Analogous),
            "monochromatic" => Ok(Self::Monochromatic),
            "split-complementary" => Ok(Self::SplitComplementary),
            "tetradic" => Ok(Self::Tetradic),
            "auto-lock-aware" | "auto-cursor" => Ok(Self::AutoLockAware),
            "auto-mood-driven" | "auto-gpt5" => Ok(Self::AutoMoodDriven),
            "auto-strategy" | "auto-sonnet4" => Ok(Self::AutoStrategy),
            _ => Err(PaletteError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trips_through_from_str() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.name().parse::<Algorithm>().unwrap(), algo);
        }
    }

    #[test]
    fn legacy_aliases_parse() {
        assert_eq!(
            "auto-cursor".parse::<Algorithm>().unwrap(),
            Algorithm::AutoLockAware
        );
        assert_eq!(
            "auto-gpt5".parse::<Algorithm>().unwrap(),
            Algorithm::AutoMoodDriven
        );
        assert_eq!(
            "AUTO-SONNET4".parse::<Algorithm>().unwrap(),
            Algorithm::AutoStrategy
        );
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "pentadic".parse::<Algorithm>().unwrap_err();
        assert!(err.to_string().contains("pentadic"));
    }

    #[test]
    fn caps_match_template_offsets() {
        for algo in [
            Algorithm::Complementary,
            Algorithm::Triadic,
            Algorithm::SplitComplementary,
            Algorithm::Tetradic,
        ] {
            assert_eq!(algo.max_colors(), Some(algo.hue_offsets().len()));
        }
        assert_eq!(Algorithm::Analogous.max_colors(), None);
        assert_eq!(Algorithm::AutoMoodDriven.max_colors(), Some(10));
    }

    #[test]
    fn suggested_max_values() {
        assert_eq!(Algorithm::Monochromatic.suggested_max(), 12);
        assert_eq!(Algorithm::AutoLockAware.suggested_max(), 20);
        assert_eq!(Algorithm::AutoMoodDriven.suggested_max(), 10);
        assert_eq!(Algorithm::Tetradic.suggested_max(), 4);
    }

    #[test]
    fn serde_uses_kebab_case_and_accepts_aliases() {
        let json = serde_json::to_string(&Algorithm::SplitComplementary).unwrap();
        assert_eq!(json, "\"split-complementary\"");
        let a: Algorithm = serde_json::from_str("\"auto-gpt5\"").unwrap();
        assert_eq!(a, Algorithm::AutoMoodDriven);
    }

    #[test]
    fn only_auto_variants_are_auto() {
        let autos: Vec<_> = Algorithm::ALL.iter().filter(|a| a.is_auto()).collect();
        assert_eq!(autos.len(), 3);
    }
}
