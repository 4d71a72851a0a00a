#![deny(unsafe_code)]
//! Core palette engine for huewheel.
//!
//! Provides the hex/RGB/HSL codec (`Color`), the `Xorshift64` PRNG and unit
//! hash, the six template harmonies, the three auto generators (lock-aware,
//! mood-driven, strategy sampler), the multi-series orchestrator, and the
//! `PaletteRequest` model with its query-string encoding. Everything here is
//! pure and deterministic.

pub mod algorithm;
pub mod color;
pub mod error;
pub mod harmony;
pub mod lock_aware;
pub mod mood;
pub mod params;
pub mod prng;
pub mod request;
pub mod series;
pub mod strategy;

pub use algorithm::Algorithm;
pub use color::{random_color, Color, Hsl, Rgb};
pub use error::PaletteError;
pub use lock_aware::{
    generate_auto_palette_with_locks, generate_auto_palette_with_shown_locks, LockedColor,
};
pub use mood::{generate_mood_palette, generate_mood_palette_with_rng, MoodOptions};
pub use params::{HslDelta, HslShift, MoodSeriesOptions};
pub use prng::Xorshift64;
pub use request::{LockMap, PaletteRequest};
pub use series::{
    generate, generate_mood_series, generate_multiple_palette_series, generate_palette,
    generate_strategy_series, PaletteSeries,
};
pub use strategy::generate_strategy_palette;
