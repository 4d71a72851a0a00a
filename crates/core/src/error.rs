//! Error types for the huewheel core.

use thiserror::Error;

/// Errors produced by palette operations.
///
/// The color codec itself is fail-soft (malformed hex decodes to black), so
/// these errors only surface from strict boundary validation and from the
/// mood-driven generator, whose failures the series orchestrator recovers.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// A color string could not be parsed as `#rrggbb` (or `#rgb` where allowed).
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette request was structurally unusable (no base colors, zero count).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An algorithm name did not match any known algorithm.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A share query string could not be decoded.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },
}
