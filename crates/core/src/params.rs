//! Generation parameters and JSON helpers for reading them.
//!
//! [`HslShift`] is the global shift applied to every emitted color,
//! [`HslDelta`] the spread used by the lock-aware generator and
//! [`MoodSeriesOptions`] the knobs of the mood-driven series wrapper.
//!
//! The `param_*` helpers take a JSON value, a key name, and a default. If the
//! key is missing or the value is not the expected type, the default is
//! returned. [`MoodSeriesOptions::from_json`] is the strict variant and
//! reports a type mismatch instead.

use crate::error::PaletteError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default minimum hue separation (degrees) for the mood-driven generator.
pub const DEFAULT_MIN_HUE_SEPARATION: f64 = 22.0;

/// Global HSL shift: hue in degrees, saturation and lightness in percent points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HslShift {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl HslShift {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Clamps the shift to the documented ranges: hue [-180, 180],
    /// saturation and lightness [-100, 100].
    pub fn clamped(self) -> Self {
        Self {
            hue: self.hue.clamp(-180.0, 180.0),
            saturation: self.saturation.clamp(-100.0, 100.0),
            lightness: self.lightness.clamp(-100.0, 100.0),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.hue == 0.0 && self.saturation == 0.0 && self.lightness == 0.0
    }
}

/// Spread of the random perturbations used by the lock-aware generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslDelta {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Default for HslDelta {
    fn default() -> Self {
        Self {
            hue: 30.0,
            saturation: 20.0,
            lightness: 20.0,
        }
    }
}

impl HslDelta {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Reads `hueDelta`, `saturationDelta` and `lightnessDelta`, falling back
    /// to the defaults.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            hue: param_f64(params, "hueDelta", d.hue),
            saturation: param_f64(params, "saturationDelta", d.saturation),
            lightness: param_f64(params, "lightnessDelta", d.lightness),
        }
    }
}

/// Options for the mood-driven series wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSeriesOptions {
    /// Soft minimum hue separation in degrees. `None` uses 22.
    pub min_hue_separation: Option<f64>,
    pub prefer_pastel: bool,
    pub prefer_dark: bool,
    /// Force the darkest and lightest locked colors to the palette ends.
    pub lock_at_ends: bool,
    pub seed: Option<u64>,
}

impl MoodSeriesOptions {
    /// Parses options from a JSON object with camelCase keys.
    ///
    /// Missing keys take defaults; present keys of the wrong type are an error.
    pub fn from_json(params: &Value) -> Result<Self, PaletteError> {
        expect_type(params, "minHueSeparation", "number", Value::is_number)?;
        expect_type(params, "preferPastel", "bool", Value::is_boolean)?;
        expect_type(params, "preferDark", "bool", Value::is_boolean)?;
        expect_type(params, "lockAtEnds", "bool", Value::is_boolean)?;
        expect_type(params, "seed", "unsigned integer", Value::is_u64)?;

        Ok(Self {
            min_hue_separation: params.get("minHueSeparation").and_then(Value::as_f64),
            prefer_pastel: param_bool(params, "preferPastel", false),
            prefer_dark: param_bool(params, "preferDark", false),
            lock_at_ends: param_bool(params, "lockAtEnds", false),
            seed: params.get("seed").and_then(Value::as_u64),
        })
    }
}

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// Accepts both JSON numbers (including integers) and converts them to f64.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

fn expect_type(
    params: &Value,
    name: &str,
    expected: &str,
    check: fn(&Value) -> bool,
) -> Result<(), PaletteError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(()),
        Some(v) if check(v) => Ok(()),
        Some(v) => Err(PaletteError::ParamTypeMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            got: json_type_name(v).to_string(),
        }),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- HslShift / HslDelta --

    #[test]
    fn shift_clamps_to_documented_ranges() {
        let s = HslShift::new(270.0, -150.0, 120.0).clamped();
        assert_eq!(s, HslShift::new(180.0, -100.0, 100.0));
    }

    #[test]
    fn default_shift_is_zero() {
        assert!(HslShift::default().is_zero());
        assert!(!HslShift::new(0.0, 1.0, 0.0).is_zero());
    }

    #[test]
    fn delta_defaults_are_30_20_20() {
        assert_eq!(HslDelta::default(), HslDelta::new(30.0, 20.0, 20.0));
    }

    #[test]
    fn delta_from_json_reads_camel_case_keys() {
        let d = HslDelta::from_json(&json!({"hueDelta": 90, "lightnessDelta": 5.5}));
        assert_eq!(d, HslDelta::new(90.0, 20.0, 5.5));
    }

    // -- MoodSeriesOptions --

    #[test]
    fn mood_options_from_empty_object_are_defaults() {
        let o = MoodSeriesOptions::from_json(&json!({})).unwrap();
        assert_eq!(o, MoodSeriesOptions::default());
    }

    #[test]
    fn mood_options_reads_all_fields() {
        let o = MoodSeriesOptions::from_json(&json!({
            "minHueSeparation": 30,
            "preferPastel": true,
            "preferDark": false,
            "lockAtEnds": true,
            "seed": 42
        }))
        .unwrap();
        assert_eq!(o.min_hue_separation, Some(30.0));
        assert!(o.prefer_pastel);
        assert!(!o.prefer_dark);
        assert!(o.lock_at_ends);
        assert_eq!(o.seed, Some(42));
    }

    #[test]
    fn mood_options_rejects_wrong_type() {
        let err = MoodSeriesOptions::from_json(&json!({"preferPastel": "yes"})).unwrap_err();
        match err {
            PaletteError::ParamTypeMismatch {
                name,
                expected,
                got,
            } => {
                assert_eq!(name, "preferPastel");
                assert_eq!(expected, "bool");
                assert_eq!(got, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mood_options_rejects_negative_seed() {
        assert!(MoodSeriesOptions::from_json(&json!({"seed": -1})).is_err());
    }

    #[test]
    fn mood_options_treats_null_as_missing() {
        let o = MoodSeriesOptions::from_json(&json!({"seed": null})).unwrap();
        assert_eq!(o.seed, None);
    }

    #[test]
    fn mood_options_serde_uses_camel_case() {
        let o = MoodSeriesOptions {
            lock_at_ends: true,
            ..Default::default()
        };
        let v = serde_json::to_value(o).unwrap();
        assert_eq!(v["lockAtEnds"], true);
    }

    // -- param helpers --

    #[test]
    fn param_f64_extracts_integer_as_float() {
        let params = json!({"count": 10});
        assert!((param_f64(&params, "count", 0.0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_wrong_type() {
        let params = json!({"speed": "fast"});
        assert!((param_f64(&params, "speed", 1.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "speed", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_usize_returns_default_for_negative_integer() {
        let params = json!({"count": -1});
        assert_eq!(param_usize(&params, "count", 5), 5);
    }

    #[test]
    fn param_usize_extracts_existing_integer() {
        assert_eq!(param_usize(&json!({"count": 8}), "count", 0), 8);
    }

    #[test]
    fn param_bool_returns_default_for_wrong_type() {
        let params = json!({"enabled": 1});
        assert!(!param_bool(&params, "enabled", false));
    }

    #[test]
    fn param_string_extracts_existing_string() {
        let params = json!({"algorithm": "triadic"});
        assert_eq!(param_string(&params, "algorithm", "complementary"), "triadic");
    }

    #[test]
    fn param_string_returns_default_when_key_missing() {
        assert_eq!(param_string(&json!({}), "algorithm", "tetradic"), "tetradic");
    }
}
