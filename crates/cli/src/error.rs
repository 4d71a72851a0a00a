//! CLI errors and their exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: palette error (bad color, unknown algorithm, invalid request or query)
//! - 11: I/O error (reading a previous-series file)
//! - 12: input error (bad JSON in --locks, --options or --previous)
//! - 13: serialization error

use huewheel_core::PaletteError;
use std::fmt;
use std::path::PathBuf;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// Rejected by the palette core: malformed base color, unknown
    /// algorithm, out-of-range shift or an undecodable share query.
    Palette(PaletteError),
    /// The `--previous` file could not be read.
    Io { path: PathBuf, message: String },
    /// A JSON-valued flag did not parse; `flag` names it, e.g. `--locks`.
    Input { flag: &'static str, message: String },
    /// Output could not be encoded as JSON.
    Serialization(String),
}

impl CliError {
    /// Wraps a JSON parse failure of the value passed to `flag`.
    pub fn input(flag: &'static str, err: serde_json::Error) -> Self {
        CliError::Input {
            flag,
            message: err.to_string(),
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Palette(_) => 10,
            CliError::Io { .. } => 11,
            CliError::Input { .. } => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// The `--json` error report written to stderr.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "exit_code": self.exit_code(),
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Palette(e) => write!(f, "{e}"),
            CliError::Io { path, message } => {
                write!(f, "cannot read {}: {message}", path.display())
            }
            CliError::Input { flag, message } => write!(f, "invalid {flag} JSON: {message}"),
            CliError::Serialization(msg) => write!(f, "cannot encode output: {msg}"),
        }
    }
}

impl From<PaletteError> for CliError {
    fn from(e: PaletteError) -> Self {
        CliError::Palette(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_json() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{\"0\":").unwrap_err()
    }

    #[test]
    fn unknown_algorithm_exits_with_10() {
        let err = CliError::from(PaletteError::UnknownAlgorithm("pentadic".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("pentadic"));
    }

    #[test]
    fn unreadable_previous_file_names_the_path() {
        let err = CliError::Io {
            path: PathBuf::from("palettes/previous.json"),
            message: "not found".into(),
        };
        assert_eq!(err.exit_code(), 11);
        assert_eq!(
            err.to_string(),
            "cannot read palettes/previous.json: not found"
        );
    }

    #[test]
    fn bad_locks_json_names_the_flag() {
        let err = CliError::input("--locks", bad_json());
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().starts_with("invalid --locks JSON:"));
    }

    #[test]
    fn serde_errors_route_to_serialization() {
        let err = CliError::from(bad_json());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn json_report_carries_message_and_code() {
        let err = CliError::from(PaletteError::InvalidColor("#GGGGGG".into()));
        let report = err.to_json();
        assert_eq!(report["exit_code"], 10);
        assert!(report["error"].as_str().unwrap().contains("#GGGGGG"));
    }
}
