#![deny(unsafe_code)]
//! CLI binary for the huewheel palette generator.
//!
//! Subcommands:
//! - `generate`: build palettes from base colors and print them
//! - `replay <query>`: regenerate palettes from a share query
//! - `random`: print a random base color
//! - `list`: print available algorithms and their caps

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use huewheel_core::{
    random_color, Algorithm, HslDelta, HslShift, LockMap, MoodSeriesOptions, PaletteRequest,
    PaletteSeries, Xorshift64,
};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huewheel", about = "Color palette generator CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log generator decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one palette per base color.
    Generate {
        /// Base color, repeatable (e.g. -c "#3182CE" -c f59e0b).
        #[arg(short, long = "color", required = true)]
        colors: Vec<String>,

        /// Number of colors per palette.
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Algorithm name (see `huewheel list`).
        #[arg(short, long, default_value = "complementary")]
        algorithm: String,

        /// Global hue shift in degrees [-180, 180].
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        hue: f64,

        /// Global saturation shift [-100, 100].
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        saturation: f64,

        /// Global lightness shift [-100, 100].
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lightness: f64,

        /// Hue spread of the lock-aware generator.
        #[arg(long, default_value_t = 30.0)]
        hue_delta: f64,

        /// Saturation spread of the lock-aware generator.
        #[arg(long, default_value_t = 20.0)]
        saturation_delta: f64,

        /// Lightness spread of the lock-aware generator.
        #[arg(long, default_value_t = 20.0)]
        lightness_delta: f64,

        /// PRNG seed for deterministic output.
        #[arg(long)]
        seed: Option<u64>,

        /// Lock map as JSON, e.g. '{"0":{"2":true}}'.
        #[arg(long)]
        locks: Option<String>,

        /// JSON file with the previous series, read for locked colors.
        #[arg(long)]
        previous: Option<PathBuf>,

        /// Mood options as JSON (minHueSeparation, preferPastel, preferDark, lockAtEnds, seed).
        #[arg(long, default_value = "{}")]
        options: String,

        /// Also print the share query string.
        #[arg(long)]
        share: bool,
    },
    /// Regenerate palettes from a share query string.
    Replay {
        /// Query string, with or without the leading '?'.
        query: String,
    },
    /// Print a random base color.
    Random {
        /// PRNG seed; derived from the clock when omitted.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List available algorithms.
    List,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_previous(path: &Path) -> Result<Vec<PaletteSeries>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let previous: Vec<PaletteSeries> =
        serde_json::from_str(&text).map_err(|e| CliError::input("--previous", e))?;
    tracing::debug!(path = %path.display(), series = previous.len(), "loaded previous series");
    Ok(previous)
}

fn print_series(
    series: &[PaletteSeries],
    request: &PaletteRequest,
    share: bool,
    json: bool,
) -> Result<(), CliError> {
    let query = share.then(|| request.to_query());
    if json {
        let info = serde_json::json!({
            "algorithm": request.algorithm.name(),
            "count": request.count,
            "seed": request.seed,
            "series": series,
            "query": query,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        for s in series {
            println!("{}: {}", s.base_color, s.hexes().join(" "));
        }
        if let Some(q) = query {
            println!("?{q}");
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            if cli.json {
                let info: Vec<_> = Algorithm::ALL
                    .iter()
                    .map(|a| {
                        serde_json::json!({
                            "name": a.name(),
                            "maxColors": a.max_colors(),
                            "suggestedMax": a.suggested_max(),
                            "auto": a.is_auto(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Algorithms:");
                for a in Algorithm::ALL {
                    match a.max_colors() {
                        Some(cap) => println!("  {:<20} up to {cap}", a.name()),
                        None => println!("  {:<20} any count (suggested {})", a.name(), a.suggested_max()),
                    }
                }
            }
        }
        Command::Random { seed } => {
            let seed = seed.unwrap_or_else(|| {
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(1)
            });
            let hex = random_color(&mut Xorshift64::new(seed));
            if cli.json {
                let info = serde_json::json!({"color": hex, "seed": seed});
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{hex}");
            }
        }
        Command::Replay { query } => {
            let request = PaletteRequest::from_query(&query)?.normalized()?;
            request.validate()?;
            let series = huewheel_core::generate(&request, None);
            print_series(&series, &request, false, cli.json)?;
        }
        Command::Generate {
            colors,
            count,
            algorithm,
            hue,
            saturation,
            lightness,
            hue_delta,
            saturation_delta,
            lightness_delta,
            seed,
            locks,
            previous,
            options,
            share,
        } => {
            let options: serde_json::Value =
                serde_json::from_str(&options).map_err(|e| CliError::input("--options", e))?;
            let locks: LockMap = match locks {
                Some(text) => {
                    serde_json::from_str(&text).map_err(|e| CliError::input("--locks", e))?
                }
                None => LockMap::new(),
            };
            let previous = previous.as_deref().map(read_previous).transpose()?;

            let mut request = PaletteRequest::new(colors, count, algorithm.parse::<Algorithm>()?).normalized()?;
            request.shift = HslShift::new(hue, saturation, lightness);
            request.delta = HslDelta::new(hue_delta, saturation_delta, lightness_delta);
            request.seed = seed;
            request.locks = locks;
            request.mood = MoodSeriesOptions::from_json(&options)?;
            request.validate()?;

            let series = huewheel_core::generate(&request, previous.as_deref());
            print_series(&series, &request, share, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            eprintln!("{}", serde_json::to_string_pretty(&e.to_json()).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
