#![deny(unsafe_code)]
//! Developer CLI for the studio-fx effects.
//!
//! Subcommands:
//! - `list` -- print available effects with their renderer requirements
//! - `shader <effect>` -- print a shader stage, optionally downgraded to the legacy tier
//! - `color <hex>` -- convert `#rrggbb` to the normalized RGB the shaders receive
//! - `timeline` -- tabulate the plasma clock for a direction mode
//!
//! Nothing here opens a graphics context.

mod error;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use error::CliError;
use serde::Serialize;
use std::process;
use studio_fx_core::render::{source_for_tier, ShaderStage};
use studio_fx_core::{
    hex_to_rgb, ApiTier, Direction, Effect, EffectKind, FrameClock, Plasma, PlasmaConfig,
    TierPreference,
};

#[derive(Parser)]
#[command(name = "studio-fx", about = "Shader effect tooling")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available effects.
    List,
    /// Print an effect's shader source.
    Shader {
        /// Effect name ("plasma" or "silk").
        effect: String,

        #[arg(long, value_enum, default_value_t = StageArg::Fragment)]
        stage: StageArg,

        /// Tier to print the source for; legacy applies the downgrade.
        #[arg(long, value_enum, default_value_t = TierArg::High)]
        tier: TierArg,
    },
    /// Convert a hex color to normalized RGB.
    Color {
        /// Color as `#rrggbb` or `rrggbb`.
        hex: String,
    },
    /// Tabulate the plasma clock over time.
    Timeline {
        #[arg(long, value_enum, default_value_t = DirectionArg::PingPong)]
        direction: DirectionArg,

        /// Last sample time in seconds.
        #[arg(long, default_value_t = 20.0)]
        until: f64,

        /// Seconds between samples.
        #[arg(long, default_value_t = 1.0)]
        step: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StageArg {
    Vertex,
    Fragment,
}

impl From<StageArg> for ShaderStage {
    fn from(s: StageArg) -> Self {
        match s {
            StageArg::Vertex => ShaderStage::Vertex,
            StageArg::Fragment => ShaderStage::Fragment,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TierArg {
    High,
    Legacy,
}

impl From<TierArg> for ApiTier {
    fn from(t: TierArg) -> Self {
        match t {
            TierArg::High => ApiTier::High,
            TierArg::Legacy => ApiTier::Legacy,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Forward,
    Reverse,
    PingPong,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Forward => Direction::Forward,
            DirectionArg::Reverse => Direction::Reverse,
            DirectionArg::PingPong => Direction::PingPong,
        }
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }
    builder.init();
}

fn effect_kind(name: &str) -> Result<EffectKind, CliError> {
    EffectKind::from_name(name).ok_or_else(|| {
        CliError::Input(format!(
            "unknown effect '{name}' (available: {})",
            EffectKind::list().join(", ")
        ))
    })
}

/// Shader source for `effect` as a context of `tier` would receive it.
fn shader_source(
    effect: EffectKind,
    stage: ShaderStage,
    tier: ApiTier,
) -> Result<String, CliError> {
    let options = effect.renderer_options();
    if !options.tier.allows(tier) {
        return Err(studio_fx_core::FxError::UnsupportedTier {
            required: ApiTier::High,
        }
        .into());
    }
    let source = match stage {
        ShaderStage::Vertex => effect.vertex_source(),
        ShaderStage::Fragment => effect.fragment_source(),
    };
    log::debug!("{} {stage} source for {tier} tier", effect.name());
    Ok(source_for_tier(tier, stage, source))
}

/// Upper bound on rows `timeline` will produce.
const MAX_TIMELINE_SAMPLES: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
struct TimelineRow {
    t: f64,
    time: f32,
    direction: f32,
}

/// Samples the plasma clock at `0, step, 2*step, ...` up to `until`.
fn timeline(direction: Direction, until: f64, step: f64) -> Result<Vec<TimelineRow>, CliError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(CliError::Input(format!("--step must be positive, got {step}")));
    }
    if !(until.is_finite() && until >= 0.0) {
        return Err(CliError::Input(format!(
            "--until must be non-negative, got {until}"
        )));
    }

    let mut plasma = Plasma::new(PlasmaConfig {
        direction,
        ..PlasmaConfig::default()
    });
    let mut uniforms = plasma.initial_uniforms();
    let samples = (until / step).floor();
    if samples >= MAX_TIMELINE_SAMPLES as f64 {
        return Err(CliError::Input(format!(
            "--until/--step gives {samples} samples, limit is {MAX_TIMELINE_SAMPLES}"
        )));
    }
    let samples = samples as u64;

    let rows = (0..=samples)
        .map(|i| {
            let t = i as f64 * step;
            plasma.on_frame(
                FrameClock {
                    timestamp_ms: t * 1000.0,
                    elapsed_secs: t,
                },
                &mut uniforms,
            );
            TimelineRow {
                t,
                time: uniforms.scalar("iTime").unwrap_or_default(),
                direction: uniforms.scalar("uDirection").unwrap_or_default(),
            }
        })
        .collect();
    Ok(rows)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let effects: Vec<_> = EffectKind::list()
                .iter()
                .filter_map(|name| EffectKind::from_name(name))
                .map(|kind| {
                    let options = kind.renderer_options();
                    let tier = match options.tier {
                        TierPreference::Any => "any",
                        TierPreference::RequireHigh => "high",
                    };
                    (kind.name(), tier, options.dpr_cap)
                })
                .collect();
            if cli.json {
                let info: Vec<_> = effects
                    .iter()
                    .map(|(name, tier, dpr_cap)| {
                        serde_json::json!({ "name": name, "tier": tier, "dprCap": dpr_cap })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Effects:");
                for (name, tier, dpr_cap) in effects {
                    println!("  {name:<8} tier: {tier:<5} dpr cap: {dpr_cap}");
                }
            }
        }
        Command::Shader {
            effect,
            stage,
            tier,
        } => {
            let kind = effect_kind(&effect)?;
            let (stage, tier) = (ShaderStage::from(stage), ApiTier::from(tier));
            let source = shader_source(kind, stage, tier)?;
            if cli.json {
                let info = serde_json::json!({
                    "effect": kind.name(),
                    "stage": stage.to_string(),
                    "tier": tier,
                    "source": source,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print!("{source}");
            }
        }
        Command::Color { hex } => {
            let rgb = hex_to_rgb(&hex)?;
            if cli.json {
                let info = serde_json::json!({ "hex": hex, "rgb": rgb.to_array() });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{:.4} {:.4} {:.4}", rgb.x, rgb.y, rgb.z);
            }
        }
        Command::Timeline {
            direction,
            until,
            step,
        } => {
            let rows = timeline(direction.into(), until, step)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:>8}  {:>8}  {:>4}", "t", "iTime", "dir");
                for row in rows {
                    println!("{:>8.2}  {:>8.4}  {:>4}", row.t, row.time, row.direction);
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
