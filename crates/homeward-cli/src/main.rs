use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use homeward_nav::places::Places;
use homeward_nav::{doctor, resolve, tracking, CycleReport, FatalError, MetricsSink, TrackerConfig};
use homeward_proto::GeoPoint;

mod render;
mod speech;

use speech::Speaker;

#[derive(Debug, Parser)]
#[command(name = "homeward", version, about = "Live distance and bearing to a destination from gpsd")]
struct Cli {
    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    /// Show the turn relative to the reported course
    #[arg(short = 'c', long)]
    course: bool,

    /// Announce distance and direction through the speech command
    #[arg(short, long)]
    speak: bool,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Seconds between polls
    #[arg(long)]
    interval: Option<f64>,

    /// Location database file
    #[arg(long)]
    places: Option<PathBuf>,

    /// Coordinates, a maps URL, or part of a stored location name
    target: Vec<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Config {
    places_file: Option<PathBuf>,
    gpsd: GpsdCfg,
    nav: NavCfg,
    speech: SpeechCfg,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct GpsdCfg {
    host: String,
    port: u16,
    interval_s: f64,
    read_timeout_s: Option<f64>,
}

impl Default for GpsdCfg {
    fn default() -> Self {
        Self {
            host: homeward_nav::gpsd::DEFAULT_HOST.to_string(),
            port: homeward_nav::gpsd::DEFAULT_PORT,
            interval_s: 5.0,
            read_timeout_s: None,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct NavCfg {
    track_course: bool,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct SpeechCfg {
    enable: bool,
    every_n: u32,
    command: String,
}

impl Default for SpeechCfg {
    fn default() -> Self {
        Self { enable: false, every_n: 24, command: "espeak".to_string() }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else { return Ok(Config::default()); };
    let s = std::fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&s).context("parse config toml")
}

fn seconds(v: f64, what: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(v).with_context(|| format!("{} must be a non-negative number of seconds", what))
}

/// Flags win over the config file.
fn tracker_config(cli: &Cli, cfg: &Config) -> Result<TrackerConfig> {
    let tc = TrackerConfig {
        host: cli.host.clone().unwrap_or_else(|| cfg.gpsd.host.clone()),
        port: cli.port.unwrap_or(cfg.gpsd.port),
        interval: seconds(cli.interval.unwrap_or(cfg.gpsd.interval_s), "interval")?,
        read_timeout: cfg.gpsd.read_timeout_s.map(|t| seconds(t, "gpsd.read_timeout_s")).transpose()?,
        track_course: cli.course || cfg.nav.track_course,
        speak: cli.speak || cfg.speech.enable,
        announce_every: cfg.speech.every_n,
    };
    doctor::check_tracker_config(&tc)?;
    Ok(tc)
}

fn places_path(cli: &Cli, cfg: &Config) -> PathBuf {
    cli.places
        .clone()
        .or_else(|| cfg.places_file.clone())
        .unwrap_or_else(|| {
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
            home.join(".homeward_places")
        })
}

/// Coordinates first; anything else is a name fragment for the database.
fn resolve_target(words: &[String], places: &Path) -> Result<GeoPoint> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        return Err(FatalError::NoTarget.into());
    }
    if let Some(p) = resolve::resolve(&text) {
        return Ok(p);
    }

    let db = Places::load(places)?;
    let loc = db.lookup(&text)?;
    info!("target: stored location {} ({})", loc.name, loc.coords);
    resolve::resolve(&loc.coords).with_context(|| format!("stored location {} has unparseable coordinates", loc.name))
}

struct TerminalDisplay {
    target: GeoPoint,
    speaker: Option<Speaker>,
}

impl MetricsSink for TerminalDisplay {
    fn render(&mut self, report: &CycleReport) {
        use std::io::Write;
        print!("{}", render::frame(report, &self.target));
        let _ = std::io::stdout().flush();
    }

    fn announce(&mut self, phrase: &str) {
        if let Some(s) = self.speaker.as_mut() {
            s.say(phrase);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    let tc = tracker_config(&cli, &cfg)?;

    let target = resolve_target(&cli.target, &places_path(&cli, &cfg))?;
    if let Some(w) = doctor::target_warning(&target) {
        warn!("{}", w);
    }
    info!("target: {}, {} via {}:{}", target.lat, target.lon, tc.host, tc.port);

    let mut display = TerminalDisplay {
        target,
        speaker: tc.speak.then(|| Speaker::new(cfg.speech.command.clone())),
    };
    tracking::track(&tc, target, &mut display, shutdown_signal()).await?;
    Ok(())
}

fn exit_code(e: &anyhow::Error) -> ExitCode {
    let Some(fatal) = e.downcast_ref::<FatalError>() else {
        eprintln!("homeward: {:#}", e);
        return ExitCode::FAILURE;
    };
    if let FatalError::MultipleMatches { query, candidates } = fatal {
        eprintln!("homeward: '{}' is ambiguous, candidates:", query);
        for c in candidates {
            eprintln!("  {:<20} {}", c.name, c.coords);
        }
    } else {
        eprintln!("homeward: {}", fatal);
    }
    ExitCode::from(fatal.exit_code())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit_code(&e),
    }
}
