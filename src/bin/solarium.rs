//! Solarium command line runner
//!
//! Steps the engine over a range of instants and prints the HUD strings,
//! body positions and every annotation emitted along the way.
//!
//! Usage:
//!   cargo run --bin solarium -- --start 2459215.5 --steps 365 --step-days 1
//!   cargo run --bin solarium -- --config solarium.json --tle stations.txt

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::{info, warn};
use solarium::almanac::EventAnnotation;
use solarium::config::EngineConfig;
use solarium::sgp::Tle;
use solarium::time::{self, Instant};
use solarium::{Frame, Solarium};

/// Type alias for the error type used throughout this binary
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Solarium engine runner
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Steps the solar system engine and prints positions and events",
    long_about = None
)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional TLE file (name line followed by two element lines)
    #[arg(long)]
    tle: Option<PathBuf>,

    /// Start instant: a Julian date or "now"
    #[arg(short, long, default_value = "now")]
    start: String,

    /// Number of steps to run
    #[arg(short = 'n', long, default_value_t = 1)]
    steps: usize,

    /// Days per step (overrides the configuration)
    #[arg(long)]
    step_days: Option<f64>,

    /// Observer longitude in degrees, east positive (overrides the configuration)
    #[arg(long, allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Observer latitude in degrees (overrides the configuration)
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Print only the annotations, not the per-step positions
    #[arg(short, long, action = ArgAction::SetTrue)]
    quiet: bool,
}

fn parse_start(start: &str, config: &EngineConfig) -> Result<Instant> {
    if start.eq_ignore_ascii_case("now") {
        return Ok(time::now(config.time.timezone));
    }
    let jd: f64 = start
        .parse()
        .map_err(|_| format!("start must be a Julian date or \"now\", got {start:?}"))?;
    Ok(Instant::from_jd(jd)?)
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(lng) = args.lng {
        config.observer.longitude = lng;
    }
    if let Some(lat) = args.lat {
        config.observer.latitude = lat;
    }
    if let Some(step) = args.step_days {
        config.time.step_days = step;
    }
    config.validate()?;
    Ok(config)
}

fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

fn print_frame(frame: &Frame) {
    print_section_header(&format!("{} {}", frame.hud.date, frame.hud.time));
    println!("{}", frame.hud.location);
    println!(
        "{:<10} {:>10} {:>10} {:>12} {:>9} {:>9}",
        "Body", "Lon (°)", "Lat (°)", "Dist (AU)", "Alt (°)", "Az (°)"
    );
    for snapshot in frame.bodies.values() {
        let (lon, lat, dist) = snapshot.geocentric.to_spherical();
        println!(
            "{:<10} {:>10.3} {:>10.3} {:>12.6} {:>9.2} {:>9.2}{}",
            snapshot.name,
            lon.normalized().to_degrees(),
            lat.to_degrees(),
            dist,
            snapshot.horizontal.altitude.to_degrees(),
            snapshot.horizontal.azimuth.to_degrees(),
            if snapshot.above_horizon() { "  *" } else { "" }
        );
    }
    for satellite in &frame.satellites {
        match (&satellite.snapshot, &satellite.error) {
            (Some(snapshot), _) => println!(
                "{:<10} {:>10.1} km  alt {:>7.2}°  az {:>7.2}°  (epoch {:+.1} d)",
                satellite.name,
                snapshot.equatorial.to_km().norm(),
                snapshot.horizontal.altitude.to_degrees(),
                snapshot.horizontal.azimuth.to_degrees(),
                satellite.epoch_age_days
            ),
            (None, error) => println!(
                "{:<10} unavailable: {}",
                satellite.name,
                error.as_deref().unwrap_or("no position")
            ),
        }
    }
    if let Some(moon) = &frame.moon {
        println!(
            "Moon phase {} ({:.0}% lit, {:.1} days old)",
            moon.phase_index(),
            moon.illuminated_fraction() * 100.0,
            moon.age()
        );
    }
}

fn print_event(event: &EventAnnotation) {
    let date = time::format_date(event.instant).unwrap_or_else(|_| event.instant.to_string());
    match &event.label {
        Some(label) => println!("  {date}  {:?}  {label}", event.kind),
        None => println!("  {date}  {:?}", event.kind),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let start = parse_start(&args.start, &config)?;
    let step = config.time.step_days;
    let mut engine = Solarium::new(config, start)?;

    if let Some(path) = &args.tle {
        let text = std::fs::read_to_string(path)?;
        let tles = Tle::parse_set(&text)?;
        info!("Loaded {} TLEs from {}", tles.len(), path.display());
        for tle in tles {
            engine.add_satellite(tle);
        }
    }

    for i in 0..args.steps {
        let instant = start + i as f64 * step;
        let frame = match engine.step(instant) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Stopping at step {}: {}", i, e);
                break;
            }
        };
        if !args.quiet {
            print_frame(frame);
        }
        let notable: Vec<_> = frame
            .events
            .iter()
            .filter(|e| !matches!(e.kind, solarium::EventKind::DayTick { .. }))
            .collect();
        if !notable.is_empty() {
            if !args.quiet {
                print_section_header("Events");
            }
            notable.into_iter().for_each(print_event);
        }
    }

    Ok(())
}
