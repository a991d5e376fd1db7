use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

use grade_curve::{parameters::Logging, Adjustment, JsonPresenter, Parameters, Session, TextPresenter};

/// Reshape the score distribution of a class and export the adjusted scores.
#[derive(Debug, Parser)]
#[command(name = "grade-curve", version)]
struct Args {
    /// Roster with `name` and `score` columns (.csv, .xlsx, .xls, .ods)
    input: PathBuf,

    /// TOML file with initial slider positions, sheet names and logging setup
    #[arg(short, long)]
    config: Option<String>,

    /// Points added to every score, -20 to 20
    #[arg(long, allow_negative_numbers = true)]
    shift: Option<i32>,

    /// Change of the standard deviation, -1.0 to 1.0 in steps of 0.1
    #[arg(long, allow_negative_numbers = true)]
    spread: Option<f64>,

    /// Push scores near the pass threshold up or down, -30 to 30
    #[arg(long = "pass-rate", allow_negative_numbers = true)]
    pass_rate: Option<i32>,

    /// Write the adjusted scores to this .xlsx or .csv file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Print the view as JSON instead of text panels
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let parameters = match &args.config {
        Some(path) => Parameters::new(path).with_context(|| format!("failed to read config {}", path))?,
        None => Parameters::default(),
    };

    init_logging(&parameters.logging)?;

    let initial = parameters.adjustment;
    let adjustment = Adjustment::new(
        args.shift.unwrap_or(initial.shift),
        args.spread
            .map(|spread| (spread * 10.0).round() as i32)
            .unwrap_or(initial.spread_steps),
        args.pass_rate.unwrap_or(initial.pass_rate_adjust),
    );

    let mut session = Session::new(parameters);
    session
        .load(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    if args.json {
        session.update(adjustment, &mut JsonPresenter::new(io::stdout().lock()))?;
    } else {
        session.update(adjustment, &mut TextPresenter::new(io::stdout().lock()))?;
    }

    if let Some(export) = &args.export {
        let written = session
            .export(export)
            .with_context(|| format!("failed to export to {}", export.display()))?;
        for path in written {
            info!("wrote {}", path.display());
        }
    }

    Ok(())
}

// a log4rs yaml file wins, otherwise log to stderr at the configured level
fn init_logging(logging: &Logging) -> Result<()> {
    if Path::new(&logging.config_file).exists() {
        log4rs::init_file(&logging.config_file, Default::default())?;
        return Ok(());
    }

    let level = logging.level.parse().unwrap_or(LevelFilter::Info);
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;

    log4rs::init_config(config)?;
    Ok(())
}
