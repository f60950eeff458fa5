//! Physio Replay - feed a recorded joint-angle stream through an exercise
//! session and print the session report.
//!
//! Input is JSON lines, one frame per line: either an object of joint angles
//! in degrees (`{"leftKnee": 85.0, "rightKnee": 87.5, ...}`) or `null` for a
//! frame where no pose was detected. Blank lines are skipped.

use anyhow::{Context, Result};
use clap::Parser;
use physio_core::AngleSample;
use physio_scoring::{ExerciseKind, ExerciseSession, ScoringConfig};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "physio-replay")]
#[command(about = "Replay recorded joint angles through an exercise session")]
struct Args {
    /// Exercise label, e.g. "knee bends", "leg-raises", "hip flexion"
    #[arg(short, long)]
    exercise: String,

    /// JSON-lines angle file; reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Scoring configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Print every frame's state as it is scored
    #[arg(short, long)]
    verbose: bool,

    /// Pretty-print the final report
    #[arg(short, long)]
    pretty: bool,
}

/// Parse one input line; `Ok(None)` for blank lines
fn parse_frame(line: &str) -> Result<Option<Option<AngleSample>>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let frame: Option<AngleSample> = serde_json::from_str(trimmed)?;
    Ok(Some(frame))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let kind: ExerciseKind = args.exercise.parse()?;

    let config = match &args.config {
        Some(path) => ScoringConfig::from_file(path)
            .with_context(|| format!("loading scoring config from {path}"))?,
        None => ScoringConfig::default(),
    };

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut session = ExerciseSession::from_config(kind, &config);
    tracing::info!(session = %session.id(), exercise = %kind, "Replay started");

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(frame) = parse_frame(&line)
            .with_context(|| format!("line {}: invalid angle frame", line_no + 1))?
        else {
            continue;
        };

        let state = session.process_frame(frame.as_ref());
        if args.verbose {
            println!("{}", serde_json::to_string(&state)?);
        }
    }

    let report = session.finish();
    println!("{}", report.to_json(args.pretty)?);

    Ok(())
}
