//! Tank Duel - headless battle runner
//!
//! Loads a board file, pits zone control (player 1) against the hunter
//! (player 2) and writes the per-step log plus the verdict as text or JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tank_duel::battle::{
    BattleState, HunterStrategy, StepReport, TankStrategy, Verdict, ZoneControlStrategy,
};
use tank_duel::core::config::GameConfig;
use tank_duel::core::error::Result;
use tank_duel::core::types::{PlayerId, Step};
use tank_duel::scenario::load_board_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Run a deterministic tank duel from a board file
#[derive(Parser, Debug)]
#[command(name = "tank-duel")]
#[command(about = "Run a zone-control vs hunter tank battle on a board file")]
struct Args {
    /// Board file (name, metadata lines, then the grid)
    board: PathBuf,

    /// TOML rule config; board metadata still overrides max steps and shells
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the step ceiling
    #[arg(long)]
    max_steps: Option<Step>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Enable debug logging of every phase
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunOutput<'a> {
    scenario: &'a str,
    verdict: Verdict,
    message: String,
    steps: Step,
    history: Vec<StepReport>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "tank_duel=debug" } else { "tank_duel=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut scenario = load_board_file(&args.board)?;
    if let Some(max_steps) = args.max_steps {
        scenario.max_steps = Some(max_steps);
    }
    let base = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    // Strategies track cooldowns and magazines against the effective rules
    let rules = scenario.apply_to(&base);
    let factory = move |player: PlayerId, _index: usize| -> Box<dyn TankStrategy> {
        match player {
            PlayerId::One => Box::new(ZoneControlStrategy::new(player, &rules)),
            PlayerId::Two => Box::new(HunterStrategy::new(player, &rules)),
        }
    };
    let mut state = BattleState::new(&scenario, base, &factory)?;

    let mut history = Vec::new();
    let verdict = state.run_with(|report| history.push(report.clone()));

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match args.format {
        OutputFormat::Text => {
            for report in &history {
                writeln!(out, "{}", report)?;
            }
            writeln!(out, "{}", verdict)?;
        }
        OutputFormat::Json => {
            let output = RunOutput {
                scenario: &scenario.name,
                verdict,
                message: verdict.to_string(),
                steps: state.steps_executed(),
                history,
            };
            serde_json::to_writer_pretty(&mut out, &output)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
