mod reports;
mod seeds;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use overflow_sim::{
    FutureParams, HistoricalParams, OverflowEngine, SelectionStrategy, SimConfig,
    expected_pulls_per_success,
};
use reports::RunReports;
use seeds::resolve_seed_token;
use util::{parse_copies, parse_rates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Replay the fixed historical timeline
    Historical,
    /// Project the current account forward
    Future,
    /// Run both simulations
    Both,
}

impl RunMode {
    const fn includes_historical(self) -> bool {
        matches!(self, Self::Historical | Self::Both)
    }

    const fn includes_future(self) -> bool {
        matches!(self, Self::Future | Self::Both)
    }
}

#[derive(Debug, Parser)]
#[command(name = "overflow-cli", version = "0.1.0")]
#[command(about = "Monte Carlo estimate of standard-roster copy overflow")]
struct Args {
    /// Which simulation to run
    #[arg(long, value_enum, default_value_t = RunMode::Both)]
    mode: RunMode,

    /// Number of independent trials per simulation
    #[arg(long, default_value_t = 10_000)]
    trials: usize,

    /// Run seed (decimal, negative decimal, or 0x hex)
    #[arg(long, default_value = "1337", allow_hyphen_values = true)]
    seed: String,

    /// Worker threads (0 = all cores but one)
    #[arg(long, default_value_t = 0)]
    workers: usize,

    /// Bonus selection strategy: lowest or highest copy count
    #[arg(long, default_value = "lowest")]
    strategy: SelectionStrategy,

    /// One-time bonus copies per eligible year
    #[arg(long, default_value_t = 0)]
    extra_bonus: u32,

    /// Historical limited pulls per patch, one per phase (a single value applies to all)
    #[arg(long, default_value = "40")]
    limited: String,

    /// Historical standard pulls per patch, one per phase (a single value applies to all)
    #[arg(long, default_value = "5")]
    standard: String,

    /// Future limited pulls per patch
    #[arg(long, default_value_t = 40.0)]
    future_limited: f64,

    /// Future standard pulls per patch
    #[arg(long, default_value_t = 5.0)]
    future_standard: f64,

    /// Current upgrade levels as Name=level pairs (-1 = not owned)
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    copies: String,

    /// Current limited-banner pity
    #[arg(long, default_value_t = 0)]
    limited_pity: u32,

    /// Next limited success is guaranteed rate-up
    #[arg(long)]
    guaranteed: bool,

    /// Current standard-banner pity
    #[arg(long, default_value_t = 0)]
    standard_pity: u32,

    /// Pulls since the last standard category A win
    #[arg(long, default_value_t = 0)]
    category_a_pity: u32,

    /// Pulls since the last standard category B win
    #[arg(long, default_value_t = 0)]
    category_b_pity: u32,

    /// JSON file overriding the roster, timeline or horizon
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let seed = resolve_seed_token(&args.seed)?;
    let engine = OverflowEngine::new(config, args.workers).context("invalid configuration")?;

    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let historical = if args.mode.includes_historical() {
        let params = build_historical_params(&args, seed, engine.config())?;
        Some(engine.run_historical(&params).context("historical simulation failed")?)
    } else {
        None
    };
    let future = if args.mode.includes_future() {
        let params = build_future_params(&args, seed)?;
        Some(engine.run_future(&params).context("future simulation failed")?)
    } else {
        None
    };

    let reports = RunReports {
        seed,
        workers: engine.worker_count(),
        expected_pulls_per_success: expected_pulls_per_success(),
        historical,
        future,
    };
    write_reports(&args, &reports, start_time)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "🎲 Overflow Simulator".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SimConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

/// Expand a rate list to one entry per phase; a single value is broadcast.
fn per_phase_rates(raw: &str, phases: usize, flag: &str) -> Result<Vec<f64>> {
    let rates = parse_rates(raw).with_context(|| format!("--{flag}"))?;
    match rates.as_slice() {
        [single] => Ok(vec![*single; phases]),
        _ if rates.len() == phases => Ok(rates),
        _ => bail!(
            "--{flag} needs 1 or {phases} values, got {}",
            rates.len()
        ),
    }
}

fn build_historical_params(args: &Args, seed: u64, config: &SimConfig) -> Result<HistoricalParams> {
    let phases = config.historical.phases.len();
    Ok(HistoricalParams {
        trials: args.trials,
        seed,
        limited_pulls_per_patch: per_phase_rates(&args.limited, phases, "limited")?,
        standard_pulls_per_patch: per_phase_rates(&args.standard, phases, "standard")?,
        extra_bonus_per_year: args.extra_bonus,
        strategy: args.strategy,
    })
}

fn build_future_params(args: &Args, seed: u64) -> Result<FutureParams> {
    for (flag, value) in [
        ("future-limited", args.future_limited),
        ("future-standard", args.future_standard),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("--{flag} must be a non-negative number (got {value})");
        }
    }
    let mut params = FutureParams::new(args.future_limited, args.future_standard);
    params.trials = args.trials;
    params.seed = seed;
    params.starting_copies = parse_copies(&args.copies).context("--copies")?;
    params.limited_pity = args.limited_pity;
    params.limited_guaranteed = args.guaranteed;
    params.standard_pity = args.standard_pity;
    params.category_a_pity = args.category_a_pity;
    params.category_b_pity = args.category_b_pity;
    params.extra_bonus_per_year = args.extra_bonus;
    params.strategy = args.strategy;
    Ok(params)
}

fn write_reports(args: &Args, run: &RunReports, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, run)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, run)?,
        "csv" => reports::generate_csv_report(&mut output_target, run)?,
        _ => {
            let duration = start_time.elapsed();
            reports::generate_console_report(&mut output_target, run, duration)?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
