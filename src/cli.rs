//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::console_report::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{collect_streak_stats, run_backtests, AnalysisConfig, StreakStats};
use crate::domain::backtest::{BacktestConfig, Variant};
use crate::domain::config_validation::{
    parse_date, validate_analysis_config, validate_backtest_config, DEFAULT_COMMISSION,
    DEFAULT_INITIAL_CAPITAL, DEFAULT_N,
};
use crate::domain::error::StreakError;
use crate::domain::metrics::Metrics;
use crate::domain::streak::TrailingStreak;
use crate::domain::summary::ReturnSummary;
use crate::domain::universe::{load_universe, parse_codes, SkippedCode};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "candlestreak",
    about = "Candle streak reversal statistics and backtester"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Measure how often an n-candle streak is followed by a reversal
    Streaks {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Backtest the streak-reversal day trade on every ticker
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Streak statistics followed by the backtest
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate a configuration file without loading data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Streak length threshold
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub n: Option<u64>,
    /// Run a single ticker instead of the configured list
    #[arg(long)]
    pub ticker: Option<String>,
    /// long-only or long-short
    #[arg(long)]
    pub variant: Option<Variant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Streaks,
    Backtest,
    Both,
}

impl Mode {
    fn streaks(self) -> bool {
        matches!(self, Mode::Streaks | Mode::Both)
    }

    fn backtest(self) -> bool {
        matches!(self, Mode::Backtest | Mode::Both)
    }
}

/// Everything a pipeline run produced, for callers that want more than the
/// printed report.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub stats: Option<StreakStats>,
    pub summary: Option<ReturnSummary>,
    pub skipped: Vec<SkippedCode>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Streaks { config, overrides } => run_analysis(&config, &overrides, Mode::Streaks),
        Command::Backtest { config, overrides } => {
            run_analysis(&config, &overrides, Mode::Backtest)
        }
        Command::Analyze { config, overrides } => run_analysis(&config, &overrides, Mode::Both),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StreakError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_analysis_config(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<AnalysisConfig, StreakError> {
    validate_analysis_config(adapter)?;

    let start_date = parse_date(
        adapter.get_string("analysis", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = parse_date(
        adapter.get_string("analysis", "end_date").as_deref(),
        "end_date",
    )?;
    let trailing = match adapter.get_string("analysis", "trailing_streak") {
        Some(s) => s.parse::<TrailingStreak>().map_err(|reason| StreakError::ConfigInvalid {
            section: "analysis".into(),
            key: "trailing_streak".into(),
            reason,
        })?,
        None => TrailingStreak::default(),
    };
    let n = match overrides.n {
        Some(n) => n as usize,
        None => adapter.get_int("analysis", "n", DEFAULT_N) as usize,
    };

    Ok(AnalysisConfig {
        n,
        tickers: resolve_codes(overrides.ticker.as_deref(), adapter)?,
        start_date,
        end_date,
        trailing,
    })
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestConfig, StreakError> {
    validate_backtest_config(adapter)?;

    let variant = match (overrides.variant, adapter.get_string("backtest", "variant")) {
        (Some(v), _) => v,
        (None, Some(s)) => s.parse::<Variant>().map_err(|reason| StreakError::ConfigInvalid {
            section: "backtest".into(),
            key: "variant".into(),
            reason,
        })?,
        (None, None) => Variant::default(),
    };

    Ok(BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        commission_rate: adapter.get_double("backtest", "commission", DEFAULT_COMMISSION),
        variant,
    })
}

pub fn resolve_codes(
    code_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, StreakError> {
    if let Some(c) = code_override {
        return Ok(parse_codes(c)?);
    }

    match config.get_string("analysis", "tickers") {
        Some(tickers) => Ok(parse_codes(&tickers)?),
        None => Err(StreakError::ConfigMissing {
            section: "analysis".into(),
            key: "tickers".into(),
        }),
    }
}

pub fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, StreakError> {
    let dir = config
        .get_string("data", "dir")
        .ok_or_else(|| StreakError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    Ok(CsvAdapter::new(dir))
}

fn run_analysis(config_path: &Path, overrides: &Overrides, mode: Mode) -> Result<(), StreakError> {
    let adapter = load_config(config_path)?;
    let analysis = build_analysis_config(&adapter, overrides)?;
    let backtest = if mode.backtest() {
        Some(build_backtest_config(&adapter, overrides)?)
    } else {
        None
    };
    let data_port = data_adapter(&adapter)?;
    let mut report = ConsoleReportAdapter::stdout();

    run_pipeline(&data_port, &mut report, &analysis, backtest.as_ref(), mode)?;
    Ok(())
}

/// Loads the universe, runs the requested components and writes the report.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    report: &mut dyn ReportPort,
    analysis: &AnalysisConfig,
    backtest: Option<&BacktestConfig>,
    mode: Mode,
) -> Result<PipelineOutput, StreakError> {
    info!(
        tickers = analysis.tickers.len(),
        start = %analysis.start_date,
        end = %analysis.end_date,
        n = analysis.n,
        "loading universe"
    );
    let universe = load_universe(
        data_port,
        &analysis.tickers,
        analysis.start_date,
        analysis.end_date,
    );
    if universe.is_empty() {
        return Err(StreakError::NoData {
            requested: universe.requested(),
        });
    }

    let stats = if mode.streaks() {
        let stats = collect_streak_stats(&universe.series, analysis.n, analysis.trailing);
        info!(
            up_streaks = stats.counts.up_streaks,
            down_streaks = stats.counts.down_streaks,
            "streak scan complete"
        );
        report.write_streaks(&stats)?;
        Some(stats)
    } else {
        None
    };

    let summary = match backtest {
        Some(config) if mode.backtest() => {
            info!(variant = %config.variant, assets = universe.series.len(), "running backtests");
            let results = run_backtests(&universe.series, analysis.n, config);
            for result in &results {
                let m = Metrics::compute(result);
                info!(
                    code = %result.code,
                    trades = m.total_trades,
                    win_rate = m.win_rate,
                    avg_trade_return_pct = m.avg_trade_return_pct,
                    max_drawdown = m.max_drawdown,
                    return_pct = m.return_pct,
                    "backtest complete"
                );
            }
            let summary = ReturnSummary::from_results(&results);
            report.write_returns(&summary, config.variant)?;
            Some(summary)
        }
        _ => None,
    };

    report.write_skipped(&universe.skipped)?;

    Ok(PipelineOutput {
        stats,
        summary,
        skipped: universe.skipped,
    })
}

pub fn run_validate(config_path: &Path) -> Result<(), StreakError> {
    let adapter = load_config(config_path)?;
    let overrides = Overrides::default();
    let analysis = build_analysis_config(&adapter, &overrides)?;
    let backtest = build_backtest_config(&adapter, &overrides)?;
    let data = data_adapter(&adapter)?;

    println!("n:               {}", analysis.n);
    println!("tickers:         {}", analysis.tickers.join(", "));
    println!("period:          {} to {}", analysis.start_date, analysis.end_date);
    println!("trailing streak: {}", analysis.trailing);
    println!("initial capital: {:.2}", backtest.initial_capital);
    println!("commission:      {}", backtest.commission_rate);
    println!("variant:         {}", backtest.variant);
    println!("data dir:        {}", data.base_path().display());
    info!("configuration is valid");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), StreakError> {
    let adapter = load_config(config_path)?;
    let data_port = data_adapter(&adapter)?;
    let symbols = data_port.list_symbols()?;

    if symbols.is_empty() {
        info!(dir = %data_port.base_path().display(), "no symbols found");
    }
    for symbol in &symbols {
        println!("{symbol}");
    }
    Ok(())
}
