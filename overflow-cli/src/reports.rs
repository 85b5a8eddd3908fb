use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use overflow_sim::numbers::{round_f64_to_usize, usize_to_f64};
use overflow_sim::{FutureReport, HistoricalReport};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

const BAR_WIDTH: usize = 50;

/// Everything a single CLI invocation produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReports {
    pub seed: u64,
    pub workers: usize,
    pub expected_pulls_per_success: f64,
    pub historical: Option<HistoricalReport>,
    pub future: Option<FutureReport>,
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    generated_at: String,
    #[serde(flatten)]
    reports: &'a RunReports,
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    reports: &RunReports,
    duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Overflow Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;
    writeln!(out, "Seed: {}", reports.seed)?;
    writeln!(out, "Workers: {}", reports.workers)?;
    writeln!(
        out,
        "Expected pulls per 5★: {:.2}",
        reports.expected_pulls_per_success
    )?;
    writeln!(out, "Simulation time: {duration:?}")?;

    if let Some(report) = &reports.historical {
        write_historical_console(out, report)?;
    }
    if let Some(report) = &reports.future {
        write_future_console(out, report)?;
    }
    Ok(())
}

fn write_historical_console<W: Write + ?Sized>(out: &mut W, report: &HistoricalReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📜 Historical Replay".bright_yellow().bold())?;
    writeln!(out, "{}", "-".repeat(30).yellow())?;
    writeln!(
        out,
        "Trials: {}  Strategy: {}  Extra bonus/year: {}",
        report.trials, report.strategy, report.extra_bonus_per_year
    )?;
    writeln!(
        out,
        "Total overflow: mean {} ± {:.2}",
        format!("{:.2}", report.mean).green(),
        report.std_dev
    )?;
    writeln!(
        out,
        "5★ per trial: {:.1} rate-up, {:.1} off-banner, {:.1} standard A, {:.1} standard B",
        report.tally.limited_rate_up,
        report.tally.limited_off_banner,
        report.tally.standard_category_a,
        report.tally.standard_category_b
    )?;

    writeln!(out)?;
    writeln!(out, "{:<14} {:>12} {:>14}", "Member", "Mean copies", "Mean overflow")?;
    for member in &report.member_stats {
        writeln!(
            out,
            "{:<14} {:>12.2} {:>14.2}",
            member.name, member.mean_copies, member.mean_overflow
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Overflow distribution:")?;
    for bin in &report.histogram {
        let bar = "█".repeat(bar_length(bin.percent));
        writeln!(
            out,
            "{:>4} {:>7.2}% {}",
            bin.overflow,
            bin.percent,
            bar.cyan()
        )?;
    }
    Ok(())
}

fn write_future_console<W: Write + ?Sized>(out: &mut W, report: &FutureReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🔮 Future Projection".bright_blue().bold())?;
    writeln!(out, "{}", "-".repeat(30).blue())?;
    writeln!(
        out,
        "Trials: {}  Strategy: {}  Extra bonus/year: {}",
        report.trials, report.strategy, report.extra_bonus_per_year
    )?;
    writeln!(
        out,
        "{:<6} {:>5} {:>8} {:>7} {:>7} {:>7}",
        "Year", "Pool", "Mean", "2.5%", "Median", "97.5%"
    )?;
    for band in &report.bands {
        writeln!(
            out,
            "{:<6} {:>5} {:>8.2} {:>7} {:>7} {:>7}",
            band.year,
            band.pool_size,
            band.mean,
            band.band.lower,
            band.band.median.to_string().green(),
            band.band.upper
        )?;
    }
    Ok(())
}

fn bar_length(percent: f64) -> usize {
    round_f64_to_usize(percent / 100.0 * usize_to_f64(BAR_WIDTH)).min(BAR_WIDTH)
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, reports: &RunReports) -> Result<()> {
    let envelope = JsonEnvelope {
        generated_at: Utc::now().to_rfc3339(),
        reports,
    };
    serde_json::to_writer_pretty(&mut *out, &envelope)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(out: &mut W, reports: &RunReports) -> Result<()> {
    writeln!(out, "# Overflow Simulation Results\n")?;
    writeln!(
        out,
        "_Generated {}; seed {}; {} workers._\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        reports.seed,
        reports.workers
    )?;

    if let Some(report) = &reports.historical {
        writeln!(out, "## Historical Replay\n")?;
        writeln!(out, "- **Trials**: {}", report.trials)?;
        writeln!(out, "- **Strategy**: {}", report.strategy)?;
        writeln!(out, "- **Mean overflow**: {:.2}", report.mean)?;
        writeln!(out, "- **Std dev**: {:.2}\n", report.std_dev)?;

        writeln!(out, "| Member | Mean copies | Mean overflow |")?;
        writeln!(out, "|---|---:|---:|")?;
        for member in &report.member_stats {
            writeln!(
                out,
                "| {} | {:.2} | {:.2} |",
                member.name, member.mean_copies, member.mean_overflow
            )?;
        }
        writeln!(out)?;

        writeln!(out, "| Overflow | Trials | Share |")?;
        writeln!(out, "|---:|---:|---:|")?;
        for bin in &report.histogram {
            writeln!(
                out,
                "| {} | {} | {:.2}% |",
                bin.overflow, bin.trials, bin.percent
            )?;
        }
        writeln!(out)?;
    }

    if let Some(report) = &reports.future {
        writeln!(out, "## Future Projection\n")?;
        writeln!(out, "- **Trials**: {}", report.trials)?;
        writeln!(out, "- **Strategy**: {}\n", report.strategy)?;
        writeln!(out, "| Year | Pool | Mean | 2.5% | Median | 97.5% |")?;
        writeln!(out, "|---:|---:|---:|---:|---:|---:|")?;
        for band in &report.bands {
            writeln!(
                out,
                "| {} | {} | {:.2} | {} | {} | {} |",
                band.year,
                band.pool_size,
                band.mean,
                band.band.lower,
                band.band.median,
                band.band.upper
            )?;
        }
        writeln!(out)?;
    }

    if reports.historical.is_none() && reports.future.is_none() {
        writeln!(out, "_No simulations executed._")?;
    }
    Ok(())
}

pub fn generate_csv_report<W: Write + ?Sized>(out: &mut W, reports: &RunReports) -> Result<()> {
    writeln!(out, "table,key,trials,percent,mean,lower,median,upper")?;
    if let Some(report) = &reports.historical {
        for bin in &report.histogram {
            writeln!(
                out,
                "histogram,{},{},{:.6},,,,",
                bin.overflow, bin.trials, bin.percent
            )?;
        }
        for member in &report.member_stats {
            writeln!(
                out,
                "member,{},{},,{:.6},,,",
                member.name, report.trials, member.mean_overflow
            )?;
        }
    }
    if let Some(report) = &reports.future {
        for band in &report.bands {
            writeln!(
                out,
                "year,{},{},,{:.6},{},{},{}",
                band.year,
                report.trials,
                band.mean,
                band.band.lower,
                band.band.median,
                band.band.upper
            )?;
        }
    }
    Ok(())
}
