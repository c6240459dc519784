//! Check command: scan a file or stdin for flagged terms.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use owo_colors::Style;
use tracing::{debug, instrument};

use zhi_lang_cop_core::{Config, Level, LintReport, Matcher, Summary};

use super::{load_dictionary, paint, read_input_file, read_stdin};

/// Threshold used when neither `--level` nor config sets one.
pub const DEFAULT_MIN_LEVEL: Level = Level::Error;

/// Output format for `check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// JSON report.
    Json,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// File to check. Reads stdin when omitted.
    pub file: Option<Utf8PathBuf>,

    /// Minimum level to report [default: error]
    #[arg(short, long, value_enum)]
    pub level: Option<Level>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Check text and fail when any issue is reported.
#[instrument(name = "cmd_check", skip_all, fields(file = ?args.file))]
pub fn cmd_check(args: CheckArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let min_level = args.level.or(config.min_level).unwrap_or(DEFAULT_MIN_LEVEL);
    debug!(file = ?args.file, min_level = %min_level, "executing check command");

    let text = match args.file {
        Some(ref path) => read_input_file(path, config.input_limit())?,
        None => read_stdin(config.input_limit())?,
    };

    let dict = load_dictionary(config)?;
    let issues = Matcher::new(&dict, Some(min_level)).find_matches(&text);
    let report = LintReport::new(issues, dict.version(), chrono::Utc::now().to_rfc3339());

    if global_json || args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&report);
    }

    if !report.is_clean() {
        let source = args.file.as_ref().map_or("stdin", |p| p.as_str());
        bail!("{source}: {} issue(s) at level {min_level} or above", report.summary.total);
    }
    Ok(())
}

fn print_text_report(report: &LintReport) {
    if report.is_clean() {
        println!("{}", paint("✓ 沒有發現問題", Style::new().green()));
        return;
    }

    println!();
    println!(
        "{}",
        paint(format!("✗ 發現 {} 個問題", report.summary.total), Style::new().red())
    );
    println!("{}", paint(level_breakdown(&report.summary), Style::new().dimmed()));
    println!();

    for issue in &report.results {
        let start = issue.location.start;
        println!(
            "{} {}",
            paint(
                format!("{}:{}", start.line, start.column),
                Style::new().dimmed()
            ),
            paint(&issue.term, Style::new().red())
        );
        println!(
            "  {}",
            paint(
                format!("{} {}: {}", issue.level.emoji(), issue.level, issue.message),
                Style::new().yellow()
            )
        );
        println!(
            "  {}",
            paint(
                format!("建議: {}", issue.alternatives.join("、")),
                Style::new().cyan()
            )
        );
        println!();
    }
}

/// One `emoji level: count` pair per level that has issues, most severe first.
fn level_breakdown(summary: &Summary) -> String {
    Level::ALL
        .iter()
        .filter_map(|&level| {
            let count = summary.count(level);
            (count > 0).then(|| format!("{} {level}: {count}", level.emoji()))
        })
        .collect::<Vec<_>>()
        .join("  ")
}
