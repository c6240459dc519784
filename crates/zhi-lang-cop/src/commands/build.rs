//! Build command: compile annotated JSON Lines into `terms-db.json`.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::Style;
use serde::Serialize;
use tracing::{debug, instrument};

use zhi_lang_cop_core::compile::{self, CompileReport};
use zhi_lang_cop_core::{Config, Statistics};

use super::{paint, read_input_file};

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Annotated terms, one JSON object per line.
    pub input: Utf8PathBuf,

    /// Where to write the dictionary.
    #[arg(short, long, default_value = "terms-db.json")]
    pub output: Utf8PathBuf,

    /// Version string to stamp into the dictionary.
    #[arg(long, default_value = "0.1.0")]
    pub db_version: String,
}

#[derive(Serialize)]
struct BuildSummary<'a> {
    output: &'a str,
    #[serde(flatten)]
    report: CompileReport,
    statistics: Statistics,
}

/// Compile, validate and write a dictionary.
#[instrument(name = "cmd_build", skip_all, fields(input = %args.input, output = %args.output))]
pub fn cmd_build(args: BuildArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(input = %args.input, "executing build command");

    let input = read_input_file(&args.input, config.input_limit())?;
    let stamp = chrono::Utc::now().to_rfc3339();
    let (dict, report) = compile::compile_annotated(&input, &args.db_version, &stamp)
        .with_context(|| format!("failed to compile {}", args.input))?;

    let json = serde_json::to_string_pretty(dict.as_database())?;
    std::fs::write(args.output.as_std_path(), json + "\n")
        .with_context(|| format!("failed to write {}", args.output))?;

    let summary = BuildSummary {
        output: args.output.as_str(),
        report,
        statistics: dict.statistics(),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", paint("✓ 已編譯資料庫", Style::new().green()));
    println!("  總詞彙數: {}", summary.report.total);
    println!("  已審核: {}", summary.report.reviewed);
    if summary.report.skipped > 0 {
        let skipped = format!("跳過未審核: {}", summary.report.skipped);
        println!("  {}", paint(skipped, Style::new().yellow()));
    }
    println!("  規則數: {}", summary.statistics.total_rules);
    println!("  詞彙映射: {}", summary.statistics.total_terms);
    println!("  輸出檔案: {}", paint(summary.output, Style::new().cyan()));
    Ok(())
}
