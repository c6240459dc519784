//! Stats command: show dictionary statistics.

use clap::Args;
use owo_colors::Style;
use tracing::{debug, instrument};

use zhi_lang_cop_core::Config;

use super::{load_dictionary, paint};

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    // No subcommand-specific arguments; uses global --json flag
}

/// Print rule and term counts for the loaded dictionary.
#[instrument(name = "cmd_stats", skip_all)]
pub fn cmd_stats(_args: StatsArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!("executing stats command");
    let stats = load_dictionary(config)?.statistics();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("{}", paint("詞庫統計", Style::new().bold()));
    println!();
    println!("{}: {}", paint("版本", Style::new().dimmed()), stats.version);
    println!("{}: {}", paint("更新時間", Style::new().dimmed()), stats.last_updated);
    println!("{}: {}", paint("總規則數", Style::new().dimmed()), stats.total_rules);
    println!("{}: {}", paint("總詞彙數", Style::new().dimmed()), stats.total_terms);

    println!();
    println!("{}", paint("按等級統計:", Style::new().bold()));
    for (level, count) in &stats.by_level {
        println!("  {} {level}: {count}", level.emoji());
    }

    println!();
    println!("{}", paint("按分類統計:", Style::new().bold()));
    for (category, count) in &stats.by_category {
        println!("  {category}: {count}");
    }
    Ok(())
}
