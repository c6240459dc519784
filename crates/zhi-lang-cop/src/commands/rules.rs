//! Rules command: list dictionary rules.

use clap::Args;
use owo_colors::Style;
use tracing::{debug, instrument};

use zhi_lang_cop_core::{Category, Config, Level, RuleFilter};

use super::{load_dictionary, paint};

/// Arguments for the `rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Only rules with this level
    #[arg(short, long, value_enum)]
    pub level: Option<Level>,

    /// Only rules in this category
    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Maximum number of rules to show
    #[arg(
        long,
        default_value_t = 50,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub limit: usize,

    /// Number of matching rules to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

/// List rules matching the filter.
#[instrument(name = "cmd_rules", skip_all)]
pub fn cmd_rules(args: RulesArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(level = ?args.level, category = ?args.category, "executing rules command");
    let dict = load_dictionary(config)?;

    let page = dict.list_rules(RuleFilter {
        level: args.level,
        category: args.category,
        offset: args.offset,
        limit: Some(args.limit),
    });

    if global_json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.total == 0 {
        println!("{}", paint("沒有符合條件的規則", Style::new().yellow()));
        return Ok(());
    }
    if page.rules.is_empty() {
        let past_end = format!("位移 {} 超出範圍 / 共 {} 條", page.offset, page.total);
        println!("{}", paint(past_end, Style::new().yellow()));
        return Ok(());
    }

    for record in &page.rules {
        let rule = record.rule;
        println!(
            "{} {} {} {}",
            paint(record.rule_id, Style::new().bold()),
            rule.level.emoji(),
            paint(format!("[{}]", rule.category), Style::new().dimmed()),
            rule.message
        );
    }
    println!();
    let shown = format!(
        "顯示 {}–{} / 共 {} 條",
        page.offset + 1,
        page.offset + page.rules.len(),
        page.total
    );
    println!("{}", paint(shown, Style::new().dimmed()));
    Ok(())
}
