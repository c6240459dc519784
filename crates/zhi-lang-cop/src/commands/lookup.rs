//! Lookup command: show the rules behind a term, or a single rule.

use clap::Args;
use owo_colors::Style;
use serde::Serialize;
use tracing::{debug, instrument};

use zhi_lang_cop_core::dictionary::{RuleRecord, TermEntry};
use zhi_lang_cop_core::{Config, TermDictionary};

use super::{load_dictionary, paint};

/// Arguments for the `lookup` subcommand.
#[derive(Args, Debug, Default)]
#[command(group = clap::ArgGroup::new("target").required(true))]
pub struct LookupArgs {
    /// Term to look up
    #[arg(short, long, group = "target")]
    pub term: Option<String>,

    /// Rule id to look up
    #[arg(short, long, group = "target")]
    pub rule: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TermLookup<'a> {
    term: &'a str,
    found: bool,
    entries: Vec<TermEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleLookup<'a> {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<RuleRecord<'a>>,
}

/// Look up a term or a rule id.
#[instrument(name = "cmd_lookup", skip_all)]
pub fn cmd_lookup(args: LookupArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(term = ?args.term, rule = ?args.rule, "executing lookup command");
    let dict = load_dictionary(config)?;

    match (args.term, args.rule) {
        (Some(term), _) => lookup_term(&dict, &term, global_json),
        (None, Some(rule_id)) => lookup_rule(&dict, &rule_id, global_json),
        (None, None) => anyhow::bail!("specify --term or --rule"),
    }
}

fn lookup_term(dict: &TermDictionary, term: &str, global_json: bool) -> anyhow::Result<()> {
    let entries = dict.entries_for_term(term);

    if global_json {
        let out = TermLookup {
            term,
            found: !entries.is_empty(),
            entries,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!(
            "{}",
            paint(format!("✓ 詞彙「{term}」未在詞庫中"), Style::new().green())
        );
        return Ok(());
    }

    for entry in entries {
        println!();
        println!("{}", paint(format!("✗ {term}"), Style::new().red()));
        let rule = entry.rule;
        let dim = Style::new().dimmed();
        println!("  {}", paint(format!("規則: {}", entry.rule_id), dim));
        println!(
            "  {}",
            paint(format!("等級: {} {}", rule.level.emoji(), rule.level), dim)
        );
        println!(
            "  {}",
            paint(format!("說明: {}", rule.message), Style::new().yellow())
        );
        println!(
            "  {}",
            paint(
                format!("建議: {}", entry.alternatives.join("、")),
                Style::new().cyan()
            )
        );
    }
    Ok(())
}

fn lookup_rule(dict: &TermDictionary, rule_id: &str, global_json: bool) -> anyhow::Result<()> {
    let record = dict
        .rule_by_id(rule_id)
        .map(|rule| RuleRecord { rule_id, rule });

    if global_json {
        let out = RuleLookup {
            found: record.is_some(),
            rule: record,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let Some(record) = record else {
        println!("{}", paint(format!("✗ 規則 {rule_id} 不存在"), Style::new().red()));
        return Ok(());
    };

    let rule = record.rule;
    println!();
    let dim = Style::new().dimmed();
    println!(
        "{}",
        paint(format!("規則 {rule_id}"), Style::new().yellow().bold())
    );
    println!(
        "{}",
        paint(format!("等級: {} {}", rule.level.emoji(), rule.level), dim)
    );
    println!("{}", paint(format!("分類: {}", rule.category), dim));
    println!(
        "{}",
        paint(format!("說明: {}", rule.message), Style::new().yellow())
    );
    println!();
    println!("{}", paint("概念對照:", Style::new().cyan()));
    for concept in &rule.concepts {
        println!("  {}: {}", concept.lang.as_str(), concept.value);
    }
    Ok(())
}
