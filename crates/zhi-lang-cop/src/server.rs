//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the term dictionary and matcher over the MCP protocol so AI
//! assistants can check Traditional Chinese text while writing it.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer. It wraps the same core library
//! the CLI commands use; each `#[tool]` method delegates to
//! [`TermDictionary`] or [`Matcher`] and only shapes the JSON response.
//!
//! The dictionary is loaded once and shared behind an [`Arc`]; every tool
//! call reads it without locking.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use zhi_lang_cop_core::dictionary::RuleRecord;
use zhi_lang_cop_core::{
    Category, Issue, Level, Matcher, RuleFilter, Summary, TermDictionary,
};

/// Page size for `list_rules` when none is given.
pub const DEFAULT_RULE_LIMIT: usize = 20;

/// Largest page `list_rules` will return.
pub const MAX_RULE_LIMIT: usize = 100;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `lint_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LintTextParams {
    /// The text to check.
    pub text: String,
    /// Minimum level to report: hazard, error, warning, info, or depends.
    /// Defaults to error.
    pub min_level: Option<Level>,
}

/// Parameters for the `lookup_rule` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LookupRuleParams {
    /// Term to look up, e.g. "視頻".
    pub term: Option<String>,
    /// Rule id to look up, e.g. "00001".
    pub rule_id: Option<String>,
}

/// Parameters for the `list_rules` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListRulesParams {
    /// Only rules with this level.
    pub level: Option<Level>,
    /// Only rules in this category: tech, general, programming, or hardware.
    pub category: Option<Category>,
    /// Maximum number of rules to return (1-100, default 20).
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct LintOutput {
    summary: Summary,
    issues: Vec<Issue>,
}

#[derive(Serialize)]
struct LookupOutput<T: Serialize> {
    found: bool,
    entries: Vec<T>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

/// MCP server exposing the term dictionary to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    dict: Arc<TermDictionary>,
    max_input: Option<usize>,
    default_level: Level,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ProjectServer {
    /// Create a server over `dict`.
    ///
    /// `max_input` caps the byte length of text passed to `lint_text`;
    /// `default_level` applies when a call omits `min_level`.
    pub fn new(dict: Arc<TermDictionary>, max_input: Option<usize>, default_level: Level) -> Self {
        Self {
            dict,
            max_input,
            default_level,
            tool_router: Self::tool_router(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and the loaded dictionary version")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let text = if params.format == "json" {
            to_json(&serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "description": env!("CARGO_PKG_DESCRIPTION"),
                "dictionaryVersion": self.dict.version(),
            }))?
        } else {
            format!(
                "{} v{}\n{}\ndictionary {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
                self.dict.version(),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Scan text for flagged terms.
    #[tool(
        description = "Check Traditional Chinese text for mainland-China vocabulary. Returns a summary and the issues found, each with position, level, message, and suggested Taiwan alternatives."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn lint_text(
        &self,
        Parameters(params): Parameters<LintTextParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(max) = self.max_input
            && params.text.len() > max
        {
            return Err(McpError::invalid_params(
                format!("text is {} bytes (limit: {max} bytes)", params.text.len()),
                None,
            ));
        }

        let min_level = params.min_level.unwrap_or(self.default_level);
        tracing::debug!(tool = "lint_text", min_level = %min_level, "executing MCP tool");

        let issues = Matcher::new(&self.dict, Some(min_level)).find_matches(&params.text);
        let output = LintOutput {
            summary: Summary::from_issues(&issues),
            issues,
        };
        let json = to_json(&output)?;

        tracing::info!(
            tool = "lint_text",
            issues = output.summary.total,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Look up a term or a rule id.
    #[tool(
        description = "Look up a term (the rules it triggers and its alternatives) or a rule by id. Provide either term or rule_id."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn lookup_rule(
        &self,
        Parameters(params): Parameters<LookupRuleParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "lookup_rule",
            term = ?params.term,
            rule_id = ?params.rule_id,
            "executing MCP tool"
        );

        let (found, json) = match (params.term.as_deref(), params.rule_id.as_deref()) {
            (Some(term), _) => {
                let entries = self.dict.entries_for_term(term);
                let found = !entries.is_empty();
                (found, to_json(&LookupOutput { found, entries })?)
            }
            (None, Some(rule_id)) => {
                let entries: Vec<RuleRecord<'_>> = self
                    .dict
                    .rule_by_id(rule_id)
                    .map(|rule| RuleRecord { rule_id, rule })
                    .into_iter()
                    .collect();
                let found = !entries.is_empty();
                (found, to_json(&LookupOutput { found, entries })?)
            }
            (None, None) => {
                return Err(McpError::invalid_params(
                    "provide either term or rule_id",
                    None,
                ));
            }
        };

        tracing::info!(tool = "lookup_rule", found, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// List rules with optional filters.
    #[tool(description = "List dictionary rules, optionally filtered by level and category.")]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn list_rules(
        &self,
        Parameters(params): Parameters<ListRulesParams>,
    ) -> Result<CallToolResult, McpError> {
        let limit = params.limit.unwrap_or(DEFAULT_RULE_LIMIT);
        if !(1..=MAX_RULE_LIMIT).contains(&limit) {
            return Err(McpError::invalid_params(
                format!("limit must be between 1 and {MAX_RULE_LIMIT}, got {limit}"),
                None,
            ));
        }
        tracing::debug!(
            tool = "list_rules",
            level = ?params.level,
            category = ?params.category,
            limit,
            "executing MCP tool"
        );

        let page = self.dict.list_rules(RuleFilter {
            level: params.level,
            category: params.category,
            offset: 0,
            limit: Some(limit),
        });
        let json = to_json(&page)?;

        tracing::info!(
            tool = "list_rules",
            total = page.total,
            returned = page.rules.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Dictionary statistics.
    #[tool(description = "Get dictionary statistics: version, rule and term counts, and counts per level and category.")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_stats(&self) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_stats", "executing MCP tool");
        let json = to_json(&self.dict.statistics())?;
        tracing::info!(tool = "get_stats", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use lint_text to flag mainland-China vocabulary in Traditional Chinese text, \
                 and lookup_rule or list_rules to explain a finding.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
