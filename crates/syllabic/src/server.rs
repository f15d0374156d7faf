//! MCP (Model Context Protocol) server.
//!
//! Exposes syllable estimation and readability scoring to AI assistants over
//! stdio. Every tool delegates to `syllabic-core`; nothing here computes scores.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use syllabic_core::readability::{self, Thresholds, WordSyllables};
use syllabic_core::text::Word;

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

/// Parameters for the `estimate_syllables` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct EstimateSyllablesParams {
    /// Words to estimate. Punctuation and digits are ignored.
    pub words: Vec<String>,
}

/// Parameters for the `check_readability` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CheckReadabilityParams {
    /// The text to score.
    pub text: String,
    /// Maximum acceptable Flesch-Kincaid grade level.
    pub max_grade: Option<f64>,
    /// Minimum acceptable Flesch reading ease.
    pub min_reading_ease: Option<f64>,
    /// Strip markdown formatting before scoring.
    #[serde(default)]
    pub strip_markdown: bool,
}

#[derive(Debug, Serialize)]
struct SyllableEstimates {
    words: Vec<WordSyllables>,
    total: usize,
}

/// MCP server holding the configured defaults.
#[derive(Clone)]
pub struct SyllabicServer {
    thresholds: Thresholds,
    max_input_bytes: Option<usize>,
    tool_router: ToolRouter<Self>,
}

impl Default for SyllabicServer {
    fn default() -> Self {
        Self::new(Thresholds::default(), None)
    }
}

#[tool_router]
impl SyllabicServer {
    /// Create a server whose readability checks fall back to `thresholds`.
    pub fn new(thresholds: Thresholds, max_input_bytes: Option<usize>) -> Self {
        Self {
            thresholds,
            max_input_bytes,
            tool_router: Self::tool_router(),
        }
    }

    /// Reject tool input whose total size exceeds the configured limit.
    fn check_input_size(&self, bytes: usize) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if bytes > max => Err(McpError::invalid_params(
                format!("input too large: {bytes} bytes (limit: {max} bytes)"),
                None,
            )),
            _ => Ok(()),
        }
    }

    #[tool(description = "Get server name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Per-word syllable estimates plus their sum.
    #[tool(
        description = "Estimate syllables for each word from its spelling. Returns per-word counts and the total."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", words = params.words.len()))]
    fn estimate_syllables(
        &self,
        Parameters(params): Parameters<EstimateSyllablesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.check_input_size(params.words.iter().map(String::len).sum())?;

        let words: Vec<WordSyllables> = params
            .words
            .iter()
            .filter_map(|raw| Word::parse(raw))
            .map(WordSyllables::from)
            .collect();
        if words.is_empty() {
            return Err(McpError::invalid_params(
                "no words with letters to estimate",
                None,
            ));
        }

        let total = words.iter().map(|w| w.syllables).sum();
        let json = serde_json::to_string_pretty(&SyllableEstimates { words, total })
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(tool = "estimate_syllables", total, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Score text with Flesch reading ease and Flesch-Kincaid grade.
    #[tool(
        description = "Score text readability. Returns sentence, word and syllable counts, Flesch reading ease, Flesch-Kincaid grade level, and pass/fail against thresholds."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn check_readability(
        &self,
        Parameters(params): Parameters<CheckReadabilityParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "check_readability",
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );
        self.check_input_size(params.text.len())?;

        let thresholds = Thresholds {
            max_grade: params.max_grade,
            min_reading_ease: params.min_reading_ease,
        }
        .or(self.thresholds);
        let report =
            readability::check_readability(&params.text, params.strip_markdown, thresholds)
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "check_readability",
            grade = report.grade,
            reading_ease = report.reading_ease,
            pass = report.pass(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for SyllabicServer {
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
                "{} MCP server. Estimate syllables and score readability with Flesch-Kincaid.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
