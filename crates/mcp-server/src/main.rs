//! Dynamic Rules MCP Server
//!
//! Exposes context analysis, rule-set selection, quality gates and refactoring
//! advice to AI agents via MCP protocol.
//!
//! ## Tools
//!
//! - `analyze_context` - Classify a request and select its rule set
//! - `check_file_size` - Line count against the configured limits
//! - `run_quality_gates` - Weighted quality score for a development stage
//! - `suggest_refactoring` - Ranked extraction strategies for an oversized file
//! - `load_rule_set` / `list_rule_sets` - Rule set catalog
//! - `educational_guide`, `gatekeeper_check`, `safe_mode`, `preferences`, `capabilities`
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "dynamic-rules": {
//!       "command": "rules-mcp"
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod tools;

use tools::RulesService;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting rules MCP server");

    let service = RulesService::new();
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("Rules MCP server stopped");
    Ok(())
}
