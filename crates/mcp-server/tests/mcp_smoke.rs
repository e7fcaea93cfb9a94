use anyhow::{Context, Result};
use rmcp::model::CallToolResult;
use rmcp::{model::CallToolRequestParam, service::ServiceExt, transport::TokioChildProcess};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tokio::process::Command;

mod support;

fn first_text(result: &CallToolResult) -> Result<&str> {
    result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.as_str())
        .context("tool result missing text output")
}

#[tokio::test]
async fn mcp_exposes_rule_tools_and_classifies() -> Result<()> {
    let bin = support::locate_rules_mcp_bin()?;
    let config_dir = tempfile::tempdir().context("tempdir")?;

    let mut cmd = Command::new(bin);
    cmd.env("DYNAMIC_RULES_CONFIG", config_dir.path().join("config.json"));
    cmd.env("RUST_LOG", "warn");
    cmd.env_remove("MCP_REQUIRE_GITHUB_CONSENT");
    cmd.env_remove("GITHUB_PUSH_ALLOWED");

    let transport = TokioChildProcess::new(cmd).context("spawn mcp server")?;
    let service = tokio::time::timeout(Duration::from_secs(10), ().serve(transport))
        .await
        .context("timeout starting MCP server")??;

    let tools = tokio::time::timeout(
        Duration::from_secs(10),
        service.list_tools(Default::default()),
    )
    .await
    .context("timeout listing tools")??;
    let tool_names: HashSet<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    for expected in [
        "analyze_context",
        "check_file_size",
        "run_quality_gates",
        "load_rule_set",
        "suggest_refactoring",
        "educational_guide",
        "gatekeeper_check",
        "safe_mode",
        "preferences",
        "capabilities",
    ] {
        assert!(
            tool_names.contains(expected),
            "missing tool '{expected}' (available: {tool_names:?})"
        );
    }

    let args = serde_json::json!({
        "userQuery": "fix the crash in the checkout flow",
        "targetFiles": ["src/checkout.ts"],
    });
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "analyze_context".into(),
            arguments: args.as_object().cloned(),
        }),
    )
    .await
    .context("timeout calling analyze_context")??;
    assert_ne!(result.is_error, Some(true), "analyze_context returned error");
    let data: Value = serde_json::from_str(first_text(&result)?)?;
    assert_eq!(data["selectedRuleSet"], "SET_004");
    assert_eq!(data["contextAnalysis"]["projectType"], "debugging");
    assert_eq!(result.content.len(), 2, "expected data + report");

    let args = serde_json::json!({ "stage": "review" });
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "run_quality_gates".into(),
            arguments: args.as_object().cloned(),
        }),
    )
    .await
    .context("timeout calling run_quality_gates")??;
    assert_eq!(result.is_error, Some(true), "unknown stage must be a tool error");
    assert!(first_text(&result)?.contains("Unknown quality gate stage"));

    let tmp = tempfile::tempdir().context("tempdir")?;
    let big = tmp.path().join("Big.tsx");
    std::fs::write(&big, vec!["x"; 1500].join("\n")).context("write Big.tsx")?;
    let args = serde_json::json!({ "filePath": big.to_string_lossy() });
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "check_file_size".into(),
            arguments: args.as_object().cloned(),
        }),
    )
    .await
    .context("timeout calling check_file_size")??;
    let data: Value = serde_json::from_str(first_text(&result)?)?;
    assert_eq!(data["lineCount"], 1500);
    assert_eq!(data["status"], "violation");

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "capabilities".into(),
            arguments: None,
        }),
    )
    .await
    .context("timeout calling capabilities")??;
    let caps: Value = serde_json::from_str(first_text(&result)?)?;
    assert_eq!(caps["server"]["name"], "rules-mcp");
    assert_eq!(caps["start_route"]["tool"], "analyze_context");

    service.cancel().await.context("shutdown mcp client")?;
    Ok(())
}

#[tokio::test]
async fn analyze_context_is_blocked_without_consent() -> Result<()> {
    let bin = support::locate_rules_mcp_bin()?;
    let config_dir = tempfile::tempdir().context("tempdir")?;

    let mut cmd = Command::new(bin);
    cmd.env("DYNAMIC_RULES_CONFIG", config_dir.path().join("config.json"));
    cmd.env("MCP_REQUIRE_GITHUB_CONSENT", "1");
    cmd.env_remove("GITHUB_PUSH_ALLOWED");

    let transport = TokioChildProcess::new(cmd).context("spawn mcp server")?;
    let service = tokio::time::timeout(Duration::from_secs(10), ().serve(transport))
        .await
        .context("timeout starting MCP server")??;

    let args = serde_json::json!({ "userQuery": "add a button" });
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "analyze_context".into(),
            arguments: args.as_object().cloned(),
        }),
    )
    .await
    .context("timeout calling analyze_context")??;
    assert_ne!(result.is_error, Some(true));
    let data: Value = serde_json::from_str(first_text(&result)?)?;
    assert_eq!(data["blocked"], true);

    service.cancel().await.context("shutdown mcp client")?;
    Ok(())
}
