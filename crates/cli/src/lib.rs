use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use command::{CommandAction, CommandRequest, CommandResponse};
use rules_engine::file_size::count_lines;
use rules_engine::PreferencesStore;
use rules_protocol::serialize_json;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

mod command;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "dynamic-rules")]
#[command(about = "Context-aware rule set selection and quality gates for coding agents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a JSON Command API request
    Command(CommandArgs),

    /// Analyze a request and select the rule set to apply
    Classify(ClassifyArgs),

    /// Run the quality gate for a development stage
    Gates(GatesArgs),

    /// Recommend how to split an oversized file
    Refactor(RefactorArgs),

    /// Check a file (or inline content) against the line limits
    #[command(name = "check-size")]
    CheckSize(CheckSizeArgs),

    /// Load a rule set by id, pick one automatically, or list the catalog
    #[command(name = "rule-set")]
    RuleSet(RuleSetArgs),

    /// Generate tiered learning material for a topic
    Guide(GuideArgs),

    /// Run the push-consent gate on its own (exit code 1 when blocked)
    Gatekeeper(OutputArgs),

    /// Show the safe-mode fallback behaviors
    #[command(name = "safe-mode")]
    SafeMode(OutputArgs),

    /// Show the command API capabilities
    Capabilities(OutputArgs),

    /// Read or change user preferences
    Config(ConfigArgs),
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON payload (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing JSON payload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Print the full JSON response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ClassifyArgs {
    /// The user's request
    query: String,

    /// Files the request targets (repeatable)
    #[arg(long = "target", short = 't')]
    targets: Vec<String>,

    /// Measure the target files against the configured limits
    #[arg(long)]
    check_sizes: bool,

    /// Externally measured size status: safe | approaching | violation
    #[arg(long, conflicts_with = "check_sizes")]
    size_status: Option<String>,

    /// Project type hint: new | existing | debugging | refactoring
    #[arg(long)]
    project_type: Option<String>,

    /// Primary language of the project
    #[arg(long)]
    language: Option<String>,

    /// Framework in use
    #[arg(long)]
    framework: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct GatesArgs {
    /// Stage: pre | during | post
    stage: String,

    /// Files under evaluation
    files: Vec<String>,

    /// Lines added so far (during stage)
    #[arg(long)]
    lines_added: Option<u64>,

    /// Files modified so far (during stage)
    #[arg(long)]
    files_modified: Option<u64>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct RefactorArgs {
    /// File to split
    path: String,

    /// Current line count (measured from the file when omitted)
    #[arg(long)]
    size: Option<usize>,

    /// Known violations to list in the recommendation (repeatable)
    #[arg(long = "violation")]
    violations: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct CheckSizeArgs {
    /// File to measure
    #[arg(conflicts_with_all = ["content", "stdin"])]
    path: Option<String>,

    /// Inline content to measure instead of a file
    #[arg(long, conflicts_with = "stdin")]
    content: Option<String>,

    /// Read the content to measure from stdin
    #[arg(long)]
    stdin: bool,

    /// Warning threshold (defaults to the configured limit)
    #[arg(long)]
    warning: Option<usize>,

    /// Hard threshold (defaults to the configured limit)
    #[arg(long)]
    hard: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct RuleSetArgs {
    /// Rule set id (SET_001..SET_005) or `auto`
    #[arg(long, conflicts_with = "list")]
    id: Option<String>,

    /// List every rule set in the catalog
    #[arg(long)]
    list: bool,

    /// Complexity for auto selection: simple | moderate | complex
    #[arg(long)]
    complexity: Option<String>,

    /// Intent for auto selection: implementation | learning | fix | optimize
    #[arg(long)]
    intent: Option<String>,

    /// Project type for auto selection: new | existing | debugging | refactoring
    #[arg(long)]
    project_type: Option<String>,

    /// File size status for auto selection: safe | approaching | violation
    #[arg(long)]
    size_status: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct GuideArgs {
    /// Topic to explain
    topic: String,

    /// Depth: simple | moderate | complex
    #[arg(long, default_value = "moderate")]
    complexity: String,

    /// Explanation language (defaults to the preferred language)
    #[arg(long)]
    language: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the preferences, or one dotted key
    Show {
        key: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Set a dotted key; the value is parsed as JSON when possible
    Set {
        key: String,
        value: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Restore the default preferences
    Reset {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the preferences file location
    Path,
}

impl Commands {
    fn json_output(&self) -> bool {
        match self {
            Commands::Command(_) => true,
            Commands::Classify(args) => args.output.json,
            Commands::Gates(args) => args.output.json,
            Commands::Refactor(args) => args.output.json,
            Commands::CheckSize(args) => args.output.json,
            Commands::RuleSet(args) => args.output.json,
            Commands::Guide(args) => args.output.json,
            Commands::Gatekeeper(args)
            | Commands::SafeMode(args)
            | Commands::Capabilities(args) => args.json,
            Commands::Config(args) => match &args.action {
                ConfigAction::Show { output, .. }
                | ConfigAction::Set { output, .. }
                | ConfigAction::Reset { output } => output.json,
                ConfigAction::Path => false,
            },
        }
    }
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    if cli.command.json_output() {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let store = PreferencesStore::open_default();
    if let Some(path) = store.path() {
        log::debug!("preferences: {}", path.display());
    }

    match cli.command {
        Commands::Command(args) => run_command(args, &store)?,
        Commands::Classify(args) => run_classify(args, &store)?,
        Commands::Gates(args) => run_gates(args, &store)?,
        Commands::Refactor(args) => run_refactor(args, &store)?,
        Commands::CheckSize(args) => run_check_size(args, &store)?,
        Commands::RuleSet(args) => run_rule_set(args, &store)?,
        Commands::Guide(args) => run_guide(args, &store)?,
        Commands::Gatekeeper(args) => run_gatekeeper(args, &store)?,
        Commands::SafeMode(args) => {
            run_action(CommandAction::SafeMode, json!({}), &args, &store)?;
        }
        Commands::Capabilities(args) => {
            run_action(CommandAction::Capabilities, json!({}), &args, &store)?;
        }
        Commands::Config(args) => run_config(args, &store)?,
    }

    Ok(())
}

fn run_command(args: CommandArgs, store: &PreferencesStore) -> Result<()> {
    let raw = read_payload(&args)?;
    let response = match serde_json::from_str::<CommandRequest>(&raw) {
        Ok(request) => command::execute(request, store),
        Err(err) => {
            let err = anyhow::Error::new(err).context("Invalid JSON passed to --json/--file");
            command::error_response(&err, None)
        }
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serialize_json(&response)?
    };
    print_stdout(&output)?;

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Command request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

/// Execute one action and print it: the full response with `--json`, else the
/// report (or the pretty data when the action has no report).
fn run_action(
    action: CommandAction,
    payload: Value,
    output: &OutputArgs,
    store: &PreferencesStore,
) -> Result<CommandResponse> {
    let request = CommandRequest { action, payload };
    let response = command::execute(request, store);

    if output.json {
        print_stdout(&serde_json::to_string_pretty(&response)?)?;
        if response.is_error() {
            std::process::exit(1);
        }
    } else if response.is_error() {
        eprintln!(
            "Error: {}",
            response.message.as_deref().unwrap_or("Unknown error")
        );
        for hint in &response.hints {
            eprintln!("  hint: {}", hint.text);
        }
        std::process::exit(1);
    } else if let Some(report) = &response.report {
        print_stdout(report)?;
    } else {
        print_stdout(&serde_json::to_string_pretty(&response.data)?)?;
    }
    Ok(response)
}

fn run_classify(args: ClassifyArgs, store: &PreferencesStore) -> Result<()> {
    let project_info = (args.project_type.is_some()
        || args.language.is_some()
        || args.framework.is_some())
    .then(|| {
        json!({
            "type": args.project_type,
            "language": args.language,
            "framework": args.framework,
        })
    });
    let payload = json!({
        "userQuery": args.query,
        "targetFiles": args.targets,
        "projectInfo": project_info,
        "fileSizeStatus": args.size_status,
        "checkFileSizes": args.check_sizes,
    });
    run_action(CommandAction::Classify, payload, &args.output, store)?;
    Ok(())
}

fn run_gates(args: GatesArgs, store: &PreferencesStore) -> Result<()> {
    let payload = json!({
        "stage": args.stage,
        "files": args.files,
        "changes": {
            "linesAdded": args.lines_added,
            "filesModified": args.files_modified,
        },
    });
    run_action(CommandAction::QualityGates, payload, &args.output, store)?;
    Ok(())
}

fn run_refactor(args: RefactorArgs, store: &PreferencesStore) -> Result<()> {
    let current_size = match args.size {
        Some(size) => size,
        None => {
            let content = fs::read_to_string(&args.path)
                .with_context(|| format!("Failed to read {}", args.path))?;
            count_lines(&content)
        }
    };
    let payload = json!({
        "filePath": args.path,
        "currentSize": current_size,
        "violations": args.violations,
    });
    run_action(CommandAction::Refactor, payload, &args.output, store)?;
    Ok(())
}

fn run_check_size(args: CheckSizeArgs, store: &PreferencesStore) -> Result<()> {
    let content = if args.stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read content from stdin")?;
        Some(buffer)
    } else {
        args.content
    };
    let payload = json!({
        "filePath": args.path,
        "fileContent": content,
        "warningLimit": args.warning,
        "hardLimit": args.hard,
    });
    run_action(CommandAction::CheckFileSize, payload, &args.output, store)?;
    Ok(())
}

fn run_rule_set(args: RuleSetArgs, store: &PreferencesStore) -> Result<()> {
    if args.list {
        run_action(CommandAction::ListRuleSets, json!({}), &args.output, store)?;
        return Ok(());
    }
    let payload = json!({
        "ruleSetId": args.id,
        "context": {
            "complexity": args.complexity,
            "userIntent": args.intent,
            "projectType": args.project_type,
            "fileSizeStatus": args.size_status,
        },
    });
    run_action(CommandAction::LoadRuleSet, payload, &args.output, store)?;
    Ok(())
}

fn run_guide(args: GuideArgs, store: &PreferencesStore) -> Result<()> {
    let payload = json!({
        "topic": args.topic,
        "complexity": args.complexity,
        "language": args.language,
    });
    run_action(CommandAction::Guide, payload, &args.output, store)?;
    Ok(())
}

fn run_gatekeeper(args: OutputArgs, store: &PreferencesStore) -> Result<()> {
    let response = run_action(CommandAction::Gatekeeper, json!({}), &args, store)?;
    if response.data["passed"].as_bool() == Some(false) {
        std::process::exit(1);
    }
    Ok(())
}

fn run_config(args: ConfigArgs, store: &PreferencesStore) -> Result<()> {
    let (payload, output) = match args.action {
        ConfigAction::Show { key, output } => (json!({ "op": "show", "key": key }), output),
        ConfigAction::Set { key, value, output } => (
            json!({ "op": "set", "key": key, "value": value }),
            output,
        ),
        ConfigAction::Reset { output } => (json!({ "op": "reset" }), output),
        ConfigAction::Path => {
            let path = store
                .path()
                .map(|path| path.display().to_string())
                .unwrap_or_default();
            return print_stdout(&path);
        }
    };
    run_action(CommandAction::Preferences, payload, &output, store)?;
    Ok(())
}
