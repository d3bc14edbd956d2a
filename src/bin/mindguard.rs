//! MindGuard CLI - command-line interface for the MindGuard risk engine
//!
//! Commands:
//! - submit: Assess one submission draft (batch mode)
//! - run: Process streaming drafts from stdin (streaming mode)
//! - trend: Summarize a history snapshot
//! - suggest: Print the suggestion for a risk level
//! - validate: Validate submission drafts
//! - doctor: Diagnose engine health and configuration
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mindguard_core::{
    EntryDraft, EntryValidator, HistoryStore, InterventionSelector, MindguardProcessor,
    ReportEncoder, RiskLevel, TrendAggregator, DEFAULT_WINDOW, ENGINE_VERSION, PRODUCER_NAME,
    REPORT_VERSION,
};

/// MindGuard - deterministic crisis-risk engine for behavioral metrics
#[derive(Parser)]
#[command(name = "mindguard")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score behavioral metrics and summarize risk trends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one submission draft (batch mode)
    Submit {
        /// Input draft JSON path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Load a history snapshot before assessing
        #[arg(long)]
        load_history: Option<PathBuf>,

        /// Save the history snapshot after assessing
        #[arg(long)]
        save_history: Option<PathBuf>,
    },

    /// Process streaming drafts from stdin (one JSON draft per line)
    Run {
        /// Load a history snapshot on startup
        #[arg(long)]
        load_history: Option<PathBuf>,

        /// Save the history snapshot on exit
        #[arg(long)]
        save_history: Option<PathBuf>,

        /// Flush output after each record
        #[arg(long, default_value = "true")]
        flush: bool,
    },

    /// Summarize a history snapshot
    Trend {
        /// History snapshot path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Window size in entries
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
    },

    /// Print the suggestion for a risk level
    Suggest {
        /// Risk level
        #[arg(value_enum)]
        level: LevelArg,
    },

    /// Validate submission drafts
    Validate {
        /// Input path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose engine health and configuration
    Doctor {
        /// Check a history snapshot file
        #[arg(long)]
        history: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one draft per line)
    Ndjson,
    /// JSON array of drafts
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    Low,
    Medium,
    High,
}

impl From<LevelArg> for RiskLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Low => RiskLevel::Low,
            LevelArg::Medium => RiskLevel::Medium,
            LevelArg::High => RiskLevel::High,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (submission draft)
    Input,
    /// Output schema (risk/trend report)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), MindguardCliError> {
    match cli.command {
        Commands::Submit {
            input,
            load_history,
            save_history,
        } => cmd_submit(&input, load_history.as_deref(), save_history.as_deref()),

        Commands::Run {
            load_history,
            save_history,
            flush,
        } => cmd_run(load_history.as_deref(), save_history.as_deref(), flush),

        Commands::Trend { input, window } => cmd_trend(&input, window),

        Commands::Suggest { level } => cmd_suggest(level.into()),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { history, json } => cmd_doctor(history.as_deref(), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_submit(
    input: &Path,
    load_history: Option<&Path>,
    save_history: Option<&Path>,
) -> Result<(), MindguardCliError> {
    let input_data = read_input(input)?;

    let mut processor = MindguardProcessor::new();
    if let Some(history_path) = load_history {
        let history_json = fs::read_to_string(history_path)?;
        processor.load_history(&history_json)?;
    }

    let report = processor.submit_json(&input_data)?;
    println!("{}", report);

    if let Some(history_path) = save_history {
        fs::write(history_path, processor.save_history()?)?;
    }

    Ok(())
}

fn cmd_run(
    load_history: Option<&Path>,
    save_history: Option<&Path>,
    flush: bool,
) -> Result<(), MindguardCliError> {
    let mut processor = MindguardProcessor::new();
    if let Some(history_path) = load_history {
        let history_json = fs::read_to_string(history_path)?;
        processor.load_history(&history_json)?;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let draft: EntryDraft = serde_json::from_str(trimmed)
            .map_err(|e| MindguardCliError::ParseError(format!("Failed to parse draft: {}", e)))?;
        let report = processor.submit_report(&draft)?;

        writeln!(stdout, "{}", serde_json::to_string(&report)?)?;
        if flush {
            stdout.flush()?;
        }
    }

    if let Some(history_path) = save_history {
        fs::write(history_path, processor.save_history()?)?;
    }

    Ok(())
}

fn cmd_trend(input: &Path, window: usize) -> Result<(), MindguardCliError> {
    let input_data = read_input(input)?;

    let entries = serde_json::from_str(&input_data)
        .map_err(|e| MindguardCliError::ParseError(format!("Failed to parse history: {}", e)))?;
    let mut store = HistoryStore::new();
    store.load_entries(entries)?;

    let summary = TrendAggregator::summarize(&store.latest(window));
    let encoder = ReportEncoder::new();
    println!("{}", encoder.trend_to_json(&summary)?);

    Ok(())
}

fn cmd_suggest(level: RiskLevel) -> Result<(), MindguardCliError> {
    let suggestion = InterventionSelector::suggest(level);
    println!("{}", serde_json::to_string_pretty(&suggestion)?);
    Ok(())
}

fn cmd_validate(
    input: &Path,
    input_format: InputFormat,
    json: bool,
) -> Result<(), MindguardCliError> {
    let input_data = read_input(input)?;

    let drafts = parse_drafts(&input_data, &input_format)?;
    if drafts.is_empty() {
        return Err(MindguardCliError::NoDrafts);
    }

    let errors: Vec<ValidationErrorDetail> = drafts
        .iter()
        .enumerate()
        .filter_map(|(index, draft)| {
            EntryValidator::validate(draft)
                .err()
                .map(|e| ValidationErrorDetail {
                    index,
                    field: e.field().to_string(),
                    error: e.to_string(),
                })
        })
        .collect();

    let report = ValidationReport {
        total_drafts: drafts.len(),
        valid_drafts: drafts.len() - errors.len(),
        invalid_drafts: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total drafts:   {}", report.total_drafts);
        println!("Valid drafts:   {}", report.valid_drafts);
        println!("Invalid drafts: {}", report.invalid_drafts);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Draft {} ({}): {}", err.index, err.field, err.error);
            }
        }
    }

    if report.invalid_drafts > 0 {
        Err(MindguardCliError::ValidationFailed(report.invalid_drafts))
    } else {
        Ok(())
    }
}

fn cmd_doctor(history: Option<&Path>, json: bool) -> Result<(), MindguardCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("MindGuard core version {}", ENGINE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "report_schema".to_string(),
        status: CheckStatus::Ok,
        message: format!("Output schema: {}", REPORT_VERSION),
    });

    if let Some(history_path) = history {
        if history_path.exists() {
            checks.push(check_history_file(history_path));
        } else {
            checks.push(DoctorCheck {
                name: "history".to_string(),
                status: CheckStatus::Warning,
                message: "History snapshot does not exist".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (streaming mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("MindGuard Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(MindguardCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn check_history_file(history_path: &Path) -> DoctorCheck {
    let content = match fs::read_to_string(history_path) {
        Ok(content) => content,
        Err(e) => {
            return DoctorCheck {
                name: "history".to_string(),
                status: CheckStatus::Error,
                message: format!("Cannot read history snapshot: {}", e),
            }
        }
    };

    let entries: Vec<mindguard_core::Entry> = match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            return DoctorCheck {
                name: "history".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid history JSON: {}", e),
            }
        }
    };

    let count = entries.len();
    let mut store = HistoryStore::new();
    match store.load_entries(entries) {
        Ok(()) => DoctorCheck {
            name: "history".to_string(),
            status: CheckStatus::Ok,
            message: format!("History snapshot valid ({} entries)", count),
        },
        Err(e) => DoctorCheck {
            name: "history".to_string(),
            status: CheckStatus::Error,
            message: format!("History snapshot out of order: {}", e),
        },
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), MindguardCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: submission draft");
                println!();
                println!("One JSON object per submission with the daily metrics:");
                println!();
                println!("  sleep_hours       - real, 0 to 24 inclusive");
                println!("  mood_score        - integer, 1 to 10 inclusive");
                println!("  messages_sent     - integer, >= 0");
                println!("  steps             - integer, >= 0");
                println!("  screen_time_hours - real, >= 0");
                println!("  timestamp         - optional RFC3339; assigned at ingestion when absent");
                println!();
                println!("All fields are validated before an entry is stored; boundary values");
                println!("are inclusive, negative or non-finite values are rejected.");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: {}", REPORT_VERSION);
                println!();
                println!("Risk report contains:");
                println!();
                println!("- schema_version: {}", REPORT_VERSION);
                println!("- producer: {{ name, version, instance_id }}");
                println!("- generated_at_utc: RFC3339 timestamp");
                println!("- entry: {{ timestamp, metrics }}");
                println!("- assessment: {{ score (0-1), level, triggered_factors }}");
                println!("- suggestion: {{ level, message }}");
                println!();
                println!("Trend report replaces entry/assessment/suggestion with:");
                println!("- summary: per-metric mean/latest, risk series, correlation matrix");
                println!("  (undefined correlations are null, never NaN)");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, MindguardCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_drafts(data: &str, format: &InputFormat) -> Result<Vec<EntryDraft>, MindguardCliError> {
    match format {
        InputFormat::Ndjson => data
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| {
                serde_json::from_str(l).map_err(|e| {
                    MindguardCliError::ParseError(format!("Failed to parse draft: {}", e))
                })
            })
            .collect(),
        InputFormat::Json => serde_json::from_str(data)
            .map_err(|e| MindguardCliError::ParseError(format!("Failed to parse drafts: {}", e))),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "mindguard.draft.v1",
        "description": "MindGuard behavioral submission draft",
        "type": "object",
        "required": ["sleep_hours", "mood_score", "messages_sent", "steps", "screen_time_hours"],
        "properties": {
            "sleep_hours": { "type": "number", "minimum": 0, "maximum": 24 },
            "mood_score": { "type": "integer", "minimum": 1, "maximum": 10 },
            "messages_sent": { "type": "integer", "minimum": 0 },
            "steps": { "type": "integer", "minimum": 0 },
            "screen_time_hours": { "type": "number", "minimum": 0 },
            "timestamp": { "type": "string", "format": "date-time" }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": REPORT_VERSION,
        "description": "MindGuard risk report",
        "type": "object",
        "required": ["schema_version", "producer", "generated_at_utc", "entry", "assessment", "suggestion"],
        "properties": {
            "schema_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "generated_at_utc": { "type": "string", "format": "date-time" },
            "entry": { "type": "object" },
            "assessment": {
                "type": "object",
                "properties": {
                    "score": { "type": "number", "minimum": 0, "maximum": 1 },
                    "level": { "type": "string", "enum": ["low", "medium", "high"] },
                    "triggered_factors": { "type": "array", "items": { "type": "string" } }
                }
            },
            "suggestion": { "type": "object" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum MindguardCliError {
    Io(io::Error),
    Engine(mindguard_core::EngineError),
    Json(serde_json::Error),
    Ordering(mindguard_core::OrderingViolation),
    NoDrafts,
    ValidationFailed(usize),
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for MindguardCliError {
    fn from(e: io::Error) -> Self {
        MindguardCliError::Io(e)
    }
}

impl From<mindguard_core::EngineError> for MindguardCliError {
    fn from(e: mindguard_core::EngineError) -> Self {
        MindguardCliError::Engine(e)
    }
}

impl From<serde_json::Error> for MindguardCliError {
    fn from(e: serde_json::Error) -> Self {
        MindguardCliError::Json(e)
    }
}

impl From<mindguard_core::OrderingViolation> for MindguardCliError {
    fn from(e: mindguard_core::OrderingViolation) -> Self {
        MindguardCliError::Ordering(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MindguardCliError> for CliError {
    fn from(e: MindguardCliError) -> Self {
        match e {
            MindguardCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            MindguardCliError::Engine(e) => CliError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'mindguard validate' on the input for details".to_string()),
            },
            MindguardCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            MindguardCliError::Ordering(e) => CliError {
                code: "ORDERING_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("History entries must be in non-decreasing timestamp order".to_string()),
            },
            MindguardCliError::NoDrafts => CliError {
                code: "NO_DRAFTS".to_string(),
                message: "No drafts found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            MindguardCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} drafts failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            MindguardCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            MindguardCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_drafts: usize,
    valid_drafts: usize,
    invalid_drafts: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    field: String,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
