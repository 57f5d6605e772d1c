//! # Assessor CLI
//!
//! Assesses one JSON document, or every `*.json` file below a directory,
//! against a requirement catalogue using the checks declared in a plan.

use assess_engine::api::{DocumentAssessor, EngineConfig};
use assess_engine::assessment::AssessmentSequence;
use assess_engine::logging::{self, codes, FacadeLogger};
use assess_engine::requirements::InMemoryRequirementsManager;
use assess_engine::results::AssessmentResults;
use assess_engine::types::ResultStatus;
use assess_engine::{log_error, log_info, log_success};
use assess_sdk::JsonDocument;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;
use walkdir::WalkDir;

/// Assess JSON documents against a requirement catalogue
#[derive(Parser)]
#[command(name = "assessor", version)]
struct Args {
    /// Requirement catalogue (.toml or .json)
    #[arg(long, short = 'r')]
    requirements: PathBuf,

    /// Assessment plan (.toml)
    #[arg(long, short = 'p')]
    plan: PathBuf,

    /// JSON document or directory of JSON documents
    input: PathBuf,

    /// Engine configuration file (.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run assessments on a worker pool
    #[arg(long)]
    concurrent: bool,

    /// Worker pool size (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Treat panicking assessments as errors when running concurrently
    #[arg(long)]
    strict: bool,

    /// Write results JSON to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn load_config(args: &Args) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };

    if args.concurrent {
        config = config.with_concurrency(true);
    }
    if args.strict {
        config = config.with_strict_task_failures(true);
    }
    match args.threads {
        Some(threads) => config = config.with_max_threads(threads),
        None if args.config.is_none() && std::env::var("ASSESS_MAX_THREADS").is_err() => {
            config = config.with_max_threads(num_cpus::get());
        }
        None => {}
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(config: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.to_log_level().as_str()),
    )
    .init();

    logging::init_global_logging(Arc::new(config.logging_service(Arc::new(FacadeLogger::new()))))?;
    Ok(())
}

fn run(args: Args) -> Result<i32, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let config = load_config(&args)?;
    init_logging(&config)?;

    log_info!("Assessor starting",
        "concurrent" => config.concurrent,
        "threads" => config.max_threads
    );

    let requirements = Arc::new(InMemoryRequirementsManager::from_path(&args.requirements)?);
    let (plan, assessments) = assess_sdk::load_plan(&args.plan, &AssessmentSequence::new())?;
    log_info!("Plan loaded",
        "assessments" => plan.assessments.len(),
        "rules" => plan.rule_count()
    );

    let documents = discover_documents(&args.input)?;
    if documents.is_empty() {
        println!("No JSON documents found in: {}", args.input.display());
        return Ok(0);
    }

    let assessor = DocumentAssessor::new(config, assessments, requirements)?
        .with_scope(plan.scope.clone());

    let mut all_results = Vec::new();
    let mut errored = 0;
    let mut failing = 0;

    for (index, path) in documents.iter().enumerate() {
        println!("[{}/{}] Assessing: {}", index + 1, documents.len(), path.display());

        let outcome = JsonDocument::from_path(path)
            .map_err(|e| e.to_string())
            .and_then(|document| assessor.assess(Arc::new(document)).map_err(|e| e.user_message()));

        match outcome {
            Ok(results) => {
                print_result_line(&results);
                if results.is_failure() {
                    failing += 1;
                }
                all_results.push(results);
            }
            Err(message) => {
                errored += 1;
                println!("  ✗ ERROR: {}", message);
                log_error!(codes::system::INTERNAL_ERROR, "Document assessment failed",
                    "document" => path.display(),
                    "error" => &message
                );
            }
        }
    }
    assessor.shutdown();

    write_results(&all_results, args.output.as_deref(), args.compact)?;

    let duration = start.elapsed();
    println!("\n=== Assessment Summary ===");
    println!("Documents: {}", documents.len());
    println!("Assessed: {}", all_results.len());
    println!("Errors: {}", errored);
    println!("Failing: {}", failing);
    println!("Duration: {:.2}s", duration.as_secs_f64());

    log_success!(codes::success::OPERATION_COMPLETED_SUCCESSFULLY, "Assessment run finished",
        "documents" => documents.len(),
        "failing" => failing,
        "errors" => errored,
        "duration_ms" => duration.as_millis()
    );

    Ok(if failing > 0 || errored > 0 { 1 } else { 0 })
}

fn print_result_line(results: &AssessmentResults) {
    let counts = results.status_counts();
    let status = results.overall_status();
    let marker = if status == ResultStatus::Fail { "✗" } else { "✓" };
    println!(
        "  {} {} ({} fail, {} warning, {} pass, {} not tested)",
        marker,
        status,
        counts.get(ResultStatus::Fail),
        counts.get(ResultStatus::Warning),
        counts.get(ResultStatus::Pass),
        counts.get(ResultStatus::NotTested)
    );
}

/// One document is written as an object, several as an array
fn write_results(
    results: &[AssessmentResults],
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = match (results, compact) {
        ([single], true) => single.to_json_compact()?,
        ([single], false) => single.to_json()?,
        (many, true) => serde_json::to_string(many)?,
        (many, false) => serde_json::to_string_pretty(many)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            println!("\n[OK] Results saved to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn discover_documents(input: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(format!("Input must be a JSON file or directory: {}", input.display()).into());
    }

    let mut documents: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().map(|x| x == "json").unwrap_or(false))
        .collect();
    documents.sort();
    Ok(documents)
}
