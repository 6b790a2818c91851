use anyhow::Context as AnyhowContext;
use astslice_engine::{AmbiguityPolicy, ContextSlicer, DocumentIndex, SliceConfig, SourceDocument};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

const AST_JSON_PATH_VAR: &str = "AST_JSON_PATH";
const OUT_DIR_VAR: &str = "AST_CONTEXT_OUT_DIR";

#[derive(Parser)]
#[command(name = "astslice")]
#[command(about = "Contextual AST slices for AI agents", long_about = None)]
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
    /// Fetch the contextual slice of the AST for the given symbols
    Context(ContextArgs),

    /// Print index statistics for a document
    Stats(StatsArgs),
}

#[derive(Args)]
struct ContextArgs {
    /// Symbols (functions, types, resources) or file names to slice for
    #[arg(long, value_delimiter = ',', required = true, num_args = 1..)]
    symbols: Vec<String>,

    /// Path to the AST document (falls back to AST_JSON_PATH)
    #[arg(long)]
    document: Option<PathBuf>,

    /// Snapshot directory (falls back to AST_CONTEXT_OUT_DIR)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Skip writing the snapshot artifact
    #[arg(long)]
    no_snapshot: bool,

    /// File name suffix that triggers file-based matching
    #[arg(long, default_value = ".bal")]
    file_suffix: String,

    /// Minimum symbol length before substring matching activates
    #[arg(long, default_value_t = 3)]
    min_substring_len: usize,

    /// Also scan every node for raw mentions of the seed ids
    #[arg(long)]
    deep_reverse: bool,

    /// Prefer same-file candidates when a relationship name is ambiguous
    #[arg(long)]
    prefer_same_file: bool,
}

#[derive(Args)]
struct StatsArgs {
    /// Path to the AST document (falls back to AST_JSON_PATH)
    #[arg(long)]
    document: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Context(args) => run_context(args),
        Commands::Stats(args) => match run_stats(args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                log::error!("{err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_context(args: ContextArgs) -> ExitCode {
    let document = match load_document(args.document) {
        Ok(document) => document,
        Err(message) => return emit_error(&message),
    };

    let output_dir = args
        .out
        .or_else(|| env::var(OUT_DIR_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| SliceConfig::default().output_dir);

    let config = SliceConfig {
        file_suffix: args.file_suffix,
        min_substring_len: args.min_substring_len,
        ambiguity: if args.prefer_same_file {
            AmbiguityPolicy::PreferSameFile
        } else {
            AmbiguityPolicy::FirstMatch
        },
        deep_reverse: args.deep_reverse,
        output_dir,
        snapshot: !args.no_snapshot,
    };

    let result = ContextSlicer::new(config).slice(&document, &args.symbols);
    match serde_json::to_string_pretty(&result) {
        Ok(body) => {
            println!("{body}");
            ExitCode::SUCCESS
        }
        Err(err) => emit_error(&format!("failed to serialize result: {err}")),
    }
}

fn run_stats(args: StatsArgs) -> anyhow::Result<()> {
    let document =
        load_document(args.document).map_err(|message| anyhow::anyhow!(message))?;
    let index = DocumentIndex::build(&document);
    let body = serde_json::to_string_pretty(index.stats())
        .context("serializing index statistics")?;
    println!("{body}");
    Ok(())
}

/// Resolve the document location (flag, then environment) and load it.
/// Failures become plain messages so `context` can report them as a
/// structured `{error}` object instead of crashing.
fn load_document(flag: Option<PathBuf>) -> Result<SourceDocument, String> {
    let path = match flag {
        Some(path) => path,
        None => match env::var(AST_JSON_PATH_VAR) {
            Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
            _ => {
                return Err(format!(
                    "{AST_JSON_PATH_VAR} environment variable is not set"
                ))
            }
        },
    };
    SourceDocument::load(&path).map_err(|err| err.to_string())
}

fn emit_error(message: &str) -> ExitCode {
    // Structured error object on stdout; the orchestrating caller keeps going.
    println!("{}", json!({ "error": message }));
    ExitCode::FAILURE
}
