use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docseg_chunker::{CancellationToken, ChunkContext};
use docseg_formats::default_registry;
use serde_json::json;

use crate::flags::EstimatorFlag;
use crate::options::{resolve_options, OptionOverrides};

mod flags;
mod options;

#[derive(Parser)]
#[command(name = "docseg")]
#[command(about = "Structure-aware document chunking", long_about = None)]
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
    /// Split a document into chunks and print the result as JSON
    Chunk(ChunkArgs),

    /// List registered chunkers in priority order
    Chunkers,
}

#[derive(Args)]
struct ChunkArgs {
    /// Document to chunk (`-` reads stdin)
    path: PathBuf,

    /// MIME type of the document
    #[arg(long)]
    mime: Option<String>,

    /// Language or file-name hint (defaults to the file name)
    #[arg(long)]
    language: Option<String>,

    /// Hard chunk size bound in bytes
    #[arg(long)]
    max_chunk_size: Option<usize>,

    /// Token budget reported against in warnings
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Bytes repeated between consecutive plain-text chunks
    #[arg(long)]
    overlap: Option<usize>,

    /// Ignore document structure and split as plain text
    #[arg(long)]
    flat: bool,

    /// TOML file with chunking options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Token estimator used for chunk metadata
    #[arg(long, value_enum, default_value_t = EstimatorFlag::Chars)]
    estimator: EstimatorFlag,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
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
        Commands::Chunk(args) => run_chunk(args),
        Commands::Chunkers => run_chunkers(),
    }
}

fn run_chunk(args: ChunkArgs) -> Result<()> {
    let from_stdin = args.path == Path::new("-");
    let language = args.language.or_else(|| {
        (!from_stdin)
            .then(|| args.path.file_name())
            .flatten()
            .map(|name| name.to_string_lossy().into_owned())
    });

    let options = resolve_options(
        args.config.as_deref(),
        OptionOverrides {
            mime_type: args.mime,
            language,
            max_chunk_size: args.max_chunk_size,
            max_tokens: args.max_tokens,
            overlap: args.overlap,
            flat: args.flat,
        },
    )?;

    let content = if from_stdin {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        fs::read(&args.path).with_context(|| format!("Failed to read {}", args.path.display()))?
    };

    let registry = default_registry();
    let cancel = CancellationToken::new();
    let estimator = args.estimator.build();
    let ctx = ChunkContext::new(&cancel, &*estimator);

    let result = registry
        .chunk(&content, &options, &ctx)
        .with_context(|| format!("Failed to chunk {}", args.path.display()))?;

    log::info!(
        "Chunked {} bytes into {} chunks with '{}'",
        result.original_size,
        result.total_chunks,
        result.chunker_used
    );
    for warning in &result.warnings {
        log::warn!("[{}] {} (offset {})", warning.code, warning.message, warning.offset);
    }

    let text = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    print_stdout(&text)
}

fn run_chunkers() -> Result<()> {
    let registry = default_registry();
    let chunkers: Vec<_> = registry
        .list()
        .iter()
        .map(|chunker| {
            json!({
                "name": chunker.name(),
                "priority": chunker.priority(),
                "preserves_structure": chunker.preserves_structure(),
            })
        })
        .collect();
    let fallback = registry.fallback().map(|chunker| chunker.name().to_string());

    let body = json!({ "chunkers": chunkers, "fallback": fallback });
    print_stdout(&serde_json::to_string_pretty(&body)?)
}

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
