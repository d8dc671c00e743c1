use anyhow::Context;
use clap::Parser;
use codegraph::graph::{self, GraphWriter, JsonLinesWriter};
use codegraph::{IndexError, Pipeline, PipelineOutput, Settings, config, logging};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "codegraph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract a code property graph from a source repository")]
struct Cli {
    /// Project directory to index
    project: PathBuf,

    /// Wipe the graph output before writing
    #[arg(long)]
    clear: bool,

    /// Run the pipeline but skip the writer
    #[arg(long)]
    dry_run: bool,

    /// Skip test files and directories during discovery
    #[arg(long)]
    exclude_tests: bool,

    /// Worker threads (overrides config)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Print unresolved calls grouped by simple name
    #[arg(long)]
    show_unresolved: bool,

    /// Output path for the JSON-lines graph batch
    #[arg(long, default_value = "codegraph.jsonl")]
    out: PathBuf,

    /// Graph store URI; only file sinks are built in
    #[arg(long, env = "CODEGRAPH_GRAPH_URI")]
    graph_uri: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut settings = Settings::load(&cwd);
    if cli.exclude_tests {
        settings.exclude_tests = true;
    }
    if let Some(threads) = cli.threads {
        settings.parallel_threads = threads.max(1);
    }
    logging::init(&settings.log_level);

    let domains = config::load_domains(&cwd);
    if !domains.is_empty() {
        tracing::info!("loaded {} domain definitions", domains.len());
    }

    let pipeline = Pipeline::new(settings);
    let output = pipeline
        .run(&cli.project)
        .with_context(|| format!("indexing {} failed", cli.project.display()))?;

    println!(
        "files: {} discovered, {} parsed",
        output.stats.files_discovered, output.stats.files_parsed
    );
    println!("symbols: {}", output.stats.symbols_indexed);
    println!(
        "calls: {} total, {} resolved, {} unresolved ({:.1}%)",
        output.stats.calls.total,
        output.stats.calls.resolved,
        output.stats.calls.unresolved,
        output.stats.calls.rate() * 100.0
    );
    if !output.diagnostics.is_empty() {
        println!("diagnostics: {}", output.diagnostics.len());
        for diagnostic in &output.diagnostics {
            tracing::debug!("[{}] {}", diagnostic.path, diagnostic.message);
        }
    }
    if output.stats.files_parsed == 0 {
        println!(
            "no parsable source files found under {}",
            cli.project.display()
        );
    }

    if cli.show_unresolved {
        print_unresolved(&output);
    }

    if !cli.dry_run {
        write_graph(&cli, &output)?;
    }
    Ok(())
}

/// Compact unresolved summary: call counts grouped by simple name.
fn print_unresolved(output: &PipelineOutput) {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for resolved_file in &output.resolved {
        for call in resolved_file.unresolved_calls() {
            *groups.entry(call.name.as_str()).or_default() += 1;
        }
    }
    if groups.is_empty() {
        println!("all calls resolved");
        return;
    }
    println!("unresolved calls by name:");
    for (name, count) in groups {
        println!("  {name} ({count})");
    }
}

fn write_graph(cli: &Cli, output: &PipelineOutput) -> anyhow::Result<()> {
    // Only file-backed sinks are compiled in; a non-file URI means the
    // external store client is absent.
    if let Some(uri) = &cli.graph_uri {
        if !uri.starts_with("file:") {
            return Err(IndexError::Writer {
                operation: "connect".into(),
                cause: format!("no client for '{uri}'; set a file: URI or use --out"),
            }
            .into());
        }
    }
    let out_path = match cli
        .graph_uri
        .as_deref()
        .and_then(|u| u.strip_prefix("file:"))
    {
        Some(path) => PathBuf::from(path),
        None => cli.out.clone(),
    };

    let file = std::fs::File::create(&out_path)
        .with_context(|| format!("opening {}", out_path.display()))?;
    let mut writer = JsonLinesWriter::new(std::io::BufWriter::new(file));
    if cli.clear {
        writer.clear()?;
    }
    let batch = graph::build_graph(&output.resolved, &output.table);
    writer.write_batch(&batch)?;
    writer.flush()?;
    println!(
        "graph: {} nodes, {} relationships -> {}",
        batch.nodes.len(),
        batch.relationships.len(),
        out_path.display()
    );
    Ok(())
}
