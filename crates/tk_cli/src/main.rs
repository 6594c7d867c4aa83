use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tk_builder::{build_parallel, default_jobs, merge, Merged, ModelBuilder, TreeNode};
use tk_ir::Namespace;
use tk_transform::PipelineConfig;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tk", about = "transkit: lower and re-emit decompiled object-oriented programs")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, run the transform pipeline and emit text.
    Transpile {
        /// Syntax-tree dump: one node, or an array of per-file units.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write one file per type under this directory instead.
        #[arg(long, conflicts_with = "output")]
        out_dir: Option<PathBuf>,
        /// Only emit this namespace ("" selects the unnamed one).
        #[arg(long)]
        namespace: Option<String>,
        /// Builder threads (defaults to available parallelism).
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Pipeline configuration as JSON.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overrides `license_marker` from the configuration.
        #[arg(long)]
        license_marker: Option<String>,
        /// Emit the IR exactly as built.
        #[arg(long)]
        no_transform: bool,
    },
    /// Build only and report what was found.
    Check {
        input: PathBuf,
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Print the merged IR as JSON.
    Dump {
        input: PathBuf,
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Run the transform pipeline before dumping.
        #[arg(long)]
        transformed: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Units {
    Many(Vec<TreeNode>),
    One(Box<TreeNode>),
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_units(input: &Path) -> Result<Vec<TreeNode>> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let units: Units = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a syntax-tree dump", input.display()))?;
    Ok(match units {
        Units::Many(units) => units,
        Units::One(unit) => vec![*unit],
    })
}

fn build(input: &Path, jobs: Option<usize>) -> Result<Merged> {
    let units = read_units(input)?;
    let jobs = jobs.unwrap_or_else(default_jobs);
    let fragments = build_parallel(&ModelBuilder::new(), &units, jobs)
        .with_context(|| format!("failed to build {}", input.display()))?;
    let merged = merge(fragments);
    info!(
        namespaces = merged.namespaces.len(),
        conflicts = merged.conflicts.len(),
        "merged fragments"
    );
    Ok(merged)
}

fn load_config(path: Option<&Path>, license_marker: Option<String>) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid pipeline configuration in {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    if let Some(marker) = license_marker {
        config.license_marker = marker;
    }
    Ok(config)
}

fn select(mut merged: Merged, namespace: Option<String>) -> Result<Vec<Namespace>> {
    let Some(name) = namespace else {
        return Ok(merged.namespaces);
    };
    let key = (!name.is_empty()).then_some(name.as_str());
    match merged.take(key) {
        Some(ns) => Ok(vec![ns]),
        None => bail!("namespace `{name}` not found in input"),
    }
}

fn transform(namespaces: &mut [Namespace], config: &PipelineConfig) -> Result<()> {
    for ns in namespaces {
        tk_transform::apply(ns, config)
            .with_context(|| format!("pipeline failed on namespace `{}`", ns.display_name()))?;
    }
    Ok(())
}

fn write_units(dir: &Path, namespaces: &[Namespace]) -> Result<()> {
    for ns in namespaces {
        let ns_dir = match &ns.name {
            Some(name) => dir.join(name),
            None => dir.join("_"),
        };
        std::fs::create_dir_all(&ns_dir)
            .with_context(|| format!("failed to create {}", ns_dir.display()))?;
        for unit in tk_emit::emit_types_parallel(ns) {
            let path = ns_dir.join(format!("{}.txt", unit.name));
            std::fs::write(&path, &unit.text)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Transpile {
            input,
            output,
            out_dir,
            namespace,
            jobs,
            config,
            license_marker,
            no_transform,
        } => {
            let config = load_config(config.as_deref(), license_marker)?;
            let mut namespaces = select(build(&input, jobs)?, namespace)?;
            if !no_transform {
                transform(&mut namespaces, &config)?;
            }

            if let Some(dir) = out_dir {
                write_units(&dir, &namespaces)?;
                eprintln!("Wrote {} namespace(s) to {}", namespaces.len(), dir.display());
                return Ok(());
            }

            let text: String = namespaces.iter().map(tk_emit::emit).collect();
            match &output {
                Some(path) => std::fs::write(path, &text)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{text}"),
            }
        }
        Commands::Check { input, jobs } => {
            let merged = build(&input, jobs)?;
            for conflict in &merged.conflicts {
                warn!(
                    namespace = conflict.namespace.as_deref().unwrap_or(""),
                    type_name = %conflict.type_name,
                    "duplicate type"
                );
            }
            for ns in &merged.namespaces {
                println!(
                    "{}: {} class(es), {} enum(s)",
                    ns.name.as_deref().unwrap_or("<default>"),
                    ns.classes().count(),
                    ns.enums().count()
                );
            }
            eprintln!(
                "OK: {} ({} conflict(s))",
                input.display(),
                merged.conflicts.len()
            );
        }
        Commands::Dump {
            input,
            jobs,
            transformed,
            config,
        } => {
            let mut namespaces = build(&input, jobs)?.namespaces;
            if transformed {
                let config = load_config(config.as_deref(), None)?;
                transform(&mut namespaces, &config)?;
            }
            let json = serde_json::to_string_pretty(&namespaces)?;
            println!("{json}");
        }
    }

    Ok(())
}
