use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use interview_graph::config::TraversalConfig;
use interview_graph::export::{self, ExportFormat};
use interview_graph::graph::{build_graph, InterviewGraph};
use interview_graph::logging;
use interview_graph::question::{self, Transcript};

#[derive(Parser)]
#[command(name = "interview-graph")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version = "0.1.0")]
#[command(about = "Render interview decision trees as directed graphs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an interview definition as a graph
    Render {
        /// Interview definition (JSON)
        file: PathBuf,

        /// Output format: dot or json
        #[arg(short, long, default_value = "dot")]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Traversal settings (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Label of the entry node
        #[arg(short, long, default_value = "START")]
        entry: String,
    },
    /// Validate an interview definition and summarize its graph
    Check {
        /// Interview definition (JSON)
        file: PathBuf,

        /// Traversal settings (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

fn load_config(path: Option<&Path>) -> Result<TraversalConfig> {
    match path {
        Some(path) => TraversalConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(TraversalConfig::default()),
    }
}

fn build(file: &Path, entry: &str, config: &TraversalConfig) -> Result<InterviewGraph> {
    let definition = question::parse_file(file)
        .with_context(|| format!("reading interview {}", file.display()))?;
    let compiled = question::compile(&definition)
        .with_context(|| format!("compiling interview {}", file.display()))?;
    info!(questions = compiled.len(), start = %compiled.start().text, "interview compiled");

    let graph = build_graph(compiled.start(), Transcript::new(), entry, config)
        .context("traversing graph")?;
    Ok(graph)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match &cli.command {
        Some(Commands::Render {
            file,
            format,
            output,
            config,
            entry,
        }) => {
            let config = load_config(config.as_deref())?;
            let graph = build(file, entry, &config)?;
            let rendered = export::export_to_string(*format, &graph)?;

            match output {
                Some(path) => {
                    fs::write(path, rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), %format, "graph written");
                }
                None => print!("{}", rendered),
            }
        }
        Some(Commands::Check { file, config }) => {
            let config = load_config(config.as_deref())?;
            let graph = build(file, "START", &config)?;
            println!(
                "{}: {} questions, {} edges, {} done, {} terminated",
                file.display(),
                graph.question_count(),
                graph.edge_count(),
                graph.done_edge_count(),
                graph.terminated_count()
            );
        }
        Some(Commands::Version) => {
            println!("interview-graph v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("interview-graph - render interview decision trees");
            println!("Run 'interview-graph render <FILE>' to print a DOT graph");
            println!("Run 'interview-graph --help' for more information");
        }
    }

    Ok(())
}
