use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use course_graph::{
    graph_from_canvas, graph_from_canvas_api, graph_from_piazza, Config, CourseGraph,
    GraphRetriever,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Platform {
    /// Zipped Canvas `.imscc` export
    Canvas,
    /// Zipped Piazza export
    Piazza,
    /// Live Canvas course via the REST API
    CanvasApi,
}

#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// Platform the course material comes from
    #[arg(short = 'p', long, value_enum)]
    platform: Platform,

    /// Path to the export archive
    #[arg(long)]
    path: Option<PathBuf>,

    /// Canvas course ID, overrides CANVAS_COURSE_ID
    #[arg(long)]
    course_id: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the course graph and print it as JSON
    Graph {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the documents related to a seed artifact as JSON
    Retrieve {
        #[command(flatten)]
        source: SourceArgs,

        /// Artifact ID to start from, e.g. canvas_0
        #[arg(short, long)]
        seed: String,

        /// Number of edge hops to follow, overrides GRAPH_MAX_DEPTH
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,
    },
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn build_graph(source: &SourceArgs, config: &Config) -> Result<CourseGraph> {
    let export_path = || {
        source
            .path
            .clone()
            .ok_or_else(|| anyhow!("--path is required for the {:?} platform", source.platform))
    };

    match source.platform {
        Platform::Canvas => graph_from_canvas(export_path()?).await,
        Platform::Piazza => graph_from_piazza(export_path()?).await,
        Platform::CanvasApi => {
            let mut api = config.canvas_api.clone();
            if let Some(course_id) = source.course_id {
                api.course_id = Some(course_id);
            }
            graph_from_canvas_api(&api).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.logging.log_level);

    match cli.command {
        Command::Graph { source } => {
            let graph = build_graph(&source, &config).await?;
            println!("{}", serde_json::to_string_pretty(&graph.snapshot())?);
        }
        Command::Retrieve {
            source,
            seed,
            max_depth,
        } => {
            let graph = build_graph(&source, &config).await?;
            let retriever = GraphRetriever::with_config(&graph, &config.retrieval);
            let docs = retriever.retrieve(&seed, max_depth)?;
            info!(seed = %seed, documents = docs.len(), "retrieved related documents");
            println!("{}", serde_json::to_string_pretty(&docs)?);
        }
    }

    Ok(())
}
