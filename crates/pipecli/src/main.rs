// crates/pipecli/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use pipecore::{Pipeline, PipelineNode};
use pipellm::MistralClient;
use piperuntime::{is_acyclic, PipelineRunner};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pipe")]
#[command(about = "Pipeline Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a pipeline file
    Run {
        /// Path to pipeline JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a pipeline file without executing it
    Validate {
        /// Path to pipeline JSON file
        file: PathBuf,
    },

    /// Create a new example pipeline
    Init {
        /// Output file path
        #[arg(short, long, default_value = "pipeline.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, verbose } => {
            // Initialize logging
            if verbose {
                tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::DEBUG)
                    .init();
            } else {
                tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::INFO)
                    .init();
            }

            run_pipeline(file).await?;
        }

        Commands::Validate { file } => {
            validate_pipeline(file)?;
        }

        Commands::Init { output } => {
            create_example_pipeline(output)?;
        }
    }

    Ok(())
}

async fn run_pipeline(file: PathBuf) -> Result<()> {
    println!("🚀 Loading pipeline from: {}", file.display());

    let pipeline_json = std::fs::read_to_string(&file)?;
    let pipeline: Pipeline = serde_json::from_str(&pipeline_json)?;

    println!("📋 Pipeline:");
    println!("   Nodes: {}", pipeline.nodes.len());
    println!("   Edges: {}", pipeline.edges.len());
    println!();

    let runner = PipelineRunner::new(Arc::new(MistralClient::from_env()));
    let response = runner.run(&pipeline).await;

    if !response.is_dag {
        println!("❌ Pipeline is not a DAG");
    }
    if let Some(error) = response.error {
        return Err(anyhow::anyhow!(error));
    }

    println!("✅ Pipeline executed");
    match response.outputs {
        Some(outputs) if !outputs.is_empty() => {
            println!();
            println!("📤 Outputs:");
            for record in &outputs {
                for (node_id, value) in record {
                    println!("   {}: {}", node_id, value);
                }
            }
        }
        _ => {
            println!("   (no output nodes)");
        }
    }

    Ok(())
}

fn validate_pipeline(file: PathBuf) -> Result<()> {
    println!("🔍 Validating pipeline: {}", file.display());

    let pipeline_json = std::fs::read_to_string(&file)?;
    let pipeline: Pipeline = serde_json::from_str(&pipeline_json)?;

    println!("   Nodes: {}", pipeline.nodes.len());
    println!("   Edges: {}", pipeline.edges.len());

    if !is_acyclic(&pipeline.nodes, &pipeline.edges) {
        return Err(anyhow::anyhow!(
            "Pipeline contains a cycle and is not a valid DAG"
        ));
    }

    println!("✅ Pipeline is a valid DAG");

    Ok(())
}

fn create_example_pipeline(output: PathBuf) -> Result<()> {
    let mut pipeline = Pipeline::new();
    pipeline.add_node(PipelineNode::new("question", "text").with_text("What is a DAG?"));
    pipeline.add_node(
        PipelineNode::new("answer", "mistral").with_field("Prompt", "Answer briefly: {{question}}"),
    );
    pipeline.add_node(PipelineNode::new("result", "output"));
    pipeline.connect("question", "answer");
    pipeline.connect("answer", "result");

    let json = serde_json::to_string_pretty(&pipeline)?;
    std::fs::write(&output, json)?;

    println!("✨ Created example pipeline: {}", output.display());
    println!();
    println!("Run it with:");
    println!("  pipe run --file {}", output.display());

    Ok(())
}
