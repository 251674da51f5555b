use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::Value;
use verdict_rs::config::{EngineConfig, ServerConfig};
use verdict_rs::policy::PolicyLoader;
use verdict_rs::value::Binding;
use verdict_rs::InferenceEngine;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the inference endpoint over HTTP
    Serve {
        /// Host to bind (overrides VERDICT_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides VERDICT_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Stop evaluations after this many visited nodes (overrides VERDICT_MAX_STEPS)
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Evaluate a policy file once and print the output binding
    Eval {
        /// Path to the policy file
        #[arg(short, long)]
        policy: String,

        /// Input binding as a JSON object
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Input binding from a .json or .yaml file
        #[arg(long)]
        input_file: Option<String>,

        /// Stop after this many visited nodes (overrides VERDICT_MAX_STEPS)
        #[arg(long)]
        max_steps: Option<usize>,

        /// Also print the visited path and halt reason
        #[arg(long)]
        trace: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Serve {
            host,
            port,
            max_steps,
        } => {
            let mut config = ServerConfig::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if max_steps.is_some() {
                config.engine.max_steps = max_steps;
            }
            config.engine.validate()?;

            log::info!(
                "Starting server on {} (entry node: {}, max steps: {:?})",
                config.addr(),
                config.engine.entry_node,
                config.engine.max_steps
            );
            verdict_rs::server::serve(config).await?;
        }
        Commands::Eval {
            policy,
            input,
            input_file,
            max_steps,
            trace,
        } => {
            let mut config = EngineConfig::from_env()?;
            if max_steps.is_some() {
                config.max_steps = max_steps;
            }
            config.validate()?;

            let policy_text = PolicyLoader::new().load_policy(&policy)?;
            let input = read_input(input.as_deref(), input_file.as_deref())?;

            let engine = InferenceEngine::new(config);
            let evaluation = engine.evaluate_policy(&policy_text, &input)?;

            if trace {
                println!("Path: {}", evaluation.visited.join(" -> "));
                println!("Halt: {:?}", evaluation.halt);
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&evaluation.output.to_json())?
            );
        }
    }

    Ok(())
}

fn read_input(inline: Option<&str>, file: Option<&str>) -> anyhow::Result<Binding> {
    let value: Value = match (inline, file) {
        (Some(json), _) => serde_json::from_str(json).context("parsing --input")?,
        (None, Some(path)) => {
            let content =
                std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            if path.ends_with(".yaml") || path.ends_with(".yml") {
                serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path))?
            } else {
                serde_json::from_str(&content).with_context(|| format!("parsing {}", path))?
            }
        }
        (None, None) => return Ok(Binding::new()),
    };

    Ok(Binding::from_json(&value)?)
}
