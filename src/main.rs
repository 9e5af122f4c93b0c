use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "finplan",
    about = "Yearly household cash flow, net worth and portfolio projections"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Project a snapshot and print the report as JSON.
    Project {
        /// Path to a snapshot JSON file; reads stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = finplan::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Command::Project { input } => match run_projection(input) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_projection(input: Option<PathBuf>) -> Result<String, String> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Cannot read {}: {e}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Cannot read stdin: {e}"))?;
            buffer
        }
    };

    let state: finplan::core::PlanState =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid snapshot JSON: {e}"))?;
    let report = finplan::core::evaluate_plan(&state).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&report).map_err(|e| format!("Cannot serialize report: {e}"))
}
