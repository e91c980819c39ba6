use std::path::PathBuf;

use clap::Parser;
use quiz_funnel::{logging, nuora_funnel, Funnel, FunnelConfig, FunnelError};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the funnel definition from (defaults to the built-in funnel)
    #[arg(short, long)]
    funnel: Option<PathBuf>,

    /// JSON file with timing and loading-phase overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the session log
    #[arg(long, default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Print the built-in funnel as JSON and exit
    #[arg(long)]
    dump_funnel: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.dump_funnel {
        match serde_json::to_string_pretty(&nuora_funnel()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing funnel: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = logging::init(&args.log_file) {
        eprintln!("Error opening log file {}: {}", args.log_file.display(), e);
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        error!(error = %e, "funnel failed");
        eprintln!("Error running funnel: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), FunnelError> {
    let funnel = match &args.funnel {
        Some(path) => {
            info!(path = %path.display(), "loading funnel definition");
            Funnel::from_json(path)?
        }
        None => Funnel::builtin(),
    };
    let funnel = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            funnel.with_config(FunnelConfig::from_json(path)?)?
        }
        None => funnel,
    };
    funnel.run().await
}
