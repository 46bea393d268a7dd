use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

use subscription_order::config::AppConfig;
use subscription_order::logging;
use subscription_order::startup;
use subscription_order::AppError;

#[derive(Parser, Debug)]
#[command(name = "subscription-order")]
#[command(about = "Build a validated subscription order from a form response")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Enable debug logging (also enabled by DEBUG=true)
    #[arg(long)]
    debug: bool,

    /// Form submission key, e.g. a Jira issue key
    key: String,
}

async fn run(args: &Args) -> Result<(), AppError> {
    // Load configuration from specified file or use defaults
    let app_config = if args.config == "config.yaml" && !Path::new("config.yaml").exists() {
        warn!("No config.yaml found, using answer files under ./forms and an empty in-memory directory");
        AppConfig::default_config()
    } else {
        AppConfig::load_from_file(&args.config)?
    };
    info!(
        form = %app_config.form.form_type,
        directory = %app_config.directory.directory_type,
        "Configuration loaded"
    );

    let service = startup::build_order_service(&app_config)?;
    let order = service.get_validated_order(&args.key).await?;

    println!("{}", serde_json::to_string_pretty(&order)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(args.debug || logging::debug_from_env());

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ AppError::NotFound(_)) | Err(e @ AppError::Parse(_)) => {
            warn!(key = %args.key, "Order rejected: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!(key = %args.key, "{}", e);
            ExitCode::FAILURE
        }
    }
}
